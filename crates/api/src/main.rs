mod middleware;
mod response;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use middleware::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transit_integrations::{sms::DevSmsTransport, PaymentGateway, SessionTokenIssuer};
use transit_types::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting transit API server...");

    // Get configuration from environment
    let port = std::env::var("API_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let frontend_url =
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

    let config = Config::from_env();

    // Initialize database pool
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = transit_db::create_pool(&database_url).await?;

    tracing::info!("Database connection established");

    // Session tokens: self-issued, no external identity provider.
    let session_secret =
        std::env::var("SESSION_TOKEN_SECRET").expect("SESSION_TOKEN_SECRET must be set");
    let session_ttl_hours = std::env::var("SESSION_TOKEN_TTL_HOURS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(24 * 7);
    let session_token_issuer = SessionTokenIssuer::new(session_secret, session_ttl_hours);

    // Payment gateway credentials.
    let payment_gateway = PaymentGateway {
        merchant_id: std::env::var("PAYABLE_MERCHANT_ID")
            .expect("PAYABLE_MERCHANT_ID must be set"),
        merchant_key: std::env::var("PAYABLE_MERCHANT_KEY")
            .expect("PAYABLE_MERCHANT_KEY must be set"),
        merchant_token: std::env::var("PAYABLE_MERCHANT_TOKEN")
            .expect("PAYABLE_MERCHANT_TOKEN must be set"),
        environment: config.payment_environment,
    };

    tracing::info!(environment = ?payment_gateway.environment, "Payment gateway configured");

    let state = AppState {
        pool,
        config,
        session_token_issuer,
        payment_gateway,
        sms: Arc::new(DevSmsTransport),
    };

    // Build application router
    let app = Router::new()
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/auth/otp/request", post(routes::auth::request_otp))
        .route("/api/auth/otp/verify", post(routes::auth::verify_otp))
        // Trip routes
        .route("/api/trips", get(routes::trips::search_trips))
        .route("/api/trips/:id", get(routes::trips::get_trip))
        .route("/api/trips/:id/crew", put(routes::trips::assign_crew))
        .route(
            "/api/trips/:id/seat-layout",
            put(routes::trips::bind_seat_layout),
        )
        .route("/api/trips/seats/block", post(routes::trips::block_seats))
        .route("/api/trips/seats/unblock", post(routes::trips::unblock_seats))
        // Booking intent routes
        .route("/api/intents", post(routes::intents::create_intent))
        .route(
            "/api/intents/:id",
            get(routes::intents::get_intent_status).delete(routes::intents::cancel_intent),
        )
        .route("/api/intents/:id/pay", post(routes::intents::initiate_payment))
        .route("/api/intents/:id/confirm", post(routes::intents::confirm_intent))
        .route("/api/intents/:id/lounge", post(routes::intents::add_lounge))
        // Payment gateway webhook
        .route("/api/webhooks/payment", post(routes::webhooks::payment_webhook))
        .layer(
            CorsLayer::new()
                .allow_origin(frontend_url.parse::<axum::http::HeaderValue>()?)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("API ready at http://{}:{}/api", addr.ip(), port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
