use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use transit_core::{Orchestrator, OtpService, RateLimiter, TripGenerator};
use transit_db::{models::User, queries::users, Pool};
use transit_integrations::{payment_gateway::PaymentGateway, SessionTokenIssuer, SmsTransport};
use transit_types::{enums::UserRole, AppError, Config};
use uuid::Uuid;

/// Extractor for an authenticated user, verified off our own session token
/// rather than an external identity provider's JWT.
/// Usage: async fn handler(AuthUser(user): AuthUser)
pub struct AuthUser(pub User);

/// Shared handles every route needs. Services are constructed on demand from
/// the (cheap, clone-backed) pool and config rather than stored pre-built, so
/// `AppState` stays a plain `Clone` struct without wrapping each service in
/// its own `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub config: Config,
    pub session_token_issuer: SessionTokenIssuer,
    pub payment_gateway: PaymentGateway,
    pub sms: Arc<dyn SmsTransport>,
}

impl AppState {
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.pool.clone(), self.config.clone())
    }

    pub fn otp_service(&self) -> OtpService {
        OtpService::new(
            self.pool.clone(),
            self.config.clone(),
            self.sms.clone(),
            self.session_token_issuer.clone(),
        )
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.pool.clone(), self.config.clone())
    }

    pub fn trip_generator(&self) -> TripGenerator {
        TripGenerator::new(self.pool.clone(), self.config.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: axum::extract::FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                (
                    StatusCode::UNAUTHORIZED,
                    "Missing or invalid Authorization header".to_string(),
                )
            })?;

        let token = bearer.token();

        // Get app state
        let app_state = AppState::from_ref(state);

        // Verify our own session token (no external IdP in this flow)
        let claims = app_state
            .session_token_issuer
            .verify(token)
            .map_err(|e| (StatusCode::UNAUTHORIZED, format!("Invalid token: {}", e)))?;

        // Get user ID from claims
        let user_id: Uuid = claims.sub.parse().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid user ID in token".to_string(),
            )
        })?;

        // Fetch user from database
        let user = users::find_by_id(&app_state.pool, user_id)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                )
            })?
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

        Ok(AuthUser(user))
    }
}

/// Checks a user's role against an endpoint's required role. Roles are
/// disjoint in this platform (spec §4) — no hierarchy to climb.
pub fn require_role(user: &User, required_role: UserRole) -> Result<(), AppError> {
    if user.role() == required_role {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
