mod jobs;

use tokio_cron_scheduler::{Job, JobScheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transit_types::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit_jobs=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting transit background jobs...");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = transit_db::create_pool(&database_url).await?;
    let config = Config::from_env();

    tracing::info!("Database connection established");

    let scheduler = JobScheduler::new().await?;

    // Trip Generator: materialize upcoming trips (daily at 02:00).
    let pool_clone = pool.clone();
    let config_clone = config.clone();
    let generate_job = Job::new_async("0 0 2 * * *", move |_uuid, _l| {
        let pool = pool_clone.clone();
        let config = config_clone.clone();
        Box::pin(async move {
            if let Err(e) = jobs::generate_future_trips(&pool, &config).await {
                tracing::error!("generate_future_trips job failed: {}", e);
            }
        })
    })?;
    scheduler.add(generate_job).await?;
    tracing::info!("Registered job: generate_future_trips (daily at 02:00)");

    // Trip Generator: fill any gaps the 02:00 run missed (daily at 03:00).
    let pool_clone = pool.clone();
    let config_clone = config.clone();
    let fill_job = Job::new_async("0 0 3 * * *", move |_uuid, _l| {
        let pool = pool_clone.clone();
        let config = config_clone.clone();
        Box::pin(async move {
            if let Err(e) = jobs::fill_missing_trips(&pool, &config).await {
                tracing::error!("fill_missing_trips job failed: {}", e);
            }
        })
    })?;
    scheduler.add(fill_job).await?;
    tracing::info!("Registered job: fill_missing_trips (daily at 03:00)");

    // Trip Generator: prune old trips (weekly, Sunday at 04:00).
    let pool_clone = pool.clone();
    let config_clone = config.clone();
    let cleanup_job = Job::new_async("0 0 4 * * Sun", move |_uuid, _l| {
        let pool = pool_clone.clone();
        let config = config_clone.clone();
        Box::pin(async move {
            if let Err(e) = jobs::cleanup_old_trips(&pool, &config).await {
                tracing::error!("cleanup_old_trips job failed: {}", e);
            }
        })
    })?;
    scheduler.add(cleanup_job).await?;
    tracing::info!("Registered job: cleanup_old_trips (weekly, Sunday at 04:00)");

    scheduler.start().await?;
    tracing::info!("Job scheduler started");

    // Expiration Reaper: plain interval loop, not cron-scheduled — a once-
    // a-minute cron expression buys nothing a fixed interval doesn't.
    let reaper_pool = pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            if let Err(e) = jobs::reap_expired_holds(&reaper_pool).await {
                tracing::error!("reap_expired_holds job failed: {}", e);
            }
        }
    });
    tracing::info!("Registered job: reap_expired_holds (every 60s)");

    tracing::info!("Background jobs running");

    loop {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
    }
}
