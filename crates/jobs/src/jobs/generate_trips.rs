use transit_core::TripGenerator;
use transit_db::Pool;
use transit_types::Config;

/// Materialize upcoming trips from active schedules. Runs daily at 02:00.
pub async fn generate_future_trips(pool: &Pool, config: &Config) -> anyhow::Result<()> {
    let generator = TripGenerator::new(pool.clone(), config.clone());
    let created = generator.generate_future_trips().await?;
    tracing::info!(created, "generate_future_trips job finished");
    Ok(())
}

/// Re-run of the same generation pass, at a later hour so a transient
/// failure in the 02:00 run still gets a same-day chance to fill gaps.
/// Runs daily at 03:00.
pub async fn fill_missing_trips(pool: &Pool, config: &Config) -> anyhow::Result<()> {
    let generator = TripGenerator::new(pool.clone(), config.clone());
    let created = generator.fill_missing_trips().await?;
    tracing::info!(created, "fill_missing_trips job finished");
    Ok(())
}

/// Deletes completed/cancelled trips past the retention window. Runs
/// weekly, Sunday at 04:00.
pub async fn cleanup_old_trips(pool: &Pool, config: &Config) -> anyhow::Result<()> {
    let generator = TripGenerator::new(pool.clone(), config.clone());
    let deleted = generator.cleanup_old_trips(90).await?;
    tracing::info!(deleted, "cleanup_old_trips job finished");
    Ok(())
}
