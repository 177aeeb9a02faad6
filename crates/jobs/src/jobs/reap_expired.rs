use transit_core::ExpirationReaper;
use transit_db::Pool;

/// Expires holds past their TTL. Runs once a minute — not cron-scheduled,
/// since a minute-granularity cron expression buys nothing a plain interval
/// loop doesn't already give us.
pub async fn reap_expired_holds(pool: &Pool) -> anyhow::Result<()> {
    let reaper = ExpirationReaper::new(pool.clone());
    let summary = reaper.tick().await?;
    if summary.intents_expired > 0
        || summary.orphaned_seats_released > 0
        || summary.orphaned_lounge_holds_released > 0
    {
        tracing::info!(
            intents_expired = summary.intents_expired,
            orphaned_seats_released = summary.orphaned_seats_released,
            orphaned_lounge_holds_released = summary.orphaned_lounge_holds_released,
            "reap_expired_holds job finished"
        );
    }
    Ok(())
}
