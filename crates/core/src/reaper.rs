//! Expiration Reaper: releases holds whose TTL has passed.
//!
//! Ticks on a fixed interval rather than a cron expression — modeled on the
//! teacher's "release unpaid bookings every minute" job, generalized to
//! iterate a per-row find-then-release loop and log each release the same
//! way.

use chrono::Utc;

use transit_db::queries::{intents as intent_queries, lounges, trips};
use transit_db::Pool;
use transit_types::AppError;

use crate::leg::release_all_legs;

pub struct ExpirationReaper {
    pool: Pool,
}

#[derive(Debug, Default)]
pub struct ReaperSummary {
    pub intents_expired: usize,
    pub orphaned_seats_released: usize,
    pub orphaned_lounge_holds_released: usize,
}

impl ExpirationReaper {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// One sweep: expire every intent still `held`/`payment_pending` past
    /// its TTL, releasing its legs first so the intent never reads expired
    /// while a seat or lounge hold it owns is still live.
    pub async fn tick(&self) -> Result<ReaperSummary, AppError> {
        let now = Utc::now();
        let mut summary = ReaperSummary::default();

        let expired = intent_queries::find_expired_holds(&self.pool, now)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        for intent in expired {
            let expected = intent.status.clone();

            if let Err(e) = release_all_legs(&self.pool, &intent).await {
                tracing::error!(intent_id = %intent.id, error = %e, "reaper: failed to release legs");
                continue;
            }

            match intent_queries::transition_status(&self.pool, intent.id, &expected, "expired").await
            {
                Ok(true) => {
                    summary.intents_expired += 1;
                    tracing::info!(intent_id = %intent.id, "reaper: expired intent");
                }
                Ok(false) => {
                    // Already moved by a concurrent confirm/cancel; legs were
                    // already released above, which is harmless since the
                    // release queries are conditional on status = 'held'.
                }
                Err(e) => {
                    tracing::error!(intent_id = %intent.id, error = %e, "reaper: failed to transition intent");
                }
            }
        }

        // Defensive sweep: a seat or lounge hold whose `held_until` has
        // passed but whose owning intent never got here (e.g. partial
        // commit during a crash) is released directly rather than left
        // dangling.
        let orphaned_seats = trips::find_seats_held_past(&self.pool, now)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        for seat in &orphaned_seats {
            if let Some(intent_id) = seat.intent_id {
                if trips::release_seats(&self.pool, &[seat.id], intent_id)
                    .await
                    .is_ok()
                {
                    summary.orphaned_seats_released += 1;
                }
            }
        }

        // Step 3: a lounge hold's own `held_until` is independent of its
        // intent's TTL, so it gets its own direct sweep — skipping any
        // whose intent already made it to `confirmed` (spec §4.4 step 3).
        let orphaned_holds = lounges::find_holds_held_past(&self.pool, now)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        for hold in &orphaned_holds {
            match lounges::release_hold(&self.pool, hold.id).await {
                Ok(true) => {
                    summary.orphaned_lounge_holds_released += 1;
                    tracing::info!(hold_id = %hold.id, "reaper: released lounge hold");
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(hold_id = %hold.id, error = %e, "reaper: failed to release lounge hold");
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_defaults_to_zero() {
        let summary = ReaperSummary::default();
        assert_eq!(summary.intents_expired, 0);
        assert_eq!(summary.orphaned_seats_released, 0);
        assert_eq!(summary.orphaned_lounge_holds_released, 0);
    }
}
