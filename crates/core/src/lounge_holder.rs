//! Lounge-Capacity Holder: checks and reserves lounge occupancy over a
//! caller-supplied time window.
//!
//! Occupancy is computed by locking the lounge row first (`FOR UPDATE`),
//! mirroring the teacher's `find_by_id_for_update` pattern for sessions,
//! then summing overlapping held/confirmed holds before inserting a new
//! one — this makes the check-then-insert atomic per lounge.

use chrono::{DateTime, Utc};
use transit_db::models::LoungeCapacityHold;
use transit_types::AppError;
use uuid::Uuid;

pub struct LoungeHolder;

impl LoungeHolder {
    pub async fn hold(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        lounge_id: Uuid,
        intent_id: Uuid,
        capacity: i32,
        guests_count: i32,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        held_until: DateTime<Utc>,
    ) -> Result<LoungeCapacityHold, AppError> {
        let occupancy =
            transit_db::queries::lounges::occupancy_for_update(tx, lounge_id, window_start, window_end)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;

        if occupancy + guests_count as i64 > capacity as i64 {
            return Err(AppError::LoungeCapacityExceeded);
        }

        transit_db::queries::lounges::create_hold(
            tx,
            lounge_id,
            intent_id,
            guests_count,
            window_start,
            window_end,
            held_until,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub async fn release(pool: &sqlx::PgPool, intent_id: Uuid) -> Result<(), AppError> {
        transit_db::queries::lounges::release_holds_for_intent(pool, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub async fn confirm(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        intent_id: Uuid,
    ) -> Result<u64, AppError> {
        transit_db::queries::lounges::confirm_holds_for_intent(tx, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
