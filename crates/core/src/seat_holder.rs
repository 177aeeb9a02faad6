//! Seat-Hold Engine: the only module allowed to move `trip_seats.status`.
//!
//! Holds are conditional CAS updates (`WHERE status = 'available'`) so two
//! concurrent CreateIntent calls racing for the same seat can never both
//! succeed — grounded in the teacher's `decrement_available_slots` pattern,
//! generalized from a counter to per-row seat state.

use chrono::{DateTime, Utc};
use transit_db::models::TripSeat;
use transit_types::AppError;
use uuid::Uuid;

pub struct SeatHolder;

impl SeatHolder {
    /// Attempts to hold every requested seat inside the given transaction.
    /// If any seat in the selection is no longer available, rolls back the
    /// partial holds the caller already applied within this transaction
    /// (the caller is expected to abort/rollback the whole transaction on
    /// `Err` — holds are never partially committed).
    pub async fn hold(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        seat_ids: &[Uuid],
        intent_id: Uuid,
        held_until: DateTime<Utc>,
    ) -> Result<Vec<TripSeat>, AppError> {
        let held = transit_db::queries::trips::hold_seats(tx, seat_ids, intent_id, held_until)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if held.len() != seat_ids.len() {
            let held_ids: Vec<Uuid> = held.iter().map(|s| s.id).collect();
            let losing: Vec<Uuid> = seat_ids
                .iter()
                .copied()
                .filter(|id| !held_ids.contains(id))
                .collect();
            return Err(AppError::SeatsTaken { seat_ids: losing });
        }

        Ok(held)
    }

    pub async fn release(
        pool: &sqlx::PgPool,
        seat_ids: &[Uuid],
        intent_id: Uuid,
    ) -> Result<(), AppError> {
        transit_db::queries::trips::release_seats(pool, seat_ids, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub async fn book(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        seat_ids: &[Uuid],
        intent_id: Uuid,
    ) -> Result<Vec<TripSeat>, AppError> {
        let booked = transit_db::queries::trips::book_seats(tx, seat_ids, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if booked.len() != seat_ids.len() {
            return Err(AppError::IntentNotHoldable);
        }

        Ok(booked)
    }

    /// Non-mutating probe: partitions the requested ids into available and
    /// unavailable, used for error reporting rather than a reservation
    /// attempt (spec §4.2 CheckAvailable).
    pub async fn check_available(
        pool: &sqlx::PgPool,
        seat_ids: &[Uuid],
    ) -> Result<(Vec<Uuid>, Vec<Uuid>), AppError> {
        let seats = transit_db::queries::trips::find_seats_by_ids(pool, seat_ids)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let available_ids: std::collections::HashSet<Uuid> = seats
            .iter()
            .filter(|s| s.status == "available")
            .map(|s| s.id)
            .collect();

        let (available, unavailable) = seat_ids
            .iter()
            .copied()
            .partition(|id| available_ids.contains(id));

        Ok((available, unavailable))
    }

    /// Pushes out the TTL of seats already held by `intent_id` — refuses if
    /// any requested seat isn't currently held by that exact intent, since
    /// extension is only sanctioned for an intent's own holds (spec §4.2
    /// ExtendSeatHolds; the AddLoungeToIntent path depends on this).
    pub async fn extend_holds(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        seat_ids: &[Uuid],
        intent_id: Uuid,
        new_held_until: DateTime<Utc>,
    ) -> Result<Vec<TripSeat>, AppError> {
        let extended =
            transit_db::queries::trips::extend_seat_holds(tx, seat_ids, intent_id, new_held_until)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;

        if extended.len() != seat_ids.len() {
            return Err(AppError::IntentNotHoldable);
        }

        Ok(extended)
    }

    /// Administrative override: available -> blocked. Rejects (as a
    /// shortfall, mirroring `hold`'s partial-failure handling) if any
    /// requested seat isn't currently available.
    pub async fn block(pool: &sqlx::PgPool, seat_ids: &[Uuid]) -> Result<Vec<TripSeat>, AppError> {
        let blocked = transit_db::queries::trips::block_seats(pool, seat_ids)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if blocked.len() != seat_ids.len() {
            return Err(AppError::Conflict(
                "one or more seats are not available to block".to_string(),
            ));
        }

        Ok(blocked)
    }

    /// Administrative override: blocked -> available.
    pub async fn unblock(pool: &sqlx::PgPool, seat_ids: &[Uuid]) -> Result<Vec<TripSeat>, AppError> {
        let unblocked = transit_db::queries::trips::unblock_seats(pool, seat_ids)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if unblocked.len() != seat_ids.len() {
            return Err(AppError::Conflict(
                "one or more seats are not blocked".to_string(),
            ));
        }

        Ok(unblocked)
    }
}
