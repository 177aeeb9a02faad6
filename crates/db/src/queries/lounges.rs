use crate::models::{Lounge, LoungeCapacityHold};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Lounge>> {
    let lounge = sqlx::query_as::<_, Lounge>("SELECT * FROM lounges WHERE id = $1 AND active = true")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(lounge)
}

/// Sums guest counts of confirmed/held reservations whose window overlaps
/// the requested one, locking the lounge row first so two concurrent holds
/// can't both read the same headroom (spec occupancy invariant).
pub async fn occupancy_for_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    lounge_id: Uuid,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<i64> {
    sqlx::query("SELECT id FROM lounges WHERE id = $1 FOR UPDATE")
        .bind(lounge_id)
        .fetch_one(&mut **tx)
        .await?;

    let occupancy: (Option<i64>,) = sqlx::query_as(
        r#"
        SELECT SUM(guests_count)
        FROM lounge_capacity_holds
        WHERE lounge_id = $1
          AND status IN ('held', 'confirmed')
          AND window_start < $3
          AND window_end > $2
        "#,
    )
    .bind(lounge_id)
    .bind(window_start)
    .bind(window_end)
    .fetch_one(&mut **tx)
    .await?;

    Ok(occupancy.0.unwrap_or(0))
}

pub async fn create_hold(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    lounge_id: Uuid,
    intent_id: Uuid,
    guests_count: i32,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    held_until: DateTime<Utc>,
) -> Result<LoungeCapacityHold> {
    let hold = sqlx::query_as::<_, LoungeCapacityHold>(
        r#"
        INSERT INTO lounge_capacity_holds
            (lounge_id, intent_id, guests_count, window_start, window_end, status, held_until)
        VALUES ($1, $2, $3, $4, $5, 'held', $6)
        RETURNING *
        "#,
    )
    .bind(lounge_id)
    .bind(intent_id)
    .bind(guests_count)
    .bind(window_start)
    .bind(window_end)
    .bind(held_until)
    .fetch_one(&mut **tx)
    .await?;

    Ok(hold)
}

pub async fn release_holds_for_intent(pool: &PgPool, intent_id: Uuid) -> Result<()> {
    sqlx::query(
        "UPDATE lounge_capacity_holds SET status = 'released' WHERE intent_id = $1 AND status = 'held'",
    )
    .bind(intent_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn confirm_holds_for_intent(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    intent_id: Uuid,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE lounge_capacity_holds SET status = 'confirmed' WHERE intent_id = $1 AND status = 'held'",
    )
    .bind(intent_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

/// Reaper step 3 (spec §4.4): lounge holds whose TTL has passed and whose
/// owning intent never reached `confirmed` — a confirmed intent's holds
/// were already flipped to `confirmed` by `confirm_holds_for_intent`, so in
/// practice this only ever catches `held` rows, but the intent-status join
/// guards against a race where confirm is still in flight.
pub async fn find_holds_held_past(pool: &PgPool, before: DateTime<Utc>) -> Result<Vec<LoungeCapacityHold>> {
    let holds = sqlx::query_as::<_, LoungeCapacityHold>(
        r#"
        SELECT h.* FROM lounge_capacity_holds h
        JOIN booking_intents i ON i.id = h.intent_id
        WHERE h.status = 'held' AND h.held_until < $1 AND i.status != 'confirmed'
        "#,
    )
    .bind(before)
    .fetch_all(pool)
    .await?;

    Ok(holds)
}

/// Marks a single lounge hold released — used by the Reaper's per-row sweep
/// so one hold's release never blocks on another's.
pub async fn release_hold(pool: &PgPool, hold_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE lounge_capacity_holds SET status = 'released' WHERE id = $1 AND status = 'held'",
    )
    .bind(hold_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
