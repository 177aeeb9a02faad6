use crate::models::{BookingIntent, BusBooking, LoungeBooking};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use transit_types::PricingSnapshot;
use uuid::Uuid;

pub async fn find_by_idempotency_key(
    pool: &PgPool,
    user_id: Uuid,
    idempotency_key: Uuid,
) -> Result<Option<BookingIntent>> {
    let intent = sqlx::query_as::<_, BookingIntent>(
        "SELECT * FROM booking_intents WHERE user_id = $1 AND idempotency_key = $2",
    )
    .bind(user_id)
    .bind(idempotency_key)
    .fetch_optional(pool)
    .await?;

    Ok(intent)
}

pub async fn create(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
    idempotency_key: Uuid,
    intent_type: &str,
    pricing: &PricingSnapshot,
    held_until: DateTime<Utc>,
) -> Result<BookingIntent> {
    let intent = sqlx::query_as::<_, BookingIntent>(
        r#"
        INSERT INTO booking_intents
            (user_id, idempotency_key, intent_type, status, pricing, held_until)
        VALUES ($1, $2, $3, 'held', $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(idempotency_key)
    .bind(intent_type)
    .bind(Json(pricing.clone()))
    .bind(held_until)
    .fetch_one(&mut **tx)
    .await?;

    Ok(intent)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<BookingIntent>> {
    let intent = sqlx::query_as::<_, BookingIntent>("SELECT * FROM booking_intents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(intent)
}

pub async fn find_by_id_for_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: Uuid,
) -> Result<Option<BookingIntent>> {
    let intent = sqlx::query_as::<_, BookingIntent>(
        "SELECT * FROM booking_intents WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(intent)
}

/// Conditional CAS transition — the only way the Orchestrator mutates intent
/// status, so a step applied twice (retry, racing Reaper tick) is a no-op.
pub async fn transition_status(
    pool: &PgPool,
    id: Uuid,
    expected: &str,
    next: &str,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE booking_intents SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
    )
    .bind(id)
    .bind(expected)
    .bind(next)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn transition_status_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: Uuid,
    expected: &str,
    next: &str,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE booking_intents SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
    )
    .bind(id)
    .bind(expected)
    .bind(next)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Records the gateway's checkout acknowledgement at InitiatePayment time —
/// `payment_uid`/`payment_status` are what a later webhook notification is
/// cross-checked against before its payload is trusted (spec §4.8).
pub async fn set_payment_fields(
    pool: &PgPool,
    id: Uuid,
    invoice_id: &str,
    payment_deadline: DateTime<Utc>,
    payment_uid: &str,
    payment_status: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE booking_intents
        SET invoice_id = $2, payment_deadline = $3, payment_uid = $4, payment_status = $5,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(invoice_id)
    .bind(payment_deadline)
    .bind(payment_uid)
    .bind(payment_status)
    .execute(pool)
    .await?;

    Ok(())
}

/// Correlates an inbound gateway webhook back to the intent that initiated
/// payment — the design is to locate by the `payment_uid` recorded at
/// InitiatePayment rather than by invoice id, since `payment_uid` is the
/// field the webhook cross-check is actually keyed on.
pub async fn find_by_payment_uid(pool: &PgPool, payment_uid: &str) -> Result<Option<BookingIntent>> {
    let intent = sqlx::query_as::<_, BookingIntent>(
        "SELECT * FROM booking_intents WHERE payment_uid = $1",
    )
    .bind(payment_uid)
    .fetch_optional(pool)
    .await?;

    Ok(intent)
}

/// Appends a lounge leg's price to the frozen snapshot and extends the
/// intent's TTL — the only write `AddLoungeToIntent` makes against the
/// intent row itself (seat/lounge holds are extended separately).
pub async fn update_pricing_and_extend(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: Uuid,
    pricing: &PricingSnapshot,
    held_until: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        "UPDATE booking_intents SET pricing = $2, held_until = $3, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(Json(pricing.clone()))
    .bind(held_until)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn find_expired_holds(pool: &PgPool, before: DateTime<Utc>) -> Result<Vec<BookingIntent>> {
    let intents = sqlx::query_as::<_, BookingIntent>(
        "SELECT * FROM booking_intents WHERE status IN ('held', 'payment_pending') AND held_until < $1",
    )
    .bind(before)
    .fetch_all(pool)
    .await?;

    Ok(intents)
}

pub async fn create_bus_booking(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    intent_id: Uuid,
    scheduled_trip_id: Uuid,
    booking_code: &str,
    seat_ids: &[Uuid],
) -> Result<BusBooking> {
    let booking = sqlx::query_as::<_, BusBooking>(
        r#"
        INSERT INTO bus_bookings (intent_id, scheduled_trip_id, booking_code, seat_ids)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(intent_id)
    .bind(scheduled_trip_id)
    .bind(booking_code)
    .bind(seat_ids)
    .fetch_one(&mut **tx)
    .await?;

    Ok(booking)
}

pub async fn create_lounge_booking(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    intent_id: Uuid,
    lounge_id: Uuid,
    booking_code: &str,
    guests_count: i32,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<LoungeBooking> {
    let booking = sqlx::query_as::<_, LoungeBooking>(
        r#"
        INSERT INTO lounge_bookings
            (intent_id, lounge_id, booking_code, guests_count, window_start, window_end)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(intent_id)
    .bind(lounge_id)
    .bind(booking_code)
    .bind(guests_count)
    .bind(window_start)
    .bind(window_end)
    .fetch_one(&mut **tx)
    .await?;

    Ok(booking)
}

pub async fn find_bus_booking_for_intent(
    pool: &PgPool,
    intent_id: Uuid,
) -> Result<Option<BusBooking>> {
    let booking = sqlx::query_as::<_, BusBooking>(
        "SELECT * FROM bus_bookings WHERE intent_id = $1",
    )
    .bind(intent_id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn find_lounge_bookings_for_intent(
    pool: &PgPool,
    intent_id: Uuid,
) -> Result<Vec<LoungeBooking>> {
    let bookings = sqlx::query_as::<_, LoungeBooking>(
        "SELECT * FROM lounge_bookings WHERE intent_id = $1",
    )
    .bind(intent_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
