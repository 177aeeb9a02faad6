use crate::models::{BusSchedule, ScheduledTrip, SeatLayoutTemplate, TripSeat};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub async fn list_active_schedules(pool: &PgPool) -> Result<Vec<BusSchedule>> {
    let schedules = sqlx::query_as::<_, BusSchedule>(
        "SELECT * FROM bus_schedules WHERE active = true",
    )
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

pub async fn find_seat_layout(pool: &PgPool, id: Uuid) -> Result<Option<SeatLayoutTemplate>> {
    let layout = sqlx::query_as::<_, SeatLayoutTemplate>(
        "SELECT * FROM seat_layout_templates WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(layout)
}

pub async fn find_trip_for_schedule_and_date(
    pool: &PgPool,
    bus_schedule_id: Uuid,
    departure_date: NaiveDate,
) -> Result<Option<ScheduledTrip>> {
    let trip = sqlx::query_as::<_, ScheduledTrip>(
        "SELECT * FROM scheduled_trips WHERE bus_schedule_id = $1 AND departure_date = $2",
    )
    .bind(bus_schedule_id)
    .bind(departure_date)
    .fetch_optional(pool)
    .await?;

    Ok(trip)
}

/// Inserts one TripSeat per entry in a layout template's seat map. Shared by
/// trip creation and layout re-binding so both populate seats the same way.
async fn insert_seats_for_trip(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    trip_id: Uuid,
    layout: &SeatLayoutTemplate,
    base_price: rust_decimal::Decimal,
) -> Result<()> {
    let seats: Vec<(String, String)> = layout
        .layout
        .0
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|v| {
                    (
                        v.get("seat_number")
                            .and_then(|x| x.as_str())
                            .unwrap_or("")
                            .to_string(),
                        v.get("seat_type")
                            .and_then(|x| x.as_str())
                            .unwrap_or("standard")
                            .to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    for (seat_number, seat_type) in seats {
        sqlx::query(
            r#"
            INSERT INTO trip_seats (scheduled_trip_id, seat_number, seat_type, status, price)
            VALUES ($1, $2, $3, 'available', $4)
            "#,
        )
        .bind(trip_id)
        .bind(seat_number)
        .bind(seat_type)
        .bind(base_price)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Materializes a trip and its seat rows from a schedule + layout in one
/// transaction so a trip never exists without its full seat set.
pub async fn create_trip_with_seats(
    pool: &PgPool,
    bus_schedule_id: Uuid,
    departure_date: NaiveDate,
    departure_at: DateTime<Utc>,
    assignment_deadline: DateTime<Utc>,
    origin: &str,
    destination: &str,
    base_price: rust_decimal::Decimal,
    layout: &SeatLayoutTemplate,
) -> Result<ScheduledTrip> {
    let mut tx = pool.begin().await?;

    let trip = sqlx::query_as::<_, ScheduledTrip>(
        r#"
        INSERT INTO scheduled_trips
            (bus_schedule_id, departure_date, departure_at, assignment_deadline, origin,
             destination, status, seats_total, seats_available)
        VALUES ($1, $2, $3, $4, $5, $6, 'scheduled', $7, $7)
        RETURNING *
        "#,
    )
    .bind(bus_schedule_id)
    .bind(departure_date)
    .bind(departure_at)
    .bind(assignment_deadline)
    .bind(origin)
    .bind(destination)
    .bind(layout.seat_count)
    .fetch_one(&mut *tx)
    .await?;

    insert_seats_for_trip(&mut tx, trip.id, layout, base_price).await?;

    tx.commit().await?;
    Ok(trip)
}

pub async fn find_schedule_by_id(pool: &PgPool, id: Uuid) -> Result<Option<BusSchedule>> {
    let schedule = sqlx::query_as::<_, BusSchedule>("SELECT * FROM bus_schedules WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(schedule)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ScheduledTrip>> {
    let trip = sqlx::query_as::<_, ScheduledTrip>("SELECT * FROM scheduled_trips WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(trip)
}

pub async fn search(
    pool: &PgPool,
    origin: Option<&str>,
    destination: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<Vec<ScheduledTrip>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT * FROM scheduled_trips WHERE status IN ('scheduled', 'confirmed')",
    );

    if let Some(origin) = origin {
        qb.push(" AND origin = ");
        qb.push_bind(origin.to_string());
    }
    if let Some(destination) = destination {
        qb.push(" AND destination = ");
        qb.push_bind(destination.to_string());
    }
    match date {
        Some(date) => {
            qb.push(" AND departure_date = ");
            qb.push_bind(date);
        }
        None => {
            qb.push(" AND departure_date >= CURRENT_DATE");
        }
    }
    qb.push(" ORDER BY departure_at ASC");

    let trips = qb.build_query_as::<ScheduledTrip>().fetch_all(pool).await?;
    Ok(trips)
}

pub async fn list_seats_for_trip(pool: &PgPool, trip_id: Uuid) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>(
        "SELECT * FROM trip_seats WHERE scheduled_trip_id = $1 ORDER BY seat_number",
    )
    .bind(trip_id)
    .fetch_all(pool)
    .await?;

    Ok(seats)
}

pub async fn find_seats_for_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    seat_ids: &[Uuid],
) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>(
        "SELECT * FROM trip_seats WHERE id = ANY($1) FOR UPDATE",
    )
    .bind(seat_ids)
    .fetch_all(&mut **tx)
    .await?;

    Ok(seats)
}

/// Conditional CAS: only holds seats that are still `available`, returning
/// exactly the rows that succeeded so the caller can detect partial holds.
pub async fn hold_seats(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    seat_ids: &[Uuid],
    intent_id: Uuid,
    held_until: DateTime<Utc>,
) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>(
        r#"
        UPDATE trip_seats
        SET status = 'held', intent_id = $2, held_until = $3
        WHERE id = ANY($1) AND status = 'available'
        RETURNING *
        "#,
    )
    .bind(seat_ids)
    .bind(intent_id)
    .bind(held_until)
    .fetch_all(&mut **tx)
    .await?;

    Ok(seats)
}

pub async fn release_seats(pool: &PgPool, seat_ids: &[Uuid], intent_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE trip_seats
        SET status = 'available', intent_id = NULL, held_until = NULL
        WHERE id = ANY($1) AND intent_id = $2 AND status = 'held'
        "#,
    )
    .bind(seat_ids)
    .bind(intent_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn book_seats(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    seat_ids: &[Uuid],
    intent_id: Uuid,
) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>(
        r#"
        UPDATE trip_seats
        SET status = 'booked', held_until = NULL
        WHERE id = ANY($1) AND intent_id = $2 AND status = 'held'
        RETURNING *
        "#,
    )
    .bind(seat_ids)
    .bind(intent_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(seats)
}

pub async fn find_seats_by_ids(pool: &PgPool, seat_ids: &[Uuid]) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>("SELECT * FROM trip_seats WHERE id = ANY($1)")
        .bind(seat_ids)
        .fetch_all(pool)
        .await?;

    Ok(seats)
}

/// Non-mutating extension of an already-held seat's TTL — conditional on
/// the seat still being held by this exact intent (spec §4.2 ExtendSeatHolds).
pub async fn extend_seat_holds(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    seat_ids: &[Uuid],
    intent_id: Uuid,
    new_held_until: DateTime<Utc>,
) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>(
        r#"
        UPDATE trip_seats
        SET held_until = $3
        WHERE id = ANY($1) AND intent_id = $2 AND status = 'held'
        RETURNING *
        "#,
    )
    .bind(seat_ids)
    .bind(intent_id)
    .bind(new_held_until)
    .fetch_all(&mut **tx)
    .await?;

    Ok(seats)
}

/// Administrative override: available -> blocked. Conditional on current
/// status so a seat already held/booked can't be silently yanked.
pub async fn block_seats(pool: &PgPool, seat_ids: &[Uuid]) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>(
        r#"
        UPDATE trip_seats
        SET status = 'blocked', intent_id = NULL, held_until = NULL
        WHERE id = ANY($1) AND status = 'available'
        RETURNING *
        "#,
    )
    .bind(seat_ids)
    .fetch_all(pool)
    .await?;

    Ok(seats)
}

/// Administrative override: blocked -> available.
pub async fn unblock_seats(pool: &PgPool, seat_ids: &[Uuid]) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>(
        r#"
        UPDATE trip_seats
        SET status = 'available'
        WHERE id = ANY($1) AND status = 'blocked'
        RETURNING *
        "#,
    )
    .bind(seat_ids)
    .fetch_all(pool)
    .await?;

    Ok(seats)
}

pub async fn find_seats_held_past(pool: &PgPool, before: DateTime<Utc>) -> Result<Vec<TripSeat>> {
    let seats = sqlx::query_as::<_, TripSeat>(
        "SELECT * FROM trip_seats WHERE status = 'held' AND held_until < $1",
    )
    .bind(before)
    .fetch_all(pool)
    .await?;

    Ok(seats)
}

pub async fn decrement_seats_available(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    trip_id: Uuid,
    count: i32,
) -> Result<()> {
    sqlx::query("UPDATE scheduled_trips SET seats_available = seats_available - $2 WHERE id = $1")
        .bind(trip_id)
        .bind(count)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn increment_seats_available(pool: &PgPool, trip_id: Uuid, count: i32) -> Result<()> {
    sqlx::query("UPDATE scheduled_trips SET seats_available = seats_available + $2 WHERE id = $1")
        .bind(trip_id)
        .bind(count)
        .execute(pool)
        .await?;

    Ok(())
}

/// Conditional on the crew assignment cutoff not having passed — a trip
/// past its `assignment_deadline` returns no row rather than silently
/// reassigning crew minutes before departure.
pub async fn assign_crew(
    pool: &PgPool,
    trip_id: Uuid,
    driver_id: Option<Uuid>,
    conductor_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Option<ScheduledTrip>> {
    let trip = sqlx::query_as::<_, ScheduledTrip>(
        r#"
        UPDATE scheduled_trips
        SET driver_id = COALESCE($2, driver_id), conductor_id = COALESCE($3, conductor_id)
        WHERE id = $1 AND assignment_deadline > $4
        RETURNING *
        "#,
    )
    .bind(trip_id)
    .bind(driver_id)
    .bind(conductor_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(trip)
}

/// Deletes every TripSeat for a trip. Callers must confirm none are
/// booked/held first — this performs no such check itself.
pub async fn delete_seats_for_trip(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    trip_id: Uuid,
) -> Result<()> {
    sqlx::query("DELETE FROM trip_seats WHERE scheduled_trip_id = $1")
        .bind(trip_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Re-populates a trip's seats from a new layout template and resets its
/// seat counters to match. Part of the Trip Generator's second binding phase.
pub async fn rebind_trip_layout(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    trip_id: Uuid,
    layout: &SeatLayoutTemplate,
    base_price: rust_decimal::Decimal,
) -> Result<()> {
    delete_seats_for_trip(tx, trip_id).await?;
    insert_seats_for_trip(tx, trip_id, layout, base_price).await?;

    sqlx::query("UPDATE scheduled_trips SET seats_total = $2, seats_available = $2 WHERE id = $1")
        .bind(trip_id)
        .bind(layout.seat_count)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn delete_old_trips(pool: &PgPool, before: NaiveDate) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM scheduled_trips WHERE departure_date < $1 AND status IN ('completed', 'cancelled')",
    )
    .bind(before)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
