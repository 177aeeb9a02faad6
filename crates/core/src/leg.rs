//! `IntentLeg` folds a BookingIntent's heterogeneous legs (bus seats, a
//! pre-lounge reservation, a post-lounge reservation) behind one interface
//! so the Orchestrator never branches on which legs are present — it just
//! holds/releases/confirms whichever legs got built for a given request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use transit_types::pricing::{BusLegPrice, LoungeLegPrice, SeatPrice};
use transit_types::AppError;

use crate::codes::{generate_bus_booking_code, generate_lounge_booking_code};
use crate::lounge_holder::LoungeHolder;
use crate::seat_holder::SeatHolder;

#[async_trait]
pub trait IntentLeg: Send + Sync {
    /// Reserves this leg's resources; returns the priced subtotal.
    async fn hold(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        intent_id: Uuid,
        held_until: DateTime<Utc>,
    ) -> Result<Decimal, AppError>;

    async fn release(&self, pool: &sqlx::PgPool, intent_id: Uuid) -> Result<(), AppError>;

    /// Converts the hold into a permanent booking; returns the booking code.
    /// A failure here is only fatal for the bus leg — lounge leg failures
    /// at confirm time are logged and surfaced separately (see Orchestrator::confirm).
    async fn confirm(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        intent_id: Uuid,
    ) -> Result<String, AppError>;
}

pub struct BusLeg {
    pub scheduled_trip_id: Uuid,
    pub seat_ids: Vec<Uuid>,
}

#[async_trait]
impl IntentLeg for BusLeg {
    async fn hold(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        intent_id: Uuid,
        held_until: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        let seats = SeatHolder::hold(tx, &self.seat_ids, intent_id, held_until).await?;
        transit_db::queries::trips::decrement_seats_available(tx, self.scheduled_trip_id, seats.len() as i32)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(seats.iter().map(|s| s.price).sum())
    }

    async fn release(&self, pool: &sqlx::PgPool, intent_id: Uuid) -> Result<(), AppError> {
        SeatHolder::release(pool, &self.seat_ids, intent_id).await?;
        transit_db::queries::trips::increment_seats_available(
            pool,
            self.scheduled_trip_id,
            self.seat_ids.len() as i32,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn confirm(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        intent_id: Uuid,
    ) -> Result<String, AppError> {
        let booked = SeatHolder::book(tx, &self.seat_ids, intent_id).await?;
        let code = generate_bus_booking_code();
        let seat_ids: Vec<Uuid> = booked.iter().map(|s| s.id).collect();
        transit_db::queries::intents::create_bus_booking(
            tx,
            intent_id,
            self.scheduled_trip_id,
            &code,
            &seat_ids,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(code)
    }
}

impl BusLeg {
    pub fn price_snapshot(&self, seat_prices: Vec<SeatPrice>) -> BusLegPrice {
        let subtotal = seat_prices.iter().map(|s| s.price).sum();
        BusLegPrice {
            scheduled_trip_id: self.scheduled_trip_id,
            seats: seat_prices,
            subtotal,
        }
    }
}

pub struct LoungeLeg {
    pub lounge_id: Uuid,
    pub capacity: i32,
    pub pricing_type: String,
    pub guests_count: i32,
    pub price_per_guest: Decimal,
    pub pre_order_total: Decimal,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

#[async_trait]
impl IntentLeg for LoungeLeg {
    async fn hold(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        intent_id: Uuid,
        held_until: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        LoungeHolder::hold(
            tx,
            self.lounge_id,
            intent_id,
            self.capacity,
            self.guests_count,
            self.window_start,
            self.window_end,
            held_until,
        )
        .await?;

        Ok(self.subtotal())
    }

    async fn release(&self, pool: &sqlx::PgPool, intent_id: Uuid) -> Result<(), AppError> {
        LoungeHolder::release(pool, intent_id).await
    }

    async fn confirm(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        intent_id: Uuid,
    ) -> Result<String, AppError> {
        let confirmed = LoungeHolder::confirm(tx, intent_id).await?;
        if confirmed == 0 {
            return Err(AppError::IntentNotHoldable);
        }

        let code = generate_lounge_booking_code();
        transit_db::queries::intents::create_lounge_booking(
            tx,
            intent_id,
            self.lounge_id,
            &code,
            self.guests_count,
            self.window_start,
            self.window_end,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(code)
    }
}

impl LoungeLeg {
    pub fn subtotal(&self) -> Decimal {
        self.price_per_guest * Decimal::from(self.guests_count) + self.pre_order_total
    }

    pub fn price_snapshot(&self) -> LoungeLegPrice {
        LoungeLegPrice {
            lounge_id: self.lounge_id,
            pricing_type: self.pricing_type.clone(),
            guests_count: self.guests_count,
            price_per_guest: self.price_per_guest,
            pre_order_total: self.pre_order_total,
            subtotal: self.subtotal(),
        }
    }
}

/// Releases every leg recorded in an intent's pricing snapshot. Shared by
/// `Orchestrator::cancel` and the `ExpirationReaper` so both tear down a
/// dead intent's holds the same way.
pub(crate) async fn release_all_legs(
    pool: &sqlx::PgPool,
    intent: &transit_db::models::BookingIntent,
) -> Result<(), AppError> {
    if let Some(bus) = &intent.pricing.0.bus {
        let seat_ids: Vec<Uuid> = bus.seats.iter().map(|s| s.seat_id).collect();
        let leg = BusLeg {
            scheduled_trip_id: bus.scheduled_trip_id,
            seat_ids,
        };
        leg.release(pool, intent.id).await?;
    }
    if intent.pricing.0.pre_lounge.is_some() || intent.pricing.0.post_lounge.is_some() {
        transit_db::queries::lounges::release_holds_for_intent(pool, intent.id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    Ok(())
}
