//! Booking Orchestrator: the three-phase Intent -> Payment -> Confirm
//! protocol. Every status move is a conditional CAS update
//! (`transition_status`) so a step replayed by a client retry or raced by
//! the Expiration Reaper is a no-op rather than a double-apply — the same
//! discipline the teacher applies to `available_slots`, generalized from a
//! counter to a state machine.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use transit_db::models::BookingIntent;
use transit_db::queries::{intents as intent_queries, lounges, trips};
use transit_db::Pool;
use transit_integrations::payment_gateway::{PaymentGateway, PaymentNotification};
use transit_types::api::intents::{
    AddLoungeRequest, BookingReferenceResponse, CreateIntentRequest, InitiatePaymentResponse,
    IntentResponse,
};
use transit_types::enums::IntentType;
use transit_types::pricing::{BusLegPrice, LoungeLegPrice, PricingSnapshot, SeatPrice};
use transit_types::validation::{validate_lounge_window, validate_seat_ids};
use transit_types::{AppError, Config};

use crate::leg::{release_all_legs, BusLeg, IntentLeg, LoungeLeg};
use crate::seat_holder::SeatHolder;

pub struct Orchestrator {
    pool: Pool,
    config: Config,
}

/// Intent states `ConfirmBooking` is allowed to run from (spec §4.1).
const CONFIRMABLE_STATUSES: [&str; 3] = ["held", "payment_pending", "payment_confirmed"];

impl Orchestrator {
    pub fn new(pool: Pool, config: Config) -> Self {
        Self { pool, config }
    }

    fn intent_type_for(req: &CreateIntentRequest) -> IntentType {
        match (
            req.pre_lounge.is_some(),
            req.post_lounge.is_some(),
            req.scheduled_trip_id.is_some(),
        ) {
            (true, true, true) => IntentType::BusWithBoth,
            (true, false, true) => IntentType::BusWithPreLounge,
            (false, true, true) => IntentType::BusWithPostLounge,
            (false, false, true) => IntentType::BusOnly,
            _ => IntentType::LoungeOnly,
        }
    }

    /// Prices every leg named in the request, then inserts the intent row
    /// and holds each leg's resources in one transaction — the intent row
    /// is written first so the holds can carry its id, but nothing commits
    /// until every hold succeeds, so a failed hold rolls the intent insert
    /// back with it.
    pub async fn create_intent(
        &self,
        user_id: Uuid,
        req: CreateIntentRequest,
    ) -> Result<IntentResponse, AppError> {
        if let Some(existing) =
            intent_queries::find_by_idempotency_key(&self.pool, user_id, req.idempotency_key)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
        {
            return Ok(Self::to_response(existing));
        }

        let now = Utc::now();
        let held_until = now + to_chrono_duration(self.config.intent_ttl);

        let mut bus_price: Option<BusLegPrice> = None;
        let mut pre_lounge_price: Option<LoungeLegPrice> = None;
        let mut post_lounge_price: Option<LoungeLegPrice> = None;
        let mut pre_lounge_capacity = 0;
        let mut post_lounge_capacity = 0;

        if req.scheduled_trip_id.is_some() {
            validate_seat_ids(&req.seat_ids).map_err(AppError::Validation)?;
        }
        if let Some(pre) = &req.pre_lounge {
            validate_lounge_window(pre.window_start, pre.window_end).map_err(AppError::Validation)?;
        }
        if let Some(post) = &req.post_lounge {
            validate_lounge_window(post.window_start, post.window_end).map_err(AppError::Validation)?;
        }

        if let Some(trip_id) = req.scheduled_trip_id {
            let trip = trips::find_by_id(&self.pool, trip_id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
                .ok_or_else(|| AppError::NotFound("trip not found".to_string()))?;

            if trip.departure_at <= now {
                return Err(AppError::TripDeparted);
            }
            if trip.status != "scheduled" && trip.status != "confirmed" {
                return Err(AppError::TripUnavailable);
            }

            let (_, unavailable) = SeatHolder::check_available(&self.pool, &req.seat_ids).await?;
            if !unavailable.is_empty() {
                return Err(AppError::SeatsTaken {
                    seat_ids: unavailable,
                });
            }

            let seats = trips::list_seats_for_trip(&self.pool, trip_id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            let seat_prices: Vec<SeatPrice> = seats
                .iter()
                .filter(|s| req.seat_ids.contains(&s.id))
                .map(|s| SeatPrice {
                    seat_id: s.id,
                    seat_number: s.seat_number.clone(),
                    price: s.price,
                })
                .collect();
            if seat_prices.len() != req.seat_ids.len() {
                return Err(AppError::SeatsTaken {
                    seat_ids: req.seat_ids.clone(),
                });
            }

            let subtotal = seat_prices.iter().map(|s| s.price).sum();
            bus_price = Some(BusLegPrice {
                scheduled_trip_id: trip_id,
                seats: seat_prices,
                subtotal,
            });
        }

        if let Some(pre) = &req.pre_lounge {
            let lounge = lounges::find_by_id(&self.pool, pre.lounge_id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
                .ok_or_else(|| AppError::NotFound("lounge not found".to_string()))?;
            pre_lounge_capacity = lounge.capacity;
            let price_per_guest = price_for_tier(&lounge, pre.pricing_type.as_str());
            pre_lounge_price = Some(LoungeLegPrice {
                lounge_id: pre.lounge_id,
                pricing_type: pre.pricing_type.as_str().to_string(),
                guests_count: pre.guests_count,
                price_per_guest,
                pre_order_total: Decimal::ZERO,
                subtotal: price_per_guest * Decimal::from(pre.guests_count),
            });
        }

        if let Some(post) = &req.post_lounge {
            let lounge = lounges::find_by_id(&self.pool, post.lounge_id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
                .ok_or_else(|| AppError::NotFound("lounge not found".to_string()))?;
            post_lounge_capacity = lounge.capacity;
            let price_per_guest = price_for_tier(&lounge, post.pricing_type.as_str());
            post_lounge_price = Some(LoungeLegPrice {
                lounge_id: post.lounge_id,
                pricing_type: post.pricing_type.as_str().to_string(),
                guests_count: post.guests_count,
                price_per_guest,
                pre_order_total: Decimal::ZERO,
                subtotal: price_per_guest * Decimal::from(post.guests_count),
            });
        }

        let mut pricing = PricingSnapshot {
            bus: bus_price,
            pre_lounge: pre_lounge_price,
            post_lounge: post_lounge_price,
            currency: "LKR".to_string(),
            total: Decimal::ZERO,
        };
        pricing.total = pricing.compute_total();

        let intent_type = Self::intent_type_for(&req);
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let intent = intent_queries::create(
            &mut tx,
            user_id,
            req.idempotency_key,
            intent_type.as_str(),
            &pricing,
            held_until,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        if let Some(trip_id) = req.scheduled_trip_id {
            let leg = BusLeg {
                scheduled_trip_id: trip_id,
                seat_ids: req.seat_ids.clone(),
            };
            leg.hold(&mut tx, intent.id, held_until).await?;
        }
        if let Some(pre) = &req.pre_lounge {
            let leg = LoungeLeg {
                lounge_id: pre.lounge_id,
                capacity: pre_lounge_capacity,
                pricing_type: pre.pricing_type.as_str().to_string(),
                guests_count: pre.guests_count,
                price_per_guest: price_for_tier_from_snapshot(&pricing.pre_lounge),
                pre_order_total: Decimal::ZERO,
                window_start: pre.window_start,
                window_end: pre.window_end,
            };
            leg.hold(&mut tx, intent.id, held_until).await?;
        }
        if let Some(post) = &req.post_lounge {
            let leg = LoungeLeg {
                lounge_id: post.lounge_id,
                capacity: post_lounge_capacity,
                pricing_type: post.pricing_type.as_str().to_string(),
                guests_count: post.guests_count,
                price_per_guest: price_for_tier_from_snapshot(&pricing.post_lounge),
                pre_order_total: Decimal::ZERO,
                window_start: post.window_start,
                window_end: post.window_end,
            };
            leg.hold(&mut tx, intent.id, held_until).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        Ok(Self::to_response(intent))
    }

    pub async fn initiate_payment(
        &self,
        intent_id: Uuid,
        user_id: Uuid,
        gateway: &PaymentGateway,
        redirect_url: &str,
    ) -> Result<InitiatePaymentResponse, AppError> {
        let intent = intent_queries::find_by_id(&self.pool, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("intent not found".to_string()))?;

        if intent.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        if Utc::now() > intent.held_until {
            return Err(AppError::IntentExpired);
        }

        let moved =
            intent_queries::transition_status(&self.pool, intent_id, "held", "payment_pending")
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
        if !moved {
            return Err(AppError::IntentNotHoldable);
        }

        let invoice_id = payment_reference_for(intent_id);
        let payment_deadline = Utc::now() + to_chrono_duration(self.config.payment_timeout);

        let checkout = gateway.build_checkout_request(
            &invoice_id,
            intent.pricing.0.total,
            &intent.pricing.0.currency,
            redirect_url,
        );
        let checkout_response = gateway.initiate_checkout(&checkout);

        intent_queries::set_payment_fields(
            &self.pool,
            intent_id,
            &invoice_id,
            payment_deadline,
            &checkout_response.uid,
            &checkout_response.status_indicator,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(InitiatePaymentResponse {
            intent_id,
            invoice_id: checkout.invoice_id,
            gateway_redirect_url: checkout_response.payment_page,
            payment_deadline,
        })
    }

    /// User-invoked confirm entry point (spec §4.1 ConfirmBooking). The
    /// authoritative payment signal is the gateway webhook
    /// (`confirm_from_webhook`); this is the client-callable fallback that
    /// runs the same idempotent core path. `payment_reference` is the
    /// caller's own correlation id and is logged, not verified here.
    pub async fn confirm(
        &self,
        intent_id: Uuid,
        user_id: Uuid,
        payment_reference: &str,
    ) -> Result<BookingReferenceResponse, AppError> {
        let intent = intent_queries::find_by_id(&self.pool, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("intent not found".to_string()))?;

        if intent.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        tracing::info!(intent_id = %intent_id, payment_reference, "user-invoked confirm");
        self.confirm_booking(intent).await
    }

    /// Gateway webhook entry point (Design Note: "the webhook handler
    /// should locate the intent by payment_uid and invoke the same
    /// ConfirmBooking path, which is idempotent by design"). The lookup by
    /// `payment_uid` IS the cross-check against the value recorded at
    /// InitiatePayment — a notification naming a uid nobody initiated
    /// payment with simply matches no row.
    pub async fn confirm_from_webhook(
        &self,
        gateway: &PaymentGateway,
        notification: &PaymentNotification,
    ) -> Result<BookingReferenceResponse, AppError> {
        if !gateway.verify_notification(notification) {
            return Err(AppError::GatewayError(
                "malformed notification: missing uid or invoice_id".to_string(),
            ));
        }
        if !PaymentGateway::notification_succeeded(notification) {
            return Err(AppError::GatewayError(format!(
                "payment not successful: status {}",
                notification.payment_status
            )));
        }

        let intent = intent_queries::find_by_payment_uid(&self.pool, &notification.uid)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("intent not found for payment uid".to_string()))?;

        // Records the gateway's success signal before running the shared
        // confirm path — a no-op (and not an error) if the intent has
        // already moved past payment_pending.
        let _ = intent_queries::transition_status(
            &self.pool,
            intent.id,
            "payment_pending",
            "payment_confirmed",
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        let intent = intent_queries::find_by_id(&self.pool, intent.id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("intent not found".to_string()))?;

        self.confirm_booking(intent).await
    }

    /// Idempotent core of ConfirmBooking, shared by the user-invoked and
    /// webhook-invoked entry points. A failure converting holds to concrete
    /// bus_booking rows is fatal and leaves the intent `confirmation_failed`
    /// with holds intact; a lounge leg's failure is best-effort and simply
    /// drops that leg's booking code from the response.
    async fn confirm_booking(
        &self,
        intent: BookingIntent,
    ) -> Result<BookingReferenceResponse, AppError> {
        if intent.status == "confirmed" {
            return self.booking_reference_for(&intent).await;
        }

        if Utc::now() > intent.held_until {
            return Err(AppError::IntentExpired);
        }

        let expected = intent.status.clone();
        if !CONFIRMABLE_STATUSES.contains(&expected.as_str()) {
            return Err(AppError::IntentNotHoldable);
        }

        let moved =
            intent_queries::transition_status(&self.pool, intent.id, &expected, "confirming")
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
        if !moved {
            // Lost a race with a concurrent confirm; replay idempotently.
            let current = intent_queries::find_by_id(&self.pool, intent.id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
                .ok_or_else(|| AppError::NotFound("intent not found".to_string()))?;
            return self.booking_reference_for(&current).await;
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let mut bus_code = None;
        if let Some(bus) = &intent.pricing.0.bus {
            let seat_ids: Vec<Uuid> = bus.seats.iter().map(|s| s.seat_id).collect();
            let leg = BusLeg {
                scheduled_trip_id: bus.scheduled_trip_id,
                seat_ids,
            };
            match leg.confirm(&mut tx, intent.id).await {
                Ok(code) => bus_code = Some(code),
                Err(e) => {
                    tx.rollback().await.map_err(AppError::Database)?;
                    intent_queries::transition_status(
                        &self.pool,
                        intent.id,
                        "confirming",
                        "confirmation_failed",
                    )
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                    return Err(e);
                }
            }
        }

        let mut pre_code = None;
        if let Some(pre) = &intent.pricing.0.pre_lounge {
            let leg = LoungeLeg {
                lounge_id: pre.lounge_id,
                capacity: 0,
                pricing_type: pre.pricing_type.clone(),
                guests_count: pre.guests_count,
                price_per_guest: pre.price_per_guest,
                pre_order_total: pre.pre_order_total,
                window_start: Utc::now(),
                window_end: Utc::now(),
            };
            pre_code = leg.confirm(&mut tx, intent.id).await.ok();
        }

        let mut post_code = None;
        if let Some(post) = &intent.pricing.0.post_lounge {
            let leg = LoungeLeg {
                lounge_id: post.lounge_id,
                capacity: 0,
                pricing_type: post.pricing_type.clone(),
                guests_count: post.guests_count,
                price_per_guest: post.price_per_guest,
                pre_order_total: post.pre_order_total,
                window_start: Utc::now(),
                window_end: Utc::now(),
            };
            post_code = leg.confirm(&mut tx, intent.id).await.ok();
        }

        tx.commit().await.map_err(AppError::Database)?;

        intent_queries::transition_status(&self.pool, intent.id, "confirming", "confirmed")
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(BookingReferenceResponse {
            intent_id: intent.id,
            bus_booking_code: bus_code,
            pre_lounge_booking_code: pre_code,
            post_lounge_booking_code: post_code,
        })
    }

    /// Reconstructs the booking projection for an already-confirmed intent,
    /// used by both the idempotent replay path and the webhook's
    /// already-confirmed short-circuit.
    async fn booking_reference_for(
        &self,
        intent: &BookingIntent,
    ) -> Result<BookingReferenceResponse, AppError> {
        let bus_code = if intent.pricing.0.bus.is_some() {
            intent_queries::find_bus_booking_for_intent(&self.pool, intent.id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
                .map(|b| b.booking_code)
        } else {
            None
        };

        let lounge_bookings = intent_queries::find_lounge_bookings_for_intent(&self.pool, intent.id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let pre_code = intent.pricing.0.pre_lounge.as_ref().and_then(|pre| {
            lounge_bookings
                .iter()
                .find(|b| b.lounge_id == pre.lounge_id)
                .map(|b| b.booking_code.clone())
        });
        let post_code = intent.pricing.0.post_lounge.as_ref().and_then(|post| {
            lounge_bookings
                .iter()
                .find(|b| b.lounge_id == post.lounge_id && Some(b.booking_code.clone()) != pre_code)
                .map(|b| b.booking_code.clone())
        });

        Ok(BookingReferenceResponse {
            intent_id: intent.id,
            bus_booking_code: bus_code,
            pre_lounge_booking_code: pre_code,
            post_lounge_booking_code: post_code,
        })
    }

    /// The only sanctioned path to grow an intent (spec §4.1
    /// AddLoungeToIntent): appends lounge legs while still `held`, extends
    /// the intent's TTL to `now + intent_ttl`, and extends the already-held
    /// seats' `held_until` to match so the two holds expire together.
    pub async fn add_lounge(
        &self,
        intent_id: Uuid,
        user_id: Uuid,
        req: AddLoungeRequest,
    ) -> Result<IntentResponse, AppError> {
        let intent = intent_queries::find_by_id(&self.pool, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("intent not found".to_string()))?;

        if intent.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        if intent.status != "held" {
            return Err(AppError::IntentNotHoldable);
        }
        if Utc::now() > intent.held_until {
            return Err(AppError::IntentExpired);
        }
        if req.pre_lounge.is_none() && req.post_lounge.is_none() {
            return Err(AppError::Validation(
                "at least one of pre_lounge or post_lounge is required".to_string(),
            ));
        }
        if req.pre_lounge.is_some() && intent.pricing.0.pre_lounge.is_some() {
            return Err(AppError::Conflict(
                "intent already has a pre-trip lounge leg".to_string(),
            ));
        }
        if req.post_lounge.is_some() && intent.pricing.0.post_lounge.is_some() {
            return Err(AppError::Conflict(
                "intent already has a post-trip lounge leg".to_string(),
            ));
        }
        if let Some(pre) = &req.pre_lounge {
            validate_lounge_window(pre.window_start, pre.window_end).map_err(AppError::Validation)?;
        }
        if let Some(post) = &req.post_lounge {
            validate_lounge_window(post.window_start, post.window_end).map_err(AppError::Validation)?;
        }

        let new_held_until = Utc::now() + to_chrono_duration(self.config.intent_ttl);
        let mut pricing = intent.pricing.0.clone();

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(pre) = &req.pre_lounge {
            let lounge = lounges::find_by_id(&self.pool, pre.lounge_id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
                .ok_or_else(|| AppError::NotFound("lounge not found".to_string()))?;
            let leg = LoungeLeg {
                lounge_id: pre.lounge_id,
                capacity: lounge.capacity,
                pricing_type: pre.pricing_type.as_str().to_string(),
                guests_count: pre.guests_count,
                price_per_guest: price_for_tier(&lounge, pre.pricing_type.as_str()),
                pre_order_total: Decimal::ZERO,
                window_start: pre.window_start,
                window_end: pre.window_end,
            };
            leg.hold(&mut tx, intent_id, new_held_until).await?;
            pricing.pre_lounge = Some(leg.price_snapshot());
        }
        if let Some(post) = &req.post_lounge {
            let lounge = lounges::find_by_id(&self.pool, post.lounge_id)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
                .ok_or_else(|| AppError::NotFound("lounge not found".to_string()))?;
            let leg = LoungeLeg {
                lounge_id: post.lounge_id,
                capacity: lounge.capacity,
                pricing_type: post.pricing_type.as_str().to_string(),
                guests_count: post.guests_count,
                price_per_guest: price_for_tier(&lounge, post.pricing_type.as_str()),
                pre_order_total: Decimal::ZERO,
                window_start: post.window_start,
                window_end: post.window_end,
            };
            leg.hold(&mut tx, intent_id, new_held_until).await?;
            pricing.post_lounge = Some(leg.price_snapshot());
        }

        pricing.total = pricing.compute_total();

        intent_queries::update_pricing_and_extend(&mut tx, intent_id, &pricing, new_held_until)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if let Some(bus) = &pricing.bus {
            let seat_ids: Vec<Uuid> = bus.seats.iter().map(|s| s.seat_id).collect();
            SeatHolder::extend_holds(&mut tx, &seat_ids, intent_id, new_held_until).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        let updated = intent_queries::find_by_id(&self.pool, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("intent not found".to_string()))?;

        Ok(Self::to_response(updated))
    }

    pub async fn cancel(&self, intent_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let intent = intent_queries::find_by_id(&self.pool, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("intent not found".to_string()))?;

        if intent.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        let expected = intent.status.clone();
        if expected != "held" && expected != "payment_pending" {
            return Err(AppError::IntentNotHoldable);
        }

        release_all_legs(&self.pool, &intent).await?;

        let moved =
            intent_queries::transition_status(&self.pool, intent_id, &expected, "cancelled")
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
        if !moved {
            return Err(AppError::IntentNotHoldable);
        }

        Ok(())
    }

    pub async fn status(&self, intent_id: Uuid, user_id: Uuid) -> Result<IntentResponse, AppError> {
        let intent = intent_queries::find_by_id(&self.pool, intent_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("intent not found".to_string()))?;

        if intent.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        Ok(Self::to_response(intent))
    }

    fn to_response(intent: transit_db::models::BookingIntent) -> IntentResponse {
        IntentResponse {
            id: intent.id,
            intent_type: intent.intent_type.parse().unwrap_or_default(),
            status: intent.status.parse().unwrap_or_default(),
            pricing: intent.pricing.0,
            held_until: intent.held_until,
            created_at: intent.created_at,
        }
    }
}

fn to_chrono_duration(d: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or(chrono::Duration::zero())
}

/// `INT-<first 8 of intent id>` per spec §4.1.
fn payment_reference_for(intent_id: Uuid) -> String {
    format!("INT-{}", &intent_id.simple().to_string()[..8])
}

fn price_for_tier(lounge: &transit_db::models::Lounge, tier: &str) -> Decimal {
    match tier {
        "2_hours" => lounge.price_two_hours,
        "3_hours" => lounge.price_three_hours,
        "until_bus" => lounge.price_until_bus,
        _ => lounge.price_one_hour,
    }
}

fn price_for_tier_from_snapshot(leg: &Option<LoungeLegPrice>) -> Decimal {
    leg.as_ref().map(|l| l.price_per_guest).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use transit_db::models::Lounge;
    use transit_types::api::intents::LoungeLegRequest;
    use transit_types::enums::LoungePricingType;

    fn lounge() -> Lounge {
        Lounge {
            id: Uuid::nil(),
            operator_id: Uuid::nil(),
            name: "Transit Lounge".into(),
            location: "Colombo".into(),
            capacity: 20,
            price_one_hour: Decimal::new(50000, 2),
            price_two_hours: Decimal::new(90000, 2),
            price_three_hours: Decimal::new(120000, 2),
            price_until_bus: Decimal::new(150000, 2),
            active: true,
        }
    }

    fn lounge_leg_request() -> LoungeLegRequest {
        LoungeLegRequest {
            lounge_id: Uuid::nil(),
            pricing_type: LoungePricingType::TwoHours,
            guests_count: 1,
            window_start: Utc::now(),
            window_end: Utc::now(),
        }
    }

    fn intent_request(trip: bool, pre: bool, post: bool) -> CreateIntentRequest {
        CreateIntentRequest {
            idempotency_key: Uuid::new_v4(),
            scheduled_trip_id: trip.then(Uuid::new_v4),
            seat_ids: vec![],
            pre_lounge: pre.then(lounge_leg_request),
            post_lounge: post.then(lounge_leg_request),
        }
    }

    #[test]
    fn intent_type_classifies_bus_only() {
        assert_eq!(
            Orchestrator::intent_type_for(&intent_request(true, false, false)),
            IntentType::BusOnly
        );
    }

    #[test]
    fn intent_type_classifies_bus_with_both_lounges() {
        assert_eq!(
            Orchestrator::intent_type_for(&intent_request(true, true, true)),
            IntentType::BusWithBoth
        );
    }

    #[test]
    fn intent_type_classifies_bus_with_pre_lounge_only() {
        assert_eq!(
            Orchestrator::intent_type_for(&intent_request(true, true, false)),
            IntentType::BusWithPreLounge
        );
    }

    #[test]
    fn intent_type_falls_back_to_lounge_only_without_a_trip() {
        assert_eq!(
            Orchestrator::intent_type_for(&intent_request(false, true, false)),
            IntentType::LoungeOnly
        );
    }

    #[test]
    fn price_for_tier_selects_matching_column() {
        let l = lounge();
        assert_eq!(price_for_tier(&l, "2_hours"), l.price_two_hours);
        assert_eq!(price_for_tier(&l, "until_bus"), l.price_until_bus);
        assert_eq!(price_for_tier(&l, "unknown"), l.price_one_hour);
    }

    #[test]
    fn payment_reference_uses_int_prefix_and_first_eight_chars() {
        let id = Uuid::parse_str("a1b2c3d4-e5f6-7890-abcd-ef1234567890").unwrap();
        assert_eq!(payment_reference_for(id), "INT-a1b2c3d4");
    }
}
