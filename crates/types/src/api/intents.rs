use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::enums::{IntentStatus, IntentType, LoungePricingType};
use crate::pricing::PricingSnapshot;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoungeLegRequest {
    pub lounge_id: Uuid,
    pub pricing_type: LoungePricingType,
    #[validate(range(min = 1, max = 20))]
    pub guests_count: i32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIntentRequest {
    /// Required so retried submits (client timeout, double-tap) dedupe server-side.
    pub idempotency_key: Uuid,
    pub scheduled_trip_id: Option<Uuid>,
    pub seat_ids: Vec<Uuid>,
    #[validate(nested)]
    pub pre_lounge: Option<LoungeLegRequest>,
    #[validate(nested)]
    pub post_lounge: Option<LoungeLegRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct IntentResponse {
    pub id: Uuid,
    pub intent_type: IntentType,
    pub status: IntentStatus,
    pub pricing: PricingSnapshot,
    pub held_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitiatePaymentRequest {
    pub redirect_url: String,
}

/// Appends one or both lounge legs to an already-held intent — the only
/// sanctioned way to grow an intent after CreateIntent (spec §4.1
/// AddLoungeToIntent).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddLoungeRequest {
    #[validate(nested)]
    pub pre_lounge: Option<LoungeLegRequest>,
    #[validate(nested)]
    pub post_lounge: Option<LoungeLegRequest>,
}

/// User-invoked confirm (spec §4.1 ConfirmBooking). The authoritative
/// payment signal is the gateway webhook; this is the client-callable
/// fallback entry point that runs the same idempotent confirm path.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmBookingRequest {
    pub payment_reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct InitiatePaymentResponse {
    pub intent_id: Uuid,
    pub invoice_id: String,
    pub gateway_redirect_url: String,
    pub payment_deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct BookingReferenceResponse {
    pub intent_id: Uuid,
    pub bus_booking_code: Option<String>,
    pub pre_lounge_booking_code: Option<String>,
    pub post_lounge_booking_code: Option<String>,
}
