use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use transit_types::PricingSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingIntent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub idempotency_key: Uuid,
    pub intent_type: String,
    pub status: String,
    pub pricing: Json<PricingSnapshot>,
    pub held_until: DateTime<Utc>,
    pub payment_deadline: Option<DateTime<Utc>>,
    pub invoice_id: Option<String>,
    /// Transaction UID the gateway returned at InitiatePayment time — the
    /// value a webhook notification's `uid` is cross-checked against before
    /// its payload is trusted.
    pub payment_uid: Option<String>,
    /// Status indicator the gateway returned at InitiatePayment time
    /// (distinct from `status`, which is the intent's own lifecycle state).
    pub payment_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusBooking {
    pub id: Uuid,
    pub intent_id: Uuid,
    pub scheduled_trip_id: Uuid,
    pub booking_code: String,
    pub seat_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoungeBooking {
    pub id: Uuid,
    pub intent_id: Uuid,
    pub lounge_id: Uuid,
    pub booking_code: String,
    pub guests_count: i32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
