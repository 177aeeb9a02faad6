use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lounge {
    pub id: Uuid,
    pub operator_id: Uuid,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub price_one_hour: Decimal,
    pub price_two_hours: Decimal,
    pub price_three_hours: Decimal,
    pub price_until_bus: Decimal,
    pub active: bool,
}

/// Reserves lounge capacity for a guest count over a time window. Confirmed
/// holds count against `capacity` for the overlapping-window occupancy
/// check; released/expired ones do not.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoungeCapacityHold {
    pub id: Uuid,
    pub lounge_id: Uuid,
    pub intent_id: Uuid,
    pub guests_count: i32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub status: String,
    /// TTL independent of the parent intent's own `held_until` — lets the
    /// Reaper reclaim a lounge hold on its own schedule (spec §4.4 step 3).
    pub held_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
