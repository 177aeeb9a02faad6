use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::enums::{SeatStatus, SeatType, TripStatus};

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct SeatAvailabilityResponse {
    pub seat_id: Uuid,
    pub seat_number: String,
    pub seat_type: SeatType,
    pub status: SeatStatus,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct TripResponse {
    pub id: Uuid,
    pub bus_schedule_id: Uuid,
    pub departure_date: NaiveDate,
    pub departure_at: DateTime<Utc>,
    pub origin: String,
    pub destination: String,
    pub status: TripStatus,
    pub seats_available: i32,
    pub seats_total: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct TripDetailResponse {
    #[serde(flatten)]
    pub trip: TripResponse,
    pub seats: Vec<SeatAvailabilityResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TripSearchQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Bus owner/admin reassigning a trip's driver and/or conductor. Either may
/// be omitted to leave that assignment untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignCrewRequest {
    pub driver_id: Option<Uuid>,
    pub conductor_id: Option<Uuid>,
}

/// Rebinds a trip's seat layout template — the Trip Generator's second
/// binding phase, run outside the normal generation schedule when a bus is
/// swapped for a route.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BindSeatLayoutRequest {
    pub seat_layout_template_id: Uuid,
}

/// Administrative seat block/unblock (spec §4.2 BlockSeats/UnblockSeats) —
/// pulls seats out of (or back into) normal availability without an intent,
/// e.g. for maintenance or an operator hold.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BlockSeatsRequest {
    pub seat_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UnblockSeatsRequest {
    pub seat_ids: Vec<Uuid>,
}
