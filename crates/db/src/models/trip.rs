use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recurring bus route template the Trip Generator materializes into
/// `ScheduledTrip` rows. Days of week stored as a bitmask (bit 0 = Sunday).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusSchedule {
    pub id: Uuid,
    pub bus_owner_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub days_of_week_mask: i16,
    pub seat_layout_template_id: Uuid,
    pub base_price: Decimal,
    pub active: bool,
    /// Window the timetable is in effect; `valid_until = None` means open-ended.
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl BusSchedule {
    /// True when `date` falls on one of this schedule's weekdays and inside
    /// its validity window (spec §4.5 `isValidForDate`).
    pub fn is_valid_for_date(&self, date: NaiveDate) -> bool {
        if date < self.valid_from {
            return false;
        }
        if let Some(until) = self.valid_until {
            if date > until {
                return false;
            }
        }
        self.days_of_week_mask & (1 << date.weekday().num_days_from_sunday()) != 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeatLayoutTemplate {
    pub id: Uuid,
    pub name: String,
    pub seat_count: i32,
    /// `[{"seat_number": "1A", "seat_type": "window"}, ...]`
    pub layout: sqlx::types::Json<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledTrip {
    pub id: Uuid,
    pub bus_schedule_id: Uuid,
    pub departure_date: NaiveDate,
    pub departure_at: DateTime<Utc>,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub seats_total: i32,
    pub seats_available: i32,
    pub driver_id: Option<Uuid>,
    pub conductor_id: Option<Uuid>,
    /// Crew assignment cutoff — `departure_at - assignment_deadline_hours`,
    /// fixed at generation time (spec invariant: never strictly after
    /// `departure_at`).
    pub assignment_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripSeat {
    pub id: Uuid,
    pub scheduled_trip_id: Uuid,
    pub seat_number: String,
    pub seat_type: String,
    pub status: String,
    pub price: Decimal,
    pub held_until: Option<DateTime<Utc>>,
    pub intent_id: Option<Uuid>,
}
