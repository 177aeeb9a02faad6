//! Trip Generator: materializes `ScheduledTrip` + `TripSeat` rows from
//! recurring `BusSchedule` templates on a rolling horizon, and prunes old
//! completed/cancelled trips.
//!
//! Idempotent by design: `generate_for_schedule` always checks for an
//! existing trip on that schedule + date before creating one, so a missed
//! run and a re-run that covers the same ground never double-book a date.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use transit_db::models::{BusSchedule, ScheduledTrip, TripSeat};
use transit_db::queries::trips;
use transit_db::Pool;
use transit_types::{AppError, Config};

pub struct TripGenerator {
    pool: Pool,
    config: Config,
}

impl TripGenerator {
    pub fn new(pool: Pool, config: Config) -> Self {
        Self { pool, config }
    }

    /// Materializes a trip for one schedule on one date, unless it already
    /// exists, the schedule doesn't run that day of week, or `date` falls
    /// outside the schedule's validity window.
    pub async fn generate_for_schedule(
        &self,
        schedule: &BusSchedule,
        date: NaiveDate,
    ) -> Result<Option<ScheduledTrip>, AppError> {
        if !schedule.is_valid_for_date(date) {
            return Ok(None);
        }

        if trips::find_trip_for_schedule_and_date(&self.pool, schedule.id, date)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .is_some()
        {
            return Ok(None);
        }

        let layout = trips::find_seat_layout(&self.pool, schedule.seat_layout_template_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("seat layout template not found".to_string()))?;

        let departure_naive = date.and_time(schedule.departure_time);
        let departure_at = Utc.from_utc_datetime(&departure_naive);
        let assignment_deadline =
            departure_at - Duration::hours(self.config.assignment_deadline_hours);

        let trip = trips::create_trip_with_seats(
            &self.pool,
            schedule.id,
            date,
            departure_at,
            assignment_deadline,
            &schedule.origin,
            &schedule.destination,
            schedule.base_price,
            &layout,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Some(trip))
    }

    /// Reassigns a trip's driver/conductor, refusing once the trip's
    /// `assignment_deadline` has passed.
    pub async fn assign_crew(
        &self,
        trip_id: Uuid,
        driver_id: Option<Uuid>,
        conductor_id: Option<Uuid>,
    ) -> Result<ScheduledTrip, AppError> {
        trips::assign_crew(&self.pool, trip_id, driver_id, conductor_id, Utc::now())
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| {
                AppError::Conflict(
                    "trip not found or past its crew assignment deadline".to_string(),
                )
            })
    }

    /// Walks every active schedule over the configured horizon, generating
    /// whatever trips are missing. Safe to run more than once a day —
    /// re-running it is exactly how gaps from a missed run get filled.
    pub async fn generate_future_trips(&self) -> Result<usize, AppError> {
        let schedules = trips::list_active_schedules(&self.pool)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let today = Utc::now().date_naive();
        let mut created = 0;

        for schedule in &schedules {
            for offset in 0..=self.config.trip_generation_days_ahead {
                let date = today + Duration::days(offset);
                if self.generate_for_schedule(schedule, date).await?.is_some() {
                    created += 1;
                }
            }
        }

        Ok(created)
    }

    /// Alias for `generate_future_trips` kept as a distinct entry point so
    /// the jobs crate can schedule a separate, later cron slot for it
    /// without implying the two runs do different things.
    pub async fn fill_missing_trips(&self) -> Result<usize, AppError> {
        self.generate_future_trips().await
    }

    /// Deletes completed/cancelled trips older than the retention window.
    pub async fn cleanup_old_trips(&self, retain_days: i64) -> Result<u64, AppError> {
        let cutoff = Utc::now().date_naive() - Duration::days(retain_days);
        trips::delete_old_trips(&self.pool, cutoff)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Binds a seat layout template to an already-materialized trip,
    /// discarding its current TripSeats and replacing them with one row per
    /// layout seat. Refused if any existing seat is booked or held — a bus
    /// owner swapping vehicles can't silently evict a paying passenger.
    pub async fn bind_layout(
        &self,
        scheduled_trip_id: Uuid,
        seat_layout_template_id: Uuid,
    ) -> Result<Vec<TripSeat>, AppError> {
        let trip = trips::find_by_id(&self.pool, scheduled_trip_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("trip not found".to_string()))?;

        let schedule = trips::find_schedule_by_id(&self.pool, trip.bus_schedule_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("bus schedule not found".to_string()))?;

        let layout = trips::find_seat_layout(&self.pool, seat_layout_template_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("seat layout template not found".to_string()))?;

        let existing = trips::list_seats_for_trip(&self.pool, scheduled_trip_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if existing.iter().any(|s| s.status == "booked" || s.status == "held") {
            return Err(AppError::Conflict(
                "cannot rebind seat layout while seats are booked or held".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        trips::rebind_trip_layout(&mut tx, scheduled_trip_id, &layout, schedule.base_price)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        tx.commit().await.map_err(AppError::Database)?;

        trips::list_seats_for_trip(&self.pool, scheduled_trip_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn daily_schedule(valid_from: NaiveDate, valid_until: Option<NaiveDate>) -> BusSchedule {
        BusSchedule {
            id: Uuid::nil(),
            bus_owner_id: Uuid::nil(),
            origin: "Colombo".into(),
            destination: "Kandy".into(),
            departure_time: chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            days_of_week_mask: 0b1111111,
            seat_layout_template_id: Uuid::nil(),
            base_price: Decimal::new(150000, 2),
            active: true,
            valid_from,
            valid_until,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn is_valid_for_date_honors_weekday_mask() {
        let schedule = BusSchedule {
            days_of_week_mask: 0b1000000, // Saturday only (bit 0 = Sunday)
            ..daily_schedule(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), None)
        };
        let saturday = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        assert!(schedule.is_valid_for_date(saturday));
        assert!(!schedule.is_valid_for_date(sunday));
    }

    #[test]
    fn is_valid_for_date_rejects_before_valid_from() {
        let schedule = daily_schedule(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(), None);
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert!(!schedule.is_valid_for_date(date));
    }

    #[test]
    fn is_valid_for_date_rejects_after_valid_until() {
        let schedule = daily_schedule(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        );
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert!(!schedule.is_valid_for_date(date));
    }

    #[test]
    fn is_valid_for_date_accepts_inside_window() {
        let schedule = daily_schedule(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
        );
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert!(schedule.is_valid_for_date(date));
    }
}
