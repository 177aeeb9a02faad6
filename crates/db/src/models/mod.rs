pub mod intent;
pub mod lounge;
pub mod otp;
pub mod trip;
pub mod user;

pub use intent::{BookingIntent, BusBooking, LoungeBooking};
pub use lounge::{Lounge, LoungeCapacityHold};
pub use otp::{OtpRecord, RateLimitRecord};
pub use trip::{BusSchedule, ScheduledTrip, SeatLayoutTemplate, TripSeat};
pub use user::User;
