pub mod generate_trips;
pub mod reap_expired;

pub use generate_trips::{cleanup_old_trips, fill_missing_trips, generate_future_trips};
pub use reap_expired::reap_expired_holds;
