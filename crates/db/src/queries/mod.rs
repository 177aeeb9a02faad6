pub mod intents;
pub mod lounges;
pub mod otp;
pub mod rate_limit;
pub mod trips;
pub mod users;
