pub mod codes;
pub mod leg;
pub mod lounge_holder;
pub mod orchestrator;
pub mod otp_service;
pub mod rate_limiter;
pub mod reaper;
pub mod seat_holder;
pub mod trip_generator;

pub use orchestrator::Orchestrator;
pub use otp_service::OtpService;
pub use rate_limiter::RateLimiter;
pub use reaper::ExpirationReaper;
pub use seat_holder::SeatHolder;
pub use trip_generator::TripGenerator;
