pub mod auth;
pub mod intents;
pub mod trips;
pub mod webhooks;
