pub mod auth;
pub mod intents;
pub mod trips;

pub use auth::*;
pub use intents::*;
pub use trips::*;
