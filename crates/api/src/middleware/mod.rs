pub mod auth;

pub use auth::{require_role, AppState, AuthUser};
