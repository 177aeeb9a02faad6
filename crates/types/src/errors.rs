use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::enums::RateLimitDimension;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Intent holds seats unavailable at CreateIntent time; carries the
    /// losing seat ids so the caller can retry with a different selection.
    #[error("Seats already taken: {seat_ids:?}")]
    SeatsTaken { seat_ids: Vec<Uuid> },

    #[error("Lounge capacity exceeded")]
    LoungeCapacityExceeded,

    #[error("Trip has already departed")]
    TripDeparted,

    #[error("Trip is not bookable")]
    TripUnavailable,

    #[error("Intent has expired")]
    IntentExpired,

    #[error("Intent is not in a holdable state")]
    IntentNotHoldable,

    #[error("Payment gateway error: {0}")]
    GatewayError(String),

    #[error("Rate limit exceeded on {dimension:?}, retry after {retry_after}")]
    RateLimited {
        dimension: RateLimitDimension,
        retry_after: DateTime<Utc>,
    },

    #[error("No OTP issued for this phone")]
    OtpNotFound,

    #[error("OTP already used")]
    OtpAlreadyUsed,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("Maximum OTP attempts exceeded")]
    OtpMaxAttemptsExceeded,

    #[error("Invalid OTP code")]
    OtpInvalid,
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Database(_) | Self::Internal(_) => 500,
            Self::NotFound(_) | Self::OtpNotFound => 404,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::Conflict(_)
            | Self::SeatsTaken { .. }
            | Self::LoungeCapacityExceeded
            | Self::TripDeparted
            | Self::TripUnavailable
            | Self::IntentExpired
            | Self::IntentNotHoldable
            | Self::OtpAlreadyUsed
            | Self::OtpExpired
            | Self::OtpMaxAttemptsExceeded
            | Self::OtpInvalid => 409,
            Self::GatewayError(_) => 502,
            Self::RateLimited { .. } => 429,
        }
    }
}
