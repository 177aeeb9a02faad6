//! Maps `AppError` onto an HTTP response so every handler can `map_err` into
//! the same shape instead of hand-rolling a `(StatusCode, String)` per route.

use axum::http::StatusCode;
use transit_types::AppError;

/// Type alias for the common error response tuple
pub type ApiError = (StatusCode, String);

pub fn api_error(err: AppError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.to_string())
}
