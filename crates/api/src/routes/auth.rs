use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    Json,
};

use transit_types::api::auth::{RequestOtpRequest, RequestOtpResponse, VerifyOtpRequest, VerifyOtpResponse};
use transit_types::enums::RateLimitDimension;
use transit_types::validation::validate_phone;
use transit_types::AppError;

use crate::middleware::AppState;
use crate::response::{api_error, ApiError};

/// Requests an OTP for a phone number, rate-limited on both the phone and
/// the caller's IP so one device can't exhaust a victim's SMS quota.
pub async fn request_otp(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<RequestOtpRequest>,
) -> Result<Json<RequestOtpResponse>, ApiError> {
    validate_phone(&req.phone).map_err(|e| api_error(AppError::Validation(e)))?;

    let ip = addr.ip().to_string();

    state
        .rate_limiter()
        .check(RateLimitDimension::Phone, &req.phone)
        .await
        .map_err(api_error)?;
    state
        .rate_limiter()
        .check(RateLimitDimension::Ip, &ip)
        .await
        .map_err(api_error)?;

    let response = state
        .otp_service()
        .request_otp(&req.phone)
        .await
        .map_err(api_error)?;

    state
        .rate_limiter()
        .record(RateLimitDimension::Phone, &req.phone)
        .await
        .map_err(api_error)?;
    state
        .rate_limiter()
        .record(RateLimitDimension::Ip, &ip)
        .await
        .map_err(api_error)?;

    Ok(Json(response))
}

/// Verifies an OTP and mints a session token for the (possibly new) user.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, ApiError> {
    validate_phone(&req.phone).map_err(|e| api_error(AppError::Validation(e)))?;

    let response = state
        .otp_service()
        .verify_otp(&req.phone, &req.code)
        .await
        .map_err(api_error)?;

    Ok(Json(response))
}
