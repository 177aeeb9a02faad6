use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use transit_types::api::intents::{
    AddLoungeRequest, BookingReferenceResponse, ConfirmBookingRequest, CreateIntentRequest,
    InitiatePaymentRequest, InitiatePaymentResponse, IntentResponse,
};
use transit_types::AppError;

use crate::middleware::{AppState, AuthUser};
use crate::response::{api_error, ApiError};

pub async fn create_intent(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateIntentRequest>,
) -> Result<Json<IntentResponse>, ApiError> {
    req.validate()
        .map_err(|e| api_error(AppError::Validation(e.to_string())))?;

    let response = state
        .orchestrator()
        .create_intent(user.id, req)
        .await
        .map_err(api_error)?;

    Ok(Json(response))
}

pub async fn initiate_payment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(intent_id): Path<Uuid>,
    Json(req): Json<InitiatePaymentRequest>,
) -> Result<Json<InitiatePaymentResponse>, ApiError> {
    let response = state
        .orchestrator()
        .initiate_payment(intent_id, user.id, &state.payment_gateway, &req.redirect_url)
        .await
        .map_err(api_error)?;

    Ok(Json(response))
}

/// Client-callable fallback for ConfirmBooking (spec §4.1) — the gateway
/// webhook is the authoritative trigger; this lets a client nudge an intent
/// it knows has been paid for without waiting on the webhook.
pub async fn confirm_intent(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(intent_id): Path<Uuid>,
    Json(req): Json<ConfirmBookingRequest>,
) -> Result<Json<BookingReferenceResponse>, ApiError> {
    let response = state
        .orchestrator()
        .confirm(intent_id, user.id, &req.payment_reference)
        .await
        .map_err(api_error)?;

    Ok(Json(response))
}

/// AddLoungeToIntent (spec §4.1) — appends one or both lounge legs to an
/// already-held intent.
pub async fn add_lounge(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(intent_id): Path<Uuid>,
    Json(req): Json<AddLoungeRequest>,
) -> Result<Json<IntentResponse>, ApiError> {
    req.validate()
        .map_err(|e| api_error(AppError::Validation(e.to_string())))?;

    let response = state
        .orchestrator()
        .add_lounge(intent_id, user.id, req)
        .await
        .map_err(api_error)?;

    Ok(Json(response))
}

pub async fn get_intent_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(intent_id): Path<Uuid>,
) -> Result<Json<IntentResponse>, ApiError> {
    let response = state
        .orchestrator()
        .status(intent_id, user.id)
        .await
        .map_err(api_error)?;

    Ok(Json(response))
}

pub async fn cancel_intent(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(intent_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .orchestrator()
        .cancel(intent_id, user.id)
        .await
        .map_err(api_error)?;

    Ok(StatusCode::NO_CONTENT)
}
