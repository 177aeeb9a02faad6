use axum::{extract::State, Json};

use transit_integrations::payment_gateway::PaymentNotification;
use transit_types::api::intents::BookingReferenceResponse;

use crate::middleware::AppState;
use crate::response::{api_error, ApiError};

/// Gateway webhook: the authoritative payment-confirmed signal. The intent
/// is located by the `payment_uid` recorded at InitiatePayment time, which
/// is itself the cross-check — a notification naming a uid nobody initiated
/// payment with simply matches no row (spec §4.8, §6).
pub async fn payment_webhook(
    State(state): State<AppState>,
    Json(notification): Json<PaymentNotification>,
) -> Result<Json<BookingReferenceResponse>, ApiError> {
    let response = state
        .orchestrator()
        .confirm_from_webhook(&state.payment_gateway, &notification)
        .await
        .map_err(api_error)?;

    Ok(Json(response))
}
