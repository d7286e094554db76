//! Custom order requests.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Local;
use tracing::instrument;

use super::{ApiError, ApiSuccess};
use crate::models::submission::{CustomOrderForm, CustomOrderRequest};
use crate::services::Notification;
use crate::state::AppState;

/// Take a custom order request and forward it to the studio.
///
/// POST /api/custom-order
///
/// # Errors
///
/// Returns 400 for malformed JSON or invalid fields and 502 when the
/// notification can't be delivered.
#[instrument(skip(state, body))]
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Json<CustomOrderForm>, JsonRejection>,
) -> Result<ApiSuccess, ApiError> {
    handle(&state, body).await.map_err(ApiError::as_message)
}

async fn handle(
    state: &AppState,
    body: Result<Json<CustomOrderForm>, JsonRejection>,
) -> Result<ApiSuccess, ApiError> {
    let Json(form) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected custom order body");
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;
    let order = CustomOrderRequest::try_from(form)?;

    tracing::info!(
        order_type = %order.order_type,
        occasion = %order.occasion,
        "Custom order request received"
    );

    let notification = Notification::custom_order(&order, Local::now())?;
    state.notifier().deliver(notification).await?;

    Ok(ApiSuccess::new("Custom order request submitted successfully"))
}
