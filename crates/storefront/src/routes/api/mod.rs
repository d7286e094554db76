//! JSON API routes for the submission forms.
//!
//! Both endpoints answer `{ "success": true, "message": ... }` on success and
//! `{ "success": false, "error": ... }` with a 4xx/5xx status otherwise.

pub mod custom_order;
pub mod upload;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;

use crate::models::submission::{MAX_UPLOAD_BYTES, SubmissionError};
use crate::services::NotifyError;
use crate::state::AppState;

/// Request body cap for uploads. Leaves room for the other multipart fields
/// so oversized files are caught by the artwork check with a clear message.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 2 * 1024 * 1024;

/// Successful submission response.
#[derive(Debug, Serialize)]
pub struct ApiSuccess {
    pub success: bool,
    pub message: &'static str,
}

impl ApiSuccess {
    const fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

impl IntoResponse for ApiSuccess {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Error response for API endpoints.
///
/// The upload form reads the reason from `error`, the custom order form from
/// `message`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    reason: String,
    key: &'static str,
}

impl ApiError {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            reason: msg.into(),
            key: "error",
        }
    }

    /// Report the reason under `message` instead of `error`.
    #[must_use]
    pub const fn as_message(mut self) -> Self {
        self.key = "message";
        self
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        Self::new(err.status(), err.to_string())
    }
}

impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        tracing::error!(error = %err, "Failed to deliver submission");
        sentry::capture_error(&err);
        Self::new(
            StatusCode::BAD_GATEWAY,
            "We couldn't send your submission. Please try again later.",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::Map::new();
        body.insert("success".to_string(), false.into());
        body.insert(self.key.to_string(), self.reason.into());
        (self.status, Json(body)).into_response()
    }
}

/// Create the submission API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::submit).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/custom-order", post(custom_order::submit))
}
