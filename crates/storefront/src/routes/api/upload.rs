//! Artist design upload.

use axum::{
    extract::{
        State,
        multipart::{Multipart, MultipartError},
    },
    http::StatusCode,
};
use chrono::Local;
use tracing::instrument;

use super::{ApiError, ApiSuccess};
use crate::models::submission::{Artwork, DesignSubmission, DesignSubmissionForm, SubmissionError};
use crate::services::Notification;
use crate::state::AppState;

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SubmissionError::FileTooLarge.into()
        } else {
            SubmissionError::Malformed(err.body_text()).into()
        }
    }
}

/// Collect the multipart fields into a form. Unknown fields are skipped.
async fn read_form(mut multipart: Multipart) -> Result<DesignSubmissionForm, ApiError> {
    let mut form = DesignSubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = Some(field.text().await?),
            "phone" => form.phone = Some(field.text().await?),
            "designName" => form.design_name = Some(field.text().await?),
            "upiId" => form.upi_id = Some(field.text().await?),
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.artwork = Some(Artwork::new(filename, content_type, bytes.to_vec())?);
            }
            other => tracing::debug!(field = other, "Ignoring unknown upload field"),
        }
    }

    Ok(form)
}

/// Accept an artist's design and forward it to the studio.
///
/// POST /api/upload
///
/// # Errors
///
/// Returns 400 for missing or invalid fields, 413 for oversized files and 502
/// when the notification can't be delivered.
#[instrument(skip(state, multipart))]
pub async fn submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiSuccess, ApiError> {
    let form = read_form(multipart).await?;
    let submission = DesignSubmission::try_from(form)?;

    tracing::info!(
        design = %submission.design_name,
        file = %submission.artwork.filename,
        bytes = submission.artwork.bytes.len(),
        "Design submission received"
    );

    let notification = Notification::design_submission(&submission, Local::now())?;
    state.notifier().deliver(notification).await?;

    Ok(ApiSuccess::new("Design submitted successfully!"))
}
