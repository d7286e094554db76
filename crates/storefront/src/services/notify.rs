//! Delivery of artist submissions and custom order requests.
//!
//! Submissions are rendered into a [`Notification`] with Askama text and HTML
//! templates, then handed to a [`NotificationSink`]. Production uses SMTP via
//! lettre; without SMTP configuration the storefront falls back to
//! [`LogSink`]. Each submission is delivered once, with no retry.

use askama::Template;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment as MailAttachment, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SmtpConfig;
use crate::models::submission::{CustomOrderRequest, DesignSubmission};

const TIMESTAMP_FORMAT: &str = "%d %b %Y, %I:%M %p";

/// HTML body for an artist submission.
#[derive(Template)]
#[template(path = "email/design_submission.html")]
struct DesignSubmissionHtml<'a> {
    submission: &'a DesignSubmission,
    submitted_at: &'a str,
}

/// Plain text body for an artist submission.
#[derive(Template)]
#[template(path = "email/design_submission.txt")]
struct DesignSubmissionText<'a> {
    submission: &'a DesignSubmission,
    submitted_at: &'a str,
}

/// HTML body for a custom order request.
#[derive(Template)]
#[template(path = "email/custom_order.html")]
struct CustomOrderHtml<'a> {
    order: &'a CustomOrderRequest,
    submitted_at: &'a str,
}

/// Plain text body for a custom order request.
#[derive(Template)]
#[template(path = "email/custom_order.txt")]
struct CustomOrderText<'a> {
    order: &'a CustomOrderRequest,
    submitted_at: &'a str,
}

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Attachment content type not understood.
    #[error("Invalid attachment type: {0}")]
    InvalidAttachment(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A file sent along with a notification.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A rendered message ready for delivery.
#[derive(Debug, Clone)]
pub struct Notification {
    pub subject: String,
    /// Reply-to address, when the submitter gave one.
    pub reply_to: Option<String>,
    pub text_body: String,
    pub html_body: String,
    pub attachment: Option<Attachment>,
}

impl Notification {
    /// Render an artist submission, attaching the artwork.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn design_submission(
        submission: &DesignSubmission,
        submitted_at: DateTime<Local>,
    ) -> Result<Self, NotifyError> {
        let submitted_at = submitted_at.format(TIMESTAMP_FORMAT).to_string();
        let html_body = DesignSubmissionHtml {
            submission,
            submitted_at: &submitted_at,
        }
        .render()?;
        let text_body = DesignSubmissionText {
            submission,
            submitted_at: &submitted_at,
        }
        .render()?;

        Ok(Self {
            subject: format!("New Design Submission: {}", submission.design_name),
            reply_to: None,
            text_body,
            html_body,
            attachment: Some(Attachment {
                filename: submission.artwork.filename.clone(),
                content_type: submission.artwork.content_type.clone(),
                bytes: submission.artwork.bytes.clone(),
            }),
        })
    }

    /// Render a custom order request.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn custom_order(
        order: &CustomOrderRequest,
        submitted_at: DateTime<Local>,
    ) -> Result<Self, NotifyError> {
        let submitted_at = submitted_at.format(TIMESTAMP_FORMAT).to_string();
        let html_body = CustomOrderHtml {
            order,
            submitted_at: &submitted_at,
        }
        .render()?;
        let text_body = CustomOrderText {
            order,
            submitted_at: &submitted_at,
        }
        .render()?;

        Ok(Self {
            subject: format!("New Custom Order Request from {}", order.name),
            reply_to: Some(order.email.to_string()),
            text_body,
            html_body,
            attachment: None,
        })
    }
}

/// Somewhere submissions are delivered.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification.
    async fn deliver(&self, notification: Notification) -> Result<(), NotifyError>;
}

// =============================================================================
// SMTP
// =============================================================================

/// Sends notifications as multipart email to the studio inbox.
#[derive(Clone)]
pub struct SmtpSink {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    to_address: String,
}

impl SmtpSink {
    /// Create a new SMTP sink from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the relay cannot be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            to_address: config.receiving_address.clone(),
        })
    }

    fn build_message(&self, notification: Notification) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .to_address
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(self.to_address.clone()))?)
            .subject(notification.subject);

        if let Some(reply_to) = notification.reply_to {
            builder = builder.reply_to(
                reply_to
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(reply_to.clone()))?,
            );
        }

        let body = MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(notification.text_body),
            )
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(notification.html_body),
            );

        let message = match notification.attachment {
            Some(file) => {
                let content_type = ContentType::parse(&file.content_type)
                    .map_err(|_| NotifyError::InvalidAttachment(file.content_type.clone()))?;
                let attachment = MailAttachment::new(file.filename).body(file.bytes, content_type);
                builder.multipart(MultiPart::mixed().multipart(body).singlepart(attachment))?
            }
            None => builder.multipart(body)?,
        };

        Ok(message)
    }
}

#[async_trait]
impl NotificationSink for SmtpSink {
    async fn deliver(&self, notification: Notification) -> Result<(), NotifyError> {
        let subject = notification.subject.clone();
        let message = self.build_message(notification)?;
        self.mailer.send(message).await?;

        tracing::info!(to = %self.to_address, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

// =============================================================================
// Log-only
// =============================================================================

/// Logs notifications instead of sending them. Used when SMTP is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            subject = %notification.subject,
            attachment = notification.attachment.as_ref().map(|a| a.filename.as_str()),
            attachment_bytes = notification.attachment.as_ref().map_or(0, |a| a.bytes.len()),
            body = %notification.text_body,
            "Email delivery disabled, notification logged"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::submission::{Artwork, CustomOrderForm, DesignSubmissionForm};

    fn submitted_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 16, 5, 0).unwrap()
    }

    fn submission() -> DesignSubmission {
        DesignSubmission::try_from(DesignSubmissionForm {
            name: Some("Asha".to_string()),
            phone: Some("9876543210".to_string()),
            design_name: Some("Moonrise".to_string()),
            upi_id: Some("asha@okbank".to_string()),
            artwork: Some(
                Artwork::new(
                    Some("moon.png".to_string()),
                    Some("image/png".to_string()),
                    vec![1, 2, 3],
                )
                .unwrap(),
            ),
        })
        .unwrap()
    }

    fn order(phone: Option<&str>, budget: Option<&str>) -> CustomOrderRequest {
        CustomOrderRequest::try_from(CustomOrderForm {
            name: Some("Ravi".to_string()),
            email: Some("ravi@example.com".to_string()),
            phone: phone.map(str::to_string),
            order_type: Some("dress".to_string()),
            occasion: Some("party".to_string()),
            budget: budget.map(str::to_string),
            timeline: Some("flexible".to_string()),
            description: Some("Something <green>".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_design_submission_notification() {
        let notification = Notification::design_submission(&submission(), submitted_at()).unwrap();
        assert_eq!(notification.subject, "New Design Submission: Moonrise");
        assert!(notification.text_body.contains("Artist Name: Asha"));
        assert!(notification.text_body.contains("UPI ID: asha@okbank"));
        assert!(notification.text_body.contains("14 Mar 2025, 04:05 PM"));
        assert!(notification.html_body.contains("Moonrise"));

        let attachment = notification.attachment.unwrap();
        assert_eq!(attachment.filename, "moon.png");
        assert_eq!(attachment.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_custom_order_notification_placeholders() {
        let notification = Notification::custom_order(&order(None, None), submitted_at()).unwrap();
        assert_eq!(notification.subject, "New Custom Order Request from Ravi");
        assert_eq!(notification.reply_to.as_deref(), Some("ravi@example.com"));
        assert!(notification.text_body.contains("Phone: Not provided"));
        assert!(notification.text_body.contains("Budget: Not specified"));
        assert!(notification.attachment.is_none());
        // HTML output is escaped
        assert!(notification.html_body.contains("Something"));
        assert!(!notification.html_body.contains("<green>"));
        assert!(notification.text_body.contains("Something <green>"));
    }

    #[test]
    fn test_custom_order_notification_with_optional_fields() {
        let notification =
            Notification::custom_order(&order(Some("98765 43210"), Some("3000-5000")), submitted_at())
                .unwrap();
        assert!(notification.text_body.contains("Phone: 9876543210"));
        assert!(notification.text_body.contains("Budget: ₹3,000 - ₹5,000"));
        assert!(notification.text_body.contains("Order Type: Dress"));
    }

    #[tokio::test]
    async fn test_log_sink_accepts_everything() {
        let notification = Notification::custom_order(&order(None, None), submitted_at()).unwrap();
        LogSink.deliver(notification).await.unwrap();
    }
}
