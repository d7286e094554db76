//! Artist design submissions and custom order requests.
//!
//! Raw form input is checked here and turned into validated values that the
//! notification service renders into emails.

use std::fmt;

use axum::http::StatusCode;
use detach_core::{Email, EmailError, Phone, PhoneError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted artwork file.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Validation failures for either submission form.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail(#[from] EmailError),

    #[error("Please enter a valid phone number")]
    InvalidPhone(#[from] PhoneError),

    #[error("Please choose a valid {0}")]
    InvalidChoice(&'static str),

    #[error("Please upload an image file")]
    NotAnImage,

    #[error("File is too large (max 10 MB)")]
    FileTooLarge,

    #[error("Could not read the upload")]
    Malformed(String),
}

impl SubmissionError {
    /// HTTP status for this failure.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Trim a required field, rejecting blanks.
fn required(value: Option<String>, field: &'static str) -> Result<String, SubmissionError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(SubmissionError::MissingField(field))
}

/// Trim an optional field, treating blanks as absent.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Artist Upload
// =============================================================================

/// The uploaded artwork file.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Artwork {
    /// Check the file is an image no larger than [`MAX_UPLOAD_BYTES`].
    ///
    /// # Errors
    ///
    /// Returns `NotAnImage` or `FileTooLarge`.
    pub fn new(
        filename: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, SubmissionError> {
        let content_type = content_type.unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(SubmissionError::NotAnImage);
        }
        if bytes.is_empty() {
            return Err(SubmissionError::MissingField("Design file"));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(SubmissionError::FileTooLarge);
        }

        let filename = optional(filename).unwrap_or_else(|| "artwork".to_string());
        Ok(Self {
            filename,
            content_type,
            bytes,
        })
    }
}

/// Fields collected from the multipart upload form.
#[derive(Debug, Default)]
pub struct DesignSubmissionForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub design_name: Option<String>,
    pub upi_id: Option<String>,
    pub artwork: Option<Artwork>,
}

/// A validated artist submission.
#[derive(Debug, Clone)]
pub struct DesignSubmission {
    pub artist_name: String,
    pub phone: Phone,
    pub design_name: String,
    pub upi_id: String,
    pub artwork: Artwork,
}

impl TryFrom<DesignSubmissionForm> for DesignSubmission {
    type Error = SubmissionError;

    fn try_from(form: DesignSubmissionForm) -> Result<Self, Self::Error> {
        let artist_name = required(form.name, "Name")?;
        let phone = Phone::parse(&required(form.phone, "Phone number")?)?;
        let design_name = required(form.design_name, "Design name")?;
        let upi_id = required(form.upi_id, "UPI ID")?;
        let artwork = form
            .artwork
            .ok_or(SubmissionError::MissingField("Design file"))?;

        Ok(Self {
            artist_name,
            phone,
            design_name,
            upi_id,
            artwork,
        })
    }
}

// =============================================================================
// Custom Orders
// =============================================================================

/// Declare a closed set of form choices with their wire values and labels.
macro_rules! choice_enum {
    ($name:ident, $field:literal, { $($variant:ident => ($value:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Value submitted by the form.
            #[must_use]
            pub const fn value(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Label shown to people.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            fn parse(raw: &str) -> Result<Self, SubmissionError> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.value() == raw)
                    .ok_or(SubmissionError::InvalidChoice($field))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum!(OrderType, "order type", {
    Suit => ("suit", "Suit"),
    Dress => ("dress", "Dress"),
    Shirt => ("shirt", "Shirt"),
    Pants => ("pants", "Pants"),
    Jacket => ("jacket", "Jacket"),
    Other => ("other", "Other"),
});

choice_enum!(Occasion, "occasion", {
    Wedding => ("wedding", "Wedding"),
    Graduation => ("graduation", "Graduation"),
    Business => ("business", "Business"),
    Party => ("party", "Party"),
    Formal => ("formal", "Formal Event"),
    Other => ("other", "Other"),
});

choice_enum!(Budget, "budget", {
    Upto3000 => ("1000-3000", "₹1,000 - ₹3,000"),
    Upto5000 => ("3000-5000", "₹3,000 - ₹5,000"),
    Upto10000 => ("5000-10000", "₹5,000 - ₹10,000"),
    Above10000 => ("10000+", "₹10,000+"),
});

choice_enum!(Timeline, "timeline", {
    Urgent => ("urgent", "Urgent (1 week)"),
    TwoWeeks => ("2weeks", "2 weeks"),
    OneMonth => ("1month", "1 month"),
    Flexible => ("flexible", "Flexible"),
});

/// JSON body posted by the custom order form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrderForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A validated custom order request.
#[derive(Debug, Clone)]
pub struct CustomOrderRequest {
    pub name: String,
    pub email: Email,
    pub phone: Option<Phone>,
    pub order_type: OrderType,
    pub occasion: Occasion,
    pub budget: Option<Budget>,
    pub timeline: Timeline,
    pub description: String,
}

impl CustomOrderRequest {
    /// Phone for display, or "Not provided".
    #[must_use]
    pub fn phone_display(&self) -> &str {
        self.phone.as_ref().map_or("Not provided", Phone::as_str)
    }

    /// Budget for display, or "Not specified".
    #[must_use]
    pub fn budget_display(&self) -> &'static str {
        self.budget.map_or("Not specified", Budget::label)
    }
}

impl TryFrom<CustomOrderForm> for CustomOrderRequest {
    type Error = SubmissionError;

    fn try_from(form: CustomOrderForm) -> Result<Self, Self::Error> {
        let name = required(form.name, "Name")?;
        let email = Email::parse(&required(form.email, "Email")?)?;
        let phone = optional(form.phone).map(|p| Phone::parse(&p)).transpose()?;
        let order_type = OrderType::parse(&required(form.order_type, "Order type")?)?;
        let occasion = Occasion::parse(&required(form.occasion, "Occasion")?)?;
        let budget = optional(form.budget)
            .map(|b| Budget::parse(&b))
            .transpose()?;
        let timeline = Timeline::parse(&required(form.timeline, "Timeline")?)?;
        let description = required(form.description, "Description")?;

        Ok(Self {
            name,
            email,
            phone,
            order_type,
            occasion,
            budget,
            timeline,
            description,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn png(len: usize) -> Artwork {
        Artwork::new(
            Some("moon.png".to_string()),
            Some("image/png".to_string()),
            vec![0; len],
        )
        .unwrap()
    }

    fn upload_form() -> DesignSubmissionForm {
        DesignSubmissionForm {
            name: Some("  Asha  ".to_string()),
            phone: Some("+91 98765 43210".to_string()),
            design_name: Some("Moonrise".to_string()),
            upi_id: Some("asha@okbank".to_string()),
            artwork: Some(png(16)),
        }
    }

    fn order_form() -> CustomOrderForm {
        CustomOrderForm {
            name: Some("Ravi".to_string()),
            email: Some("Ravi@Example.com".to_string()),
            phone: None,
            order_type: Some("suit".to_string()),
            occasion: Some("wedding".to_string()),
            budget: Some(String::new()),
            timeline: Some("2weeks".to_string()),
            description: Some("Navy three-piece".to_string()),
        }
    }

    #[test]
    fn test_design_submission_trims_fields() {
        let submission = DesignSubmission::try_from(upload_form()).unwrap();
        assert_eq!(submission.artist_name, "Asha");
        assert_eq!(submission.phone.as_str(), "+919876543210");
        assert_eq!(submission.artwork.filename, "moon.png");
    }

    #[test]
    fn test_design_submission_requires_every_field() {
        let mut form = upload_form();
        form.upi_id = Some("   ".to_string());
        assert!(matches!(
            DesignSubmission::try_from(form),
            Err(SubmissionError::MissingField("UPI ID"))
        ));

        let mut form = upload_form();
        form.artwork = None;
        assert!(matches!(
            DesignSubmission::try_from(form),
            Err(SubmissionError::MissingField("Design file"))
        ));
    }

    #[test]
    fn test_artwork_checks() {
        let err = Artwork::new(None, Some("application/pdf".to_string()), vec![1]).unwrap_err();
        assert!(matches!(err, SubmissionError::NotAnImage));

        let err = Artwork::new(None, Some("image/jpeg".to_string()), vec![0; MAX_UPLOAD_BYTES + 1])
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let artwork = Artwork::new(None, Some("image/webp".to_string()), vec![0; MAX_UPLOAD_BYTES])
            .unwrap();
        assert_eq!(artwork.filename, "artwork");
    }

    #[test]
    fn test_custom_order_defaults() {
        let order = CustomOrderRequest::try_from(order_form()).unwrap();
        assert_eq!(order.email.as_str(), "ravi@example.com");
        assert_eq!(order.order_type, OrderType::Suit);
        assert_eq!(order.timeline.label(), "2 weeks");
        assert_eq!(order.phone_display(), "Not provided");
        assert_eq!(order.budget_display(), "Not specified");
    }

    #[test]
    fn test_custom_order_rejects_unknown_choice() {
        let mut form = order_form();
        form.occasion = Some("funeral".to_string());
        let err = CustomOrderRequest::try_from(form).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidChoice("occasion")));
        assert_eq!(err.to_string(), "Please choose a valid occasion");
    }

    #[test]
    fn test_custom_order_rejects_bad_email() {
        let mut form = order_form();
        form.email = Some("ravi-at-example".to_string());
        assert!(matches!(
            CustomOrderRequest::try_from(form),
            Err(SubmissionError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_custom_order_json_uses_camel_case() {
        let form: CustomOrderForm = serde_json::from_str(
            r#"{"name":"A","email":"a@b.co","orderType":"jacket","occasion":"party",
                "budget":"10000+","timeline":"urgent","description":"Leather"}"#,
        )
        .unwrap();
        let order = CustomOrderRequest::try_from(form).unwrap();
        assert_eq!(order.order_type, OrderType::Jacket);
        assert_eq!(order.budget, Some(Budget::Above10000));
    }
}
