//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart_log` - Cart store subscriber that logs mutations and records breadcrumbs
//! - `notify` - Submission delivery (SMTP email or log-only)

pub mod cart_log;
pub mod notify;

pub use notify::{LogSink, Notification, NotificationSink, NotifyError, SmtpSink};
