//! Core value types for the Detach storefront.
//!
//! Type-safe wrappers for identifiers, prices and submitter contact details.

pub mod contact;
pub mod id;
pub mod price;

pub use contact::{Email, EmailError, Phone, PhoneError};
pub use id::*;
pub use price::Price;
