//! Domain models for storefront.
//!
//! - `session` - the shopper's cart as stored in their session
//! - `submission` - artist upload and custom order validation

pub mod session;
pub mod submission;

pub use session::{CartBadge, ShopperCart};
