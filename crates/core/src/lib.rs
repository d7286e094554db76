//! Detach Core - catalog, cart and selection logic.
//!
//! This crate holds everything the storefront needs that doesn't touch the
//! network or the filesystem beyond reading a catalog file:
//! - `storefront` - the public web shop
//! - `cli` - catalog inspection and validation
//!
//! # Modules
//!
//! - [`catalog`] - garments, designs and the artwork name table
//! - [`cart`] - the observable cart store
//! - [`selection`] - customizer navigation and pricing
//! - [`trial_room`] - garment/design partition and selection reconciliation
//! - [`types`] - newtype IDs, prices and contact details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod selection;
pub mod trial_room;
pub mod types;

pub use cart::{
    CartEntry, CartEvent, CartItem, CartItemError, CartObserver, CartSnapshot, CartStore,
    EntryKind, SizedGarment, SubscriptionId,
};
pub use catalog::{Catalog, CatalogError, Design, Garment, artwork_name};
pub use selection::{Combination, CustomizerState, SelectionError};
pub use trial_room::{CategoryState, TrialRoom, TrialRoomSelection};
pub use types::*;
