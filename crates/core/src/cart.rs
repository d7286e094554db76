//! The shopper's cart.
//!
//! [`CartStore`] is the single source of truth for what the shopper has
//! picked. Entries embed the product by value, so later catalog changes never
//! alter a line already in the cart. Every mutation is published to the
//! store's observers as a [`CartEvent`].

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Design, Garment};
use crate::types::{EntryId, Price};

/// The two kinds of product a cart can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Garment,
    Design,
}

impl EntryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Garment => "garment",
            Self::Design => "design",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors building a cart item.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartItemError {
    #[error("size {size} is not available for {garment}")]
    UnavailableSize { garment: String, size: String },
}

/// A garment together with the size the shopper picked.
///
/// The size is checked against the garment's sizes on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizedGarment {
    garment: Garment,
    size: String,
}

impl SizedGarment {
    /// Pair a garment with one of its sizes.
    ///
    /// # Errors
    ///
    /// Returns `CartItemError::UnavailableSize` if the garment doesn't come
    /// in `size`.
    pub fn new(garment: Garment, size: impl Into<String>) -> Result<Self, CartItemError> {
        let size = size.into();
        if !garment.offers_size(&size) {
            return Err(CartItemError::UnavailableSize {
                garment: garment.display_name,
                size,
            });
        }
        Ok(Self { garment, size })
    }

    #[must_use]
    pub const fn garment(&self) -> &Garment {
        &self.garment
    }

    #[must_use]
    pub fn size(&self) -> &str {
        &self.size
    }
}

/// What a cart line holds: a sized garment or a design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartItem {
    Garment(SizedGarment),
    Design(Design),
}

impl CartItem {
    /// Build a garment item in the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if the size isn't offered for this garment.
    pub fn garment(garment: Garment, size: impl Into<String>) -> Result<Self, CartItemError> {
        SizedGarment::new(garment, size).map(Self::Garment)
    }

    #[must_use]
    pub const fn design(design: Design) -> Self {
        Self::Design(design)
    }

    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::Garment(_) => EntryKind::Garment,
            Self::Design(_) => EntryKind::Design,
        }
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        match self {
            Self::Garment(sized) => sized.garment.unit_price,
            Self::Design(design) => design.unit_price,
        }
    }
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    id: EntryId,
    item: CartItem,
    unit_price: Price,
}

impl CartEntry {
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub const fn item(&self) -> &CartItem {
        &self.item
    }

    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.item.kind()
    }

    /// Price frozen when the entry was added.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Size of a garment entry; always `None` for designs.
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        match &self.item {
            CartItem::Garment(sized) => Some(sized.size()),
            CartItem::Design(_) => None,
        }
    }

    #[must_use]
    pub fn garment(&self) -> Option<&Garment> {
        match &self.item {
            CartItem::Garment(sized) => Some(sized.garment()),
            CartItem::Design(_) => None,
        }
    }

    #[must_use]
    pub const fn design(&self) -> Option<&Design> {
        match &self.item {
            CartItem::Garment(_) => None,
            CartItem::Design(design) => Some(design),
        }
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        match &self.item {
            CartItem::Garment(sized) => &sized.garment.image_ref,
            CartItem::Design(design) => &design.image_ref,
        }
    }

    /// Line title shown on the cart page.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.item {
            CartItem::Garment(sized) => format!("{} T-shirt", sized.garment.display_name),
            CartItem::Design(design) => design.label(),
        }
    }

    /// Value equality on the underlying product: garments compare by display
    /// name, designs by id. Size and entry id are ignored.
    #[must_use]
    pub fn same_product(&self, other: &Self) -> bool {
        match (&self.item, &other.item) {
            (CartItem::Garment(a), CartItem::Garment(b)) => {
                a.garment.display_name == b.garment.display_name
            }
            (CartItem::Design(a), CartItem::Design(b)) => a.id == b.id,
            _ => false,
        }
    }
}

/// A change published by [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// `entry` was appended at `index`.
    Added { index: usize, entry: CartEntry },
    /// `entry` was removed from `index`.
    Removed { index: usize, entry: CartEntry },
}

impl CartEvent {
    #[must_use]
    pub const fn entry(&self) -> &CartEntry {
        match self {
            Self::Added { entry, .. } | Self::Removed { entry, .. } => entry,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Added { index, .. } | Self::Removed { index, .. } => *index,
        }
    }
}

/// Subscriber notified after every cart mutation.
///
/// `entries` is the cart as it stands after the change.
pub trait CartObserver: Send + Sync {
    fn notify(&mut self, event: &CartEvent, entries: &[CartEntry]);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartEvent, &[CartEntry]) + Send + Sync,
{
    fn notify(&mut self, event: &CartEvent, entries: &[CartEntry]) {
        self(event, entries);
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// Serializable cart contents, without subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub entries: Vec<CartEntry>,
    pub next_id: EntryId,
}

/// Ordered, duplicate-friendly list of cart entries with observer fan-out.
#[derive(Default)]
pub struct CartStore {
    entries: Vec<CartEntry>,
    next_id: EntryId,
    observers: Vec<(SubscriptionId, Box<dyn CartObserver>)>,
    next_subscription: usize,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("entries", &self.entries)
            .field("next_id", &self.next_id)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartStore {
    /// An empty cart, as at the start of a session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot. Subscribers are not restored.
    #[must_use]
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        let after_existing = snapshot
            .entries
            .iter()
            .map(|e| e.id.next())
            .max()
            .unwrap_or_default();

        Self {
            next_id: snapshot.next_id.max(after_existing),
            entries: snapshot.entries,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            entries: self.entries.clone(),
            next_id: self.next_id,
        }
    }

    /// Register an observer for all later mutations.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Append an item as a new entry. Never merges with existing entries.
    pub fn add_entry(&mut self, item: CartItem) -> CartEvent {
        let entry = CartEntry {
            id: self.next_id,
            unit_price: item.unit_price(),
            item,
        };
        self.next_id = self.next_id.next();
        self.entries.push(entry.clone());

        let event = CartEvent::Added {
            index: self.entries.len() - 1,
            entry,
        };
        self.publish(&event);
        event
    }

    /// Remove the entry at `index`. Out-of-range indices leave the cart
    /// untouched and return `None`.
    pub fn remove_entry(&mut self, index: usize) -> Option<CartEvent> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        let event = CartEvent::Removed { index, entry };
        self.publish(&event);
        Some(event)
    }

    /// Remove the entry with the given id, if it's still in the cart.
    pub fn remove_by_id(&mut self, id: EntryId) -> Option<CartEvent> {
        let index = self.position_of(id)?;
        self.remove_entry(index)
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the frozen unit prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::unit_price).sum()
    }

    #[must_use]
    pub fn count_of(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind() == kind).count()
    }

    fn publish(&mut self, event: &CartEvent) {
        for (_, observer) in &mut self.observers {
            observer.notify(event, &self.entries);
        }
    }
}
