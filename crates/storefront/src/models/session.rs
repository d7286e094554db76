//! Session-stored cart state.
//!
//! The shopper's cart lives in their session as a [`CartSnapshot`] plus the
//! trial-room selection. Handlers load a [`ShopperCart`], mutate it through
//! the cart store, and save it back.

use detach_core::{
    CartEntry, CartEvent, CartItem, CartItemError, CartSnapshot, CartStore, Design, EntryId,
    EntryKind, Garment, TrialRoomSelection, selection,
};
use tower_sessions::Session;

use crate::services::cart_log::TracingObserver;

/// Session keys for cart data.
pub mod keys {
    /// Key for the cart snapshot.
    pub const CART: &str = "cart";

    /// Key for the trial-room selection.
    pub const TRIAL_ROOM: &str = "trial_room";
}

/// A shopper's cart for the duration of one request.
#[derive(Debug)]
pub struct ShopperCart {
    store: CartStore,
    selection: TrialRoomSelection,
}

impl ShopperCart {
    /// An empty cart with logging attached.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(CartSnapshot::default(), TrialRoomSelection::default())
    }

    fn from_parts(snapshot: CartSnapshot, selection: TrialRoomSelection) -> Self {
        let mut store = CartStore::from_snapshot(snapshot);
        store.subscribe(TracingObserver);
        Self { store, selection }
    }

    /// Load the cart from the session, starting empty if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or holds corrupt data.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        let snapshot = session
            .get::<CartSnapshot>(keys::CART)
            .await?
            .unwrap_or_default();
        let selection = session
            .get::<TrialRoomSelection>(keys::TRIAL_ROOM)
            .await?
            .unwrap_or_default();
        Ok(Self::from_parts(snapshot, selection))
    }

    /// Write the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::CART, self.store.snapshot()).await?;
        session.insert(keys::TRIAL_ROOM, self.selection).await
    }

    /// Append an item and keep the trial-room selection valid.
    pub fn add(&mut self, item: CartItem) -> CartEvent {
        let event = self.store.add_entry(item);
        self.selection.apply(&event, self.store.entries());
        event
    }

    /// Add a garment in `size` and a design as two entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the garment doesn't come in `size`; nothing is
    /// added in that case.
    pub fn add_both(
        &mut self,
        garment: &Garment,
        size: &str,
        design: &Design,
    ) -> Result<[CartEvent; 2], CartItemError> {
        let events = selection::add_both(&mut self.store, garment, size, design)?;
        for event in &events {
            self.selection.apply(event, self.store.entries());
        }
        Ok(events)
    }

    /// Remove by cart position. Out-of-range positions are a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<CartEvent> {
        let event = self.store.remove_entry(index)?;
        self.selection.apply(&event, self.store.entries());
        Some(event)
    }

    /// Remove by entry id. Unknown ids are a no-op.
    pub fn remove_entry(&mut self, id: EntryId) -> Option<CartEvent> {
        let event = self.store.remove_by_id(id)?;
        self.selection.apply(&event, self.store.entries());
        Some(event)
    }

    /// Select a trial-room position. Out-of-range positions are ignored.
    pub fn select(&mut self, kind: EntryKind, index: usize) -> bool {
        self.selection.select(kind, index, self.store.entries())
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        self.store.entries()
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    #[must_use]
    pub const fn selection(&self) -> TrialRoomSelection {
        self.selection
    }
}

impl Default for ShopperCart {
    fn default() -> Self {
        Self::new()
    }
}

/// Cart badge state shared by page templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartBadge {
    pub count: usize,
}

impl CartBadge {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl From<&ShopperCart> for CartBadge {
    fn from(cart: &ShopperCart) -> Self {
        Self {
            count: cart.store.len(),
        }
    }
}
