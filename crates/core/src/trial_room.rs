//! Trial room: try any garment in the cart with any design in the cart.
//!
//! The cart is split into a garment subset and a design subset. Each subset
//! has its own selected position, which must stay valid as entries come and
//! go. [`TrialRoomSelection::apply`] keeps it valid by reacting to the
//! store's [`CartEvent`]s.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cart::{CartEntry, CartEvent, EntryKind};
use crate::catalog::{Design, Garment};
use crate::selection::combined_price;
use crate::types::Price;

/// Split entries into `(garments, designs)`, keeping cart order in each.
#[must_use]
pub fn partition(entries: &[CartEntry]) -> (Vec<&CartEntry>, Vec<&CartEntry>) {
    entries.iter().partition(|e| e.kind() == EntryKind::Garment)
}

/// Entries of one kind, in cart order.
#[must_use]
pub fn subset(entries: &[CartEntry], kind: EntryKind) -> Vec<&CartEntry> {
    entries.iter().filter(|e| e.kind() == kind).collect()
}

/// Map a position in a kind's subset back to a position in the full cart.
///
/// The subset entry is matched by product value (garments by display name,
/// designs by id), and the first matching cart entry wins. Two garments with
/// the same name are therefore indistinguishable here; removal by
/// [`EntryId`](crate::types::EntryId) avoids that ambiguity.
#[must_use]
pub fn find_cart_index(subset_index: usize, kind: EntryKind, entries: &[CartEntry]) -> Option<usize> {
    let target = subset(entries, kind).get(subset_index).copied()?;
    entries
        .iter()
        .position(|e| e.kind() == kind && e.same_product(target))
}

/// Reconciled selection after removing `removed` from a subset that now has
/// `remaining` entries.
///
/// Removing the selected entry moves the selection back one place (never
/// below zero). Removing an earlier entry shifts the selection down so it
/// keeps pointing at the same entry. The result is always 0 or `< remaining`.
#[must_use]
pub fn reconcile_removal(selected: usize, removed: usize, remaining: usize) -> usize {
    if remaining == 0 {
        return 0;
    }
    let moved = match removed.cmp(&selected) {
        Ordering::Equal => removed.saturating_sub(1),
        Ordering::Less => selected - 1,
        Ordering::Greater => selected,
    };
    moved.min(remaining - 1)
}

/// Per-category state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryState {
    Empty,
    HasSelection { selected: usize },
}

/// Selected positions within the garment and design subsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRoomSelection {
    garment: usize,
    design: usize,
}

impl TrialRoomSelection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            garment: 0,
            design: 0,
        }
    }

    /// The raw selected position for `kind`.
    #[must_use]
    pub const fn selected(&self, kind: EntryKind) -> usize {
        match kind {
            EntryKind::Garment => self.garment,
            EntryKind::Design => self.design,
        }
    }

    fn slot(&mut self, kind: EntryKind) -> &mut usize {
        match kind {
            EntryKind::Garment => &mut self.garment,
            EntryKind::Design => &mut self.design,
        }
    }

    /// State of `kind` against the current cart. An out-of-range stored
    /// position reads as the last entry.
    #[must_use]
    pub fn state(&self, kind: EntryKind, entries: &[CartEntry]) -> CategoryState {
        let len = entries.iter().filter(|e| e.kind() == kind).count();
        if len == 0 {
            CategoryState::Empty
        } else {
            CategoryState::HasSelection {
                selected: self.selected(kind).min(len - 1),
            }
        }
    }

    /// Select a subset position. Out-of-range positions are ignored.
    pub fn select(&mut self, kind: EntryKind, index: usize, entries: &[CartEntry]) -> bool {
        let len = entries.iter().filter(|e| e.kind() == kind).count();
        if index >= len {
            return false;
        }
        *self.slot(kind) = index;
        true
    }

    /// Update the selection for a cart change. `entries` is the cart after
    /// the change.
    pub fn apply(&mut self, event: &CartEvent, entries: &[CartEntry]) {
        let kind = event.entry().kind();
        let remaining = entries.iter().filter(|e| e.kind() == kind).count();

        match event {
            CartEvent::Added { .. } => {
                if remaining == 1 {
                    *self.slot(kind) = 0;
                }
            }
            CartEvent::Removed { index, .. } => {
                let removed = entries
                    .iter()
                    .take(*index)
                    .filter(|e| e.kind() == kind)
                    .count();
                let selected = self.selected(kind);
                *self.slot(kind) = reconcile_removal(selected, removed, remaining);
            }
        }
    }
}

/// A read-only trial room built from the cart and a selection.
#[derive(Debug, Clone)]
pub struct TrialRoom<'a> {
    pub garments: Vec<&'a CartEntry>,
    pub designs: Vec<&'a CartEntry>,
    selection: TrialRoomSelection,
}

impl<'a> TrialRoom<'a> {
    #[must_use]
    pub fn new(entries: &'a [CartEntry], selection: TrialRoomSelection) -> Self {
        let (garments, designs) = partition(entries);
        Self {
            garments,
            designs,
            selection,
        }
    }

    fn selected_in(subset: &[&'a CartEntry], selected: usize) -> Option<&'a CartEntry> {
        let last = subset.len().checked_sub(1)?;
        subset.get(selected.min(last)).copied()
    }

    #[must_use]
    pub fn selected_index(&self, kind: EntryKind) -> Option<usize> {
        let len = match kind {
            EntryKind::Garment => self.garments.len(),
            EntryKind::Design => self.designs.len(),
        };
        let last = len.checked_sub(1)?;
        Some(self.selection.selected(kind).min(last))
    }

    #[must_use]
    pub fn selected_garment_entry(&self) -> Option<&'a CartEntry> {
        Self::selected_in(&self.garments, self.selection.selected(EntryKind::Garment))
    }

    #[must_use]
    pub fn selected_design_entry(&self) -> Option<&'a CartEntry> {
        Self::selected_in(&self.designs, self.selection.selected(EntryKind::Design))
    }

    #[must_use]
    pub fn selected_garment(&self) -> Option<&'a Garment> {
        self.selected_garment_entry().and_then(CartEntry::garment)
    }

    #[must_use]
    pub fn selected_design(&self) -> Option<&'a Design> {
        self.selected_design_entry().and_then(CartEntry::design)
    }

    /// Combined price of the previewed pair, if both subsets have entries.
    #[must_use]
    pub fn preview_price(&self) -> Option<Price> {
        Some(combined_price(self.selected_garment()?, self.selected_design()?))
    }

    /// Caption for the previewed pair, e.g. "Black + Design #3".
    #[must_use]
    pub fn preview_caption(&self) -> Option<String> {
        let garment = self.selected_garment()?;
        let design = self.selected_design()?;
        Some(format!("{} + {}", garment.display_name, design.label()))
    }

    /// Checkout needs at least one garment and one design.
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        !self.garments.is_empty() && !self.designs.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::{CartItem, CartStore};
    use crate::catalog::Catalog;
    use crate::types::{DesignId, EntryId, GarmentId};

    fn garment(catalog: &Catalog, id: u32) -> CartItem {
        CartItem::garment(catalog.garment(GarmentId::new(id)).unwrap().clone(), "XL").unwrap()
    }

    fn design(catalog: &Catalog, id: u32) -> CartItem {
        CartItem::design(catalog.design(DesignId::new(id)).unwrap().clone())
    }

    /// Cart plus selection wired the way the storefront wires them.
    struct Room {
        cart: CartStore,
        selection: TrialRoomSelection,
    }

    impl Room {
        fn new() -> Self {
            Self {
                cart: CartStore::new(),
                selection: TrialRoomSelection::new(),
            }
        }

        fn add(&mut self, item: CartItem) -> EntryId {
            let event = self.cart.add_entry(item);
            self.selection.apply(&event, self.cart.entries());
            event.entry().id()
        }

        fn remove(&mut self, id: EntryId) {
            if let Some(event) = self.cart.remove_by_id(id) {
                self.selection.apply(&event, self.cart.entries());
            }
        }

        fn state(&self, kind: EntryKind) -> CategoryState {
            self.selection.state(kind, self.cart.entries())
        }
    }

    #[test]
    fn test_partition_preserves_order() {
        let catalog = Catalog::detach();
        let mut cart = CartStore::new();
        cart.add_entry(design(&catalog, 5));
        cart.add_entry(garment(&catalog, 2));
        cart.add_entry(design(&catalog, 1));
        cart.add_entry(garment(&catalog, 4));

        let (garments, designs) = partition(cart.entries());
        let g: Vec<u32> = garments.iter().map(|e| e.garment().unwrap().id.get()).collect();
        let d: Vec<u32> = designs.iter().map(|e| e.design().unwrap().id.get()).collect();
        assert_eq!(g, vec![2, 4]);
        assert_eq!(d, vec![5, 1]);
    }

    #[test]
    fn test_find_cart_index() {
        let catalog = Catalog::detach();
        let mut cart = CartStore::new();
        cart.add_entry(design(&catalog, 5));
        cart.add_entry(garment(&catalog, 2));
        cart.add_entry(design(&catalog, 1));
        cart.add_entry(garment(&catalog, 4));

        assert_eq!(find_cart_index(0, EntryKind::Garment, cart.entries()), Some(1));
        assert_eq!(find_cart_index(1, EntryKind::Garment, cart.entries()), Some(3));
        assert_eq!(find_cart_index(1, EntryKind::Design, cart.entries()), Some(2));
        assert_eq!(find_cart_index(2, EntryKind::Design, cart.entries()), None);
    }

    #[test]
    fn test_find_cart_index_value_match_hits_first_duplicate() {
        let catalog = Catalog::detach();
        let mut cart = CartStore::new();
        cart.add_entry(garment(&catalog, 3));
        cart.add_entry(design(&catalog, 1));
        cart.add_entry(garment(&catalog, 3));

        // Both "Black" entries resolve to the first one.
        assert_eq!(find_cart_index(0, EntryKind::Garment, cart.entries()), Some(0));
        assert_eq!(find_cart_index(1, EntryKind::Garment, cart.entries()), Some(0));
    }

    #[test]
    fn test_reconcile_removal_rule() {
        assert_eq!(reconcile_removal(2, 2, 2), 1);
        assert_eq!(reconcile_removal(0, 0, 3), 0);
        assert_eq!(reconcile_removal(3, 1, 4), 2);
        assert_eq!(reconcile_removal(1, 3, 3), 1);
        assert_eq!(reconcile_removal(0, 0, 0), 0);
    }

    #[test]
    fn test_empty_cart_has_empty_subsets() {
        let room = Room::new();
        assert_eq!(room.state(EntryKind::Garment), CategoryState::Empty);
        assert_eq!(room.state(EntryKind::Design), CategoryState::Empty);
    }

    #[test]
    fn test_first_add_selects_index_zero() {
        let catalog = Catalog::detach();
        let mut room = Room::new();
        room.add(garment(&catalog, 1));
        assert_eq!(
            room.state(EntryKind::Garment),
            CategoryState::HasSelection { selected: 0 }
        );
        assert_eq!(room.state(EntryKind::Design), CategoryState::Empty);
    }

    #[test]
    fn test_removing_last_selected_design_moves_back() {
        let catalog = Catalog::detach();
        let mut room = Room::new();
        let ids: Vec<EntryId> = (1..=3).map(|id| room.add(design(&catalog, id))).collect();
        assert!(room.selection.select(EntryKind::Design, 2, room.cart.entries()));

        room.remove(ids[2]);
        assert_eq!(
            room.state(EntryKind::Design),
            CategoryState::HasSelection { selected: 1 }
        );
        let view = TrialRoom::new(room.cart.entries(), room.selection);
        assert_eq!(view.selected_design().unwrap().id, DesignId::new(2));
    }

    #[test]
    fn test_removing_until_empty() {
        let catalog = Catalog::detach();
        let mut room = Room::new();
        let only = room.add(garment(&catalog, 1));
        room.remove(only);
        assert_eq!(room.state(EntryKind::Garment), CategoryState::Empty);

        room.add(garment(&catalog, 2));
        assert_eq!(
            room.state(EntryKind::Garment),
            CategoryState::HasSelection { selected: 0 }
        );
    }

    #[test]
    fn test_removing_other_kind_leaves_selection() {
        let catalog = Catalog::detach();
        let mut room = Room::new();
        room.add(design(&catalog, 1));
        let g = room.add(garment(&catalog, 1));
        room.add(design(&catalog, 2));
        room.selection.select(EntryKind::Design, 1, room.cart.entries());

        room.remove(g);
        assert_eq!(
            room.state(EntryKind::Design),
            CategoryState::HasSelection { selected: 1 }
        );
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let catalog = Catalog::detach();
        let mut room = Room::new();
        room.add(design(&catalog, 1));
        assert!(!room.selection.select(EntryKind::Design, 1, room.cart.entries()));
        assert!(!room.selection.select(EntryKind::Garment, 0, room.cart.entries()));
        assert_eq!(room.selection.selected(EntryKind::Design), 0);
    }

    #[test]
    fn test_selection_invariant_over_operation_sequence() {
        let catalog = Catalog::detach();
        let mut room = Room::new();
        let mut ids = Vec::new();

        // Deterministic mix of adds, selects and removes.
        for step in 0_u32..200 {
            match step % 5 {
                0 | 1 => ids.push(room.add(design(&catalog, step % 24 + 1))),
                2 => ids.push(room.add(garment(&catalog, step % 5 + 1))),
                3 => {
                    let len = room.cart.count_of(EntryKind::Design);
                    let pick = (step as usize * 7) % (len + 1);
                    room.selection.select(EntryKind::Design, pick, room.cart.entries());
                }
                _ => {
                    if !ids.is_empty() {
                        let victim = ids.remove((step as usize * 13) % ids.len());
                        room.remove(victim);
                    }
                }
            }

            for kind in [EntryKind::Garment, EntryKind::Design] {
                let len = room.cart.count_of(kind);
                let selected = room.selection.selected(kind);
                assert!(selected == 0 || selected < len, "step {step}: {selected} vs {len}");
            }
        }
    }

    #[test]
    fn test_preview() {
        let catalog = Catalog::detach();
        let mut room = Room::new();
        room.add(garment(&catalog, 3));
        let view = TrialRoom::new(room.cart.entries(), room.selection);
        assert!(!view.can_checkout());
        assert_eq!(view.preview_price(), None);

        room.add(design(&catalog, 3));
        let view = TrialRoom::new(room.cart.entries(), room.selection);
        assert!(view.can_checkout());
        assert_eq!(view.preview_caption().unwrap(), "Black + Design #3");
        assert_eq!(view.preview_price(), Some(Price::rupees(598)));
        assert_eq!(view.selected_index(EntryKind::Design), Some(0));
    }
}
