//! Browsing state for the customizer views.
//!
//! Each view keeps a current index per category and cycles through the
//! catalog with [`next_index`] / [`prev_index`]. The displayed pair and its
//! combined price come from [`CustomizerState::combination`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{CartEvent, CartItem, CartItemError, CartStore};
use crate::catalog::{Catalog, Design, Garment};
use crate::types::Price;

/// Size of the design pool shown in the showroom carousel.
pub const SHOWROOM_DESIGN_POOL: usize = 10;

/// Errors from cycling through a category.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("cannot navigate an empty category")]
    EmptyCategory,
}

/// `(current + 1) mod length`.
///
/// # Errors
///
/// Returns `SelectionError::EmptyCategory` when `length` is zero.
pub const fn next_index(current: usize, length: usize) -> Result<usize, SelectionError> {
    if length == 0 {
        return Err(SelectionError::EmptyCategory);
    }
    Ok((current % length + 1) % length)
}

/// `(current - 1 + length) mod length`.
///
/// # Errors
///
/// Returns `SelectionError::EmptyCategory` when `length` is zero.
pub const fn prev_index(current: usize, length: usize) -> Result<usize, SelectionError> {
    if length == 0 {
        return Err(SelectionError::EmptyCategory);
    }
    Ok((current % length + length - 1) % length)
}

/// Price of wearing `design` on `garment`.
#[must_use]
pub fn combined_price(garment: &Garment, design: &Design) -> Price {
    garment.unit_price + design.unit_price
}

/// Add a garment and a design as two independent entries.
///
/// # Errors
///
/// Returns an error if `size` isn't offered for the garment; nothing is added
/// in that case.
pub fn add_both(
    cart: &mut CartStore,
    garment: &Garment,
    size: &str,
    design: &Design,
) -> Result<[CartEvent; 2], CartItemError> {
    let garment_item = CartItem::garment(garment.clone(), size)?;
    let garment_event = cart.add_entry(garment_item);
    let design_event = cart.add_entry(CartItem::design(design.clone()));
    Ok([garment_event, design_event])
}

/// Previous, current and next positions around `current`, for carousels.
///
/// # Errors
///
/// Returns `SelectionError::EmptyCategory` when `length` is zero.
pub const fn neighbours(current: usize, length: usize) -> Result<[usize; 3], SelectionError> {
    let prev = match prev_index(current, length) {
        Ok(i) => i,
        Err(e) => return Err(e),
    };
    let next = match next_index(current, length) {
        Ok(i) => i,
        Err(e) => return Err(e),
    };
    Ok([prev, current % length, next])
}

/// Which garment, design and size a customizer view is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomizerState {
    #[serde(default)]
    pub garment: usize,
    #[serde(default)]
    pub design: usize,
    #[serde(default)]
    pub size: Option<String>,
}

/// A resolved garment/design pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination<'a> {
    pub garment_index: usize,
    pub design_index: usize,
    pub garment: &'a Garment,
    pub design: &'a Design,
    pub size: String,
    pub price: Price,
}

impl CustomizerState {
    /// Resolve indices against the catalog.
    ///
    /// Indices wrap around the category length; a size the garment doesn't
    /// offer falls back to its first size.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::EmptyCategory` if either category is empty.
    pub fn combination<'a>(&self, catalog: &'a Catalog) -> Result<Combination<'a>, SelectionError> {
        let garment_index = wrap(self.garment, catalog.garments.len())?;
        let design_index = wrap(self.design, catalog.designs.len())?;
        let garment = catalog
            .garment_at(garment_index)
            .ok_or(SelectionError::EmptyCategory)?;
        let design = catalog
            .design_at(design_index)
            .ok_or(SelectionError::EmptyCategory)?;

        let size = self
            .size
            .as_deref()
            .filter(|s| garment.offers_size(s))
            .or_else(|| garment.default_size())
            .unwrap_or_default()
            .to_string();

        Ok(Combination {
            garment_index,
            design_index,
            garment,
            design,
            size,
            price: combined_price(garment, design),
        })
    }

    /// Step to the next garment, keeping the chosen size.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::EmptyCategory` if the catalog has no garments.
    pub fn next_garment(&self, catalog: &Catalog) -> Result<Self, SelectionError> {
        Ok(Self {
            garment: next_index(self.garment, catalog.garments.len())?,
            ..self.clone()
        })
    }

    /// # Errors
    ///
    /// Returns `SelectionError::EmptyCategory` if the catalog has no garments.
    pub fn prev_garment(&self, catalog: &Catalog) -> Result<Self, SelectionError> {
        Ok(Self {
            garment: prev_index(self.garment, catalog.garments.len())?,
            ..self.clone()
        })
    }

    /// # Errors
    ///
    /// Returns `SelectionError::EmptyCategory` if the catalog has no designs.
    pub fn next_design(&self, catalog: &Catalog) -> Result<Self, SelectionError> {
        Ok(Self {
            design: next_index(self.design, catalog.designs.len())?,
            ..self.clone()
        })
    }

    /// # Errors
    ///
    /// Returns `SelectionError::EmptyCategory` if the catalog has no designs.
    pub fn prev_design(&self, catalog: &Catalog) -> Result<Self, SelectionError> {
        Ok(Self {
            design: prev_index(self.design, catalog.designs.len())?,
            ..self.clone()
        })
    }

    /// A random pairing for the "surprise me" view. The size is kept.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::EmptyCategory` if either category is empty.
    pub fn shuffled<R: Rng>(
        &self,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Result<Self, SelectionError> {
        if catalog.garments.is_empty() || catalog.designs.is_empty() {
            return Err(SelectionError::EmptyCategory);
        }
        Ok(Self {
            garment: rng.random_range(0..catalog.garments.len()),
            design: rng.random_range(0..catalog.designs.len()),
            size: self.size.clone(),
        })
    }
}

const fn wrap(index: usize, length: usize) -> Result<usize, SelectionError> {
    if length == 0 {
        return Err(SelectionError::EmptyCategory);
    }
    Ok(index % length)
}
