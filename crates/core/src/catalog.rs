//! Product catalog: base garments and detachable designs.
//!
//! The catalog is static, trusted data supplied once at startup. The built-in
//! [`Catalog::detach`] matches the current collection; [`Catalog::from_json`]
//! lets the storefront load a replacement file instead.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DesignId, GarmentId, Price};

/// Fabric and fit line shared by the current garment range.
const GARMENT_DETAILS: &str = "240 GSM Bio-Washed Cotton • Oversized Fit";

/// Number of designs in the current collection.
const DESIGN_COUNT: u32 = 24;

/// Names for designs, indexed by `id - 1`.
const ARTWORK_NAMES: [&str; 64] = [
    "Eclipse", "Nova", "Luna", "Sol", "Orbit", "Cosmos", "Nebula", "Pulsar", "Quasar", "Vortex",
    "Zenith", "Aurora", "Celestial", "Infinity", "Eternal", "Mirage", "Onyx", "Crimson", "Azure",
    "Emerald", "Sapphire", "Amber", "Ivory", "Obsidian", "Platinum", "Titan", "Aether", "Phantom",
    "Vapor", "Luster", "Prism", "Radiance", "Silhouette", "Echo", "Ripple", "Frost", "Ember",
    "Blaze", "Glacier", "Monarch", "Dynasty", "Regal", "Majesty", "Opulence", "Pinnacle",
    "Summit", "Vertex", "Paragon", "Echelon", "Apex", "Crest", "Throne", "Crown", "Scepter",
    "Chalice", "Relic", "Artifact", "Glyph", "Rune", "Sigil", "Talisman", "Pendant", "Medallion",
    "Ornament",
];

/// Display name for a design id, if the name table covers it.
#[must_use]
pub fn artwork_name(id: DesignId) -> Option<&'static str> {
    let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
    ARTWORK_NAMES.get(index).copied()
}

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no garments")]
    NoGarments,
    #[error("catalog has no designs")]
    NoDesigns,
    #[error("duplicate garment id {0}")]
    DuplicateGarment(GarmentId),
    #[error("duplicate design id {0}")]
    DuplicateDesign(DesignId),
    #[error("garment {0} has no sizes")]
    NoSizes(GarmentId),
    #[error("{0} must have a positive whole-rupee price")]
    InvalidPrice(String),
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A base garment sold in one of its sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garment {
    pub id: GarmentId,
    pub display_name: String,
    pub image_ref: String,
    #[serde(default)]
    pub details: String,
    pub allowed_sizes: Vec<String>,
    pub unit_price: Price,
}

impl Garment {
    /// Whether `size` is one of this garment's sizes.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.allowed_sizes.iter().any(|s| s == size)
    }

    /// The size preselected in the customizer.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.allowed_sizes.first().map(String::as_str)
    }
}

/// A detachable design, sold without a size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Design {
    pub id: DesignId,
    pub image_ref: String,
    pub unit_price: Price,
}

impl Design {
    /// Name from the artwork table; `None` past the end of the table.
    #[must_use]
    pub fn display_name(&self) -> Option<&'static str> {
        artwork_name(self.id)
    }

    /// Short label used across the storefront (e.g. "Design #7").
    #[must_use]
    pub fn label(&self) -> String {
        format!("Design #{}", self.id)
    }
}

/// The full product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub garments: Vec<Garment>,
    pub designs: Vec<Design>,
}

impl Catalog {
    /// The built-in Detach collection.
    #[must_use]
    pub fn detach() -> Self {
        let garment = |id: u32, name: &str, price: u32| Garment {
            id: GarmentId::new(id),
            display_name: name.to_string(),
            image_ref: format!("/mockups/tshirt_{id}.jpg"),
            details: GARMENT_DETAILS.to_string(),
            allowed_sizes: vec!["XL".to_string(), "XXL".to_string()],
            unit_price: Price::rupees(price),
        };

        let garments = vec![
            garment(1, "Maroon", 499),
            garment(2, "Army Green", 499),
            garment(3, "Black", 399),
            garment(4, "Lavender", 399),
            garment(5, "White", 499),
        ];

        let designs = (1..=DESIGN_COUNT)
            .map(|id| Design {
                id: DesignId::new(id),
                image_ref: format!("/designs/image_{id}.webp"),
                unit_price: Price::rupees(199),
            })
            .collect();

        Self { garments, designs }
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the catalog invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: an empty category, a duplicate id,
    /// a garment without sizes, or a price that isn't a positive whole number.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.garments.is_empty() {
            return Err(CatalogError::NoGarments);
        }
        if self.designs.is_empty() {
            return Err(CatalogError::NoDesigns);
        }

        let mut garment_ids = HashSet::new();
        for garment in &self.garments {
            if !garment_ids.insert(garment.id) {
                return Err(CatalogError::DuplicateGarment(garment.id));
            }
            if garment.allowed_sizes.is_empty() {
                return Err(CatalogError::NoSizes(garment.id));
            }
            if !garment.unit_price.is_positive_whole() {
                return Err(CatalogError::InvalidPrice(format!(
                    "garment {}",
                    garment.id
                )));
            }
        }

        let mut design_ids = HashSet::new();
        for design in &self.designs {
            if !design_ids.insert(design.id) {
                return Err(CatalogError::DuplicateDesign(design.id));
            }
            if !design.unit_price.is_positive_whole() {
                return Err(CatalogError::InvalidPrice(format!("design {}", design.id)));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn garment(&self, id: GarmentId) -> Option<&Garment> {
        self.garments.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub fn design(&self, id: DesignId) -> Option<&Design> {
        self.designs.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn garment_at(&self, index: usize) -> Option<&Garment> {
        self.garments.get(index)
    }

    #[must_use]
    pub fn design_at(&self, index: usize) -> Option<&Design> {
        self.designs.get(index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_detach_catalog_is_valid() {
        let catalog = Catalog::detach();
        catalog.validate().unwrap();
        assert_eq!(catalog.garments.len(), 5);
        assert_eq!(catalog.designs.len(), 24);
        assert_eq!(catalog.garments[2].display_name, "Black");
        assert_eq!(catalog.garments[2].unit_price, Price::rupees(399));
        assert_eq!(catalog.designs[6].image_ref, "/designs/image_7.webp");
    }

    #[test]
    fn test_artwork_names() {
        assert_eq!(artwork_name(DesignId::new(1)), Some("Eclipse"));
        assert_eq!(artwork_name(DesignId::new(64)), Some("Ornament"));
        assert_eq!(artwork_name(DesignId::new(65)), None);
        assert_eq!(artwork_name(DesignId::new(0)), None);
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::detach();
        assert_eq!(
            catalog.garment(GarmentId::new(4)).unwrap().display_name,
            "Lavender"
        );
        assert!(catalog.garment(GarmentId::new(99)).is_none());
        assert_eq!(catalog.design(DesignId::new(24)).unwrap().label(), "Design #24");
    }

    #[test]
    fn test_sizes() {
        let catalog = Catalog::detach();
        let maroon = catalog.garment_at(0).unwrap();
        assert!(maroon.offers_size("XXL"));
        assert!(!maroon.offers_size("S"));
        assert_eq!(maroon.default_size(), Some("XL"));
    }

    #[test]
    fn test_from_json_accepts_numeric_prices() {
        let json = r#"{
            "garments": [
                {"id": 1, "display_name": "A", "image_ref": "/a.jpg",
                 "allowed_sizes": ["M"], "unit_price": 499}
            ],
            "designs": [{"id": 1, "image_ref": "/x.webp", "unit_price": 199}]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.garments[0].details, "");
        assert_eq!(catalog.designs[0].unit_price, Price::rupees(199));
    }

    #[test]
    fn test_validate_rejects_bad_catalogs() {
        let mut catalog = Catalog::detach();
        catalog.designs.clear();
        assert!(matches!(catalog.validate(), Err(CatalogError::NoDesigns)));

        let mut catalog = Catalog::detach();
        catalog.garments[1].id = GarmentId::new(1);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateGarment(_))
        ));

        let mut catalog = Catalog::detach();
        catalog.garments[0].allowed_sizes.clear();
        assert!(matches!(catalog.validate(), Err(CatalogError::NoSizes(_))));

        let mut catalog = Catalog::detach();
        catalog.designs[3].unit_price = Price::ZERO;
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_of_builtin() {
        let json = serde_json::to_string(&Catalog::detach()).unwrap();
        assert_eq!(Catalog::from_json(&json).unwrap(), Catalog::detach());
    }
}
