//! Trial room route handlers.
//!
//! The trial room splits the cart into garments and designs and previews the
//! selected pair. Selection and removal are plain form posts that redirect
//! back to the page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Redirect},
};
use detach_core::{CartEntry, EntryId, EntryKind, TrialRoom};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::{CartBadge, ShopperCart};

const TRIAL_ROOM_PATH: &str = "/trial-room";

/// One card in a trial-room column.
#[derive(Clone)]
pub struct TrialRoomCard {
    /// Position within its column.
    pub index: usize,
    pub entry_id: String,
    pub title: String,
    pub size: Option<String>,
    pub image: String,
    pub price: String,
    pub selected: bool,
}

impl TrialRoomCard {
    fn column(entries: &[&CartEntry], selected: Option<usize>) -> Vec<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Self {
                index,
                entry_id: entry.id().to_string(),
                title: entry.title(),
                size: entry.size().map(str::to_string),
                image: entry.image_ref().to_string(),
                price: entry.unit_price().to_string(),
                selected: selected == Some(index),
            })
            .collect()
    }
}

/// The previewed pair.
#[derive(Clone)]
pub struct TrialRoomPreview {
    pub garment_image: Option<String>,
    pub design_image: Option<String>,
    pub caption: Option<String>,
    pub price: Option<String>,
}

/// Trial room page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/trial_room.html")]
pub struct TrialRoomTemplate {
    pub garments: Vec<TrialRoomCard>,
    pub designs: Vec<TrialRoomCard>,
    pub preview: TrialRoomPreview,
    pub can_checkout: bool,
    pub badge: CartBadge,
}

impl From<&ShopperCart> for TrialRoomTemplate {
    fn from(cart: &ShopperCart) -> Self {
        let room = TrialRoom::new(cart.entries(), cart.selection());
        let preview = TrialRoomPreview {
            garment_image: room
                .selected_garment_entry()
                .map(|e| e.image_ref().to_string()),
            design_image: room
                .selected_design_entry()
                .map(|e| e.image_ref().to_string()),
            caption: room.preview_caption(),
            price: room.preview_price().map(|p| p.to_string()),
        };

        Self {
            garments: TrialRoomCard::column(
                &room.garments,
                room.selected_index(EntryKind::Garment),
            ),
            designs: TrialRoomCard::column(&room.designs, room.selected_index(EntryKind::Design)),
            preview,
            can_checkout: room.can_checkout(),
            badge: CartBadge::from(cart),
        }
    }
}

/// Select form data.
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub kind: EntryKind,
    pub index: usize,
}

/// Remove form data.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub entry_id: EntryId,
}

/// Display the trial room.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let cart = ShopperCart::load(&session).await?;
    Ok(TrialRoomTemplate::from(&cart))
}

/// Choose which garment or design is previewed.
///
/// Out-of-range positions are ignored.
#[instrument(skip(session))]
pub async fn select(session: Session, Form(form): Form<SelectForm>) -> Result<Redirect> {
    let mut cart = ShopperCart::load(&session).await?;

    if cart.select(form.kind, form.index) {
        cart.save(&session).await?;
    } else {
        tracing::debug!(kind = %form.kind, index = form.index, "Ignoring out-of-range selection");
    }

    Ok(Redirect::to(TRIAL_ROOM_PATH))
}

/// Remove an entry and keep the preview on a valid item.
///
/// Unknown entry ids are ignored.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveForm>) -> Result<Redirect> {
    let mut cart = ShopperCart::load(&session).await?;

    if cart.remove_entry(form.entry_id).is_some() {
        cart.save(&session).await?;
    } else {
        tracing::debug!(entry_id = %form.entry_id, "Ignoring removal of unknown entry");
    }

    Ok(Redirect::to(TRIAL_ROOM_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use detach_core::{Catalog, CartItem, DesignId, GarmentId};

    use super::*;

    #[test]
    fn test_empty_trial_room() {
        let page = TrialRoomTemplate::from(&ShopperCart::new());
        assert!(page.garments.is_empty());
        assert!(page.designs.is_empty());
        assert!(page.preview.caption.is_none());
        assert!(!page.can_checkout);
    }

    #[test]
    fn test_trial_room_preview() {
        let catalog = Catalog::detach();
        let mut cart = ShopperCart::new();
        let black = catalog.garment(GarmentId::new(3)).unwrap().clone();
        cart.add(CartItem::garment(black, "XL").unwrap());
        cart.add(CartItem::design(catalog.design(DesignId::new(3)).unwrap().clone()));
        cart.add(CartItem::design(catalog.design(DesignId::new(8)).unwrap().clone()));
        cart.select(EntryKind::Design, 1);

        let page = TrialRoomTemplate::from(&cart);
        assert_eq!(page.garments.len(), 1);
        assert_eq!(page.designs.len(), 2);
        assert!(page.designs[1].selected);
        assert!(!page.designs[0].selected);
        assert_eq!(page.preview.caption.as_deref(), Some("Black + Design #8"));
        assert_eq!(page.preview.price.as_deref(), Some("₹598"));
        assert!(page.can_checkout);
        assert_eq!(page.badge.count, 3);
    }
}
