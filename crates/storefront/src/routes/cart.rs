//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the shopper's session (see [`ShopperCart`]).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use detach_core::{CartEntry, CartItem, DesignId, GarmentId, selection};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{CartBadge, ShopperCart};
use crate::state::AppState;

/// Header telling HTMX listeners (the cart badge) to refresh.
pub const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart entry display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub index: usize,
    pub entry_id: String,
    pub kind: &'static str,
    pub title: String,
    pub size: Option<String>,
    pub price: String,
    pub image: String,
}

impl CartItemView {
    fn new(index: usize, entry: &CartEntry) -> Self {
        Self {
            index,
            entry_id: entry.id().to_string(),
            kind: entry.kind().as_str(),
            title: entry.title(),
            size: entry.size().map(str::to_string),
            price: entry.unit_price().to_string(),
            image: entry.image_ref().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: usize,
}

impl CartView {
    /// "item" or "items" for the total line.
    #[must_use]
    pub const fn item_noun(&self) -> &'static str {
        if self.item_count == 1 { "item" } else { "items" }
    }
}

impl From<&ShopperCart> for CartView {
    fn from(cart: &ShopperCart) -> Self {
        Self {
            items: cart
                .entries()
                .iter()
                .enumerate()
                .map(|(index, entry)| CartItemView::new(index, entry))
                .collect(),
            total: cart.store().total().to_string(),
            item_count: cart.store().len(),
        }
    }
}

/// Add garment form data.
#[derive(Debug, Deserialize)]
pub struct AddGarmentForm {
    pub garment_id: GarmentId,
    pub size: String,
}

/// Add design form data.
#[derive(Debug, Deserialize)]
pub struct AddDesignForm {
    pub design_id: DesignId,
}

/// Add garment and design together.
#[derive(Debug, Deserialize)]
pub struct AddComboForm {
    pub garment_id: GarmentId,
    pub design_id: DesignId,
    pub size: String,
}

/// Remove from cart form data. Signed so a stray negative index is a no-op
/// rather than a rejected form.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub badge: CartBadge,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub badge: CartBadge,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let cart = ShopperCart::load(&session).await?;
    Ok(CartShowTemplate {
        badge: CartBadge::from(&cart),
        cart: CartView::from(&cart),
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = ShopperCart::load(&session).await?;
    Ok(CartCountTemplate {
        badge: CartBadge::from(&cart),
    })
}

/// Save the cart and answer with a refreshed badge.
async fn badge_response(session: &Session, cart: &ShopperCart) -> Result<Response> {
    cart.save(session).await?;
    Ok((
        AppendHeaders([CART_UPDATED]),
        CartCountTemplate {
            badge: CartBadge::from(cart),
        },
    )
        .into_response())
}

/// Add a garment in one size (HTMX).
#[instrument(skip(state, session))]
pub async fn add_garment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddGarmentForm>,
) -> Result<Response> {
    let garment = state
        .catalog()
        .garment(form.garment_id)
        .ok_or_else(|| AppError::NotFound(format!("garment {}", form.garment_id)))?;
    let item = CartItem::garment(garment.clone(), form.size)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut cart = ShopperCart::load(&session).await?;
    cart.add(item);
    badge_response(&session, &cart).await
}

/// Add a design on its own (HTMX).
#[instrument(skip(state, session))]
pub async fn add_design(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddDesignForm>,
) -> Result<Response> {
    let design = state
        .catalog()
        .design(form.design_id)
        .ok_or_else(|| AppError::NotFound(format!("design {}", form.design_id)))?;

    let mut cart = ShopperCart::load(&session).await?;
    cart.add(CartItem::design(design.clone()));
    badge_response(&session, &cart).await
}

/// Add the customizer's garment and design as two entries (HTMX).
#[instrument(skip(state, session))]
pub async fn add_combo(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddComboForm>,
) -> Result<Response> {
    let catalog = state.catalog();
    let garment = catalog
        .garment(form.garment_id)
        .ok_or_else(|| AppError::NotFound(format!("garment {}", form.garment_id)))?;
    let design = catalog
        .design(form.design_id)
        .ok_or_else(|| AppError::NotFound(format!("design {}", form.design_id)))?;

    tracing::debug!(
        price = %selection::combined_price(garment, design),
        "Adding combination"
    );

    let mut cart = ShopperCart::load(&session).await?;
    cart.add_both(garment, &form.size, design)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    badge_response(&session, &cart).await
}

/// Remove an entry by cart position (HTMX).
///
/// Negative or out-of-range positions leave the cart unchanged.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = ShopperCart::load(&session).await?;

    match usize::try_from(form.index).ok().and_then(|i| cart.remove_at(i)) {
        Some(_) => cart.save(&session).await?,
        None => tracing::debug!(index = form.index, "Ignoring out-of-range cart removal"),
    }

    Ok((
        AppendHeaders([CART_UPDATED]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use detach_core::{Catalog, DesignId};

    use super::*;

    #[test]
    fn test_cart_view_totals_and_noun() {
        let catalog = Catalog::detach();
        let mut cart = ShopperCart::new();
        let design = catalog.design(DesignId::new(2)).unwrap().clone();

        cart.add(CartItem::design(design.clone()));
        let view = CartView::from(&cart);
        assert_eq!(view.item_noun(), "item");
        assert_eq!(view.total, "₹199");

        cart.add(CartItem::design(design));
        let view = CartView::from(&cart);
        assert_eq!(view.item_noun(), "items");
        assert_eq!(view.items[1].index, 1);
    }

    #[test]
    fn test_count_fragment_marks_empty_cart() {
        let empty = CartCountTemplate {
            badge: CartBadge::default(),
        };
        assert_eq!(
            empty.render().unwrap().trim(),
            r#"<span class="cart-count empty">0</span>"#
        );

        let one = CartCountTemplate {
            badge: CartBadge { count: 1 },
        };
        assert_eq!(
            one.render().unwrap().trim(),
            r#"<span class="cart-count">1</span>"#
        );
    }
}
