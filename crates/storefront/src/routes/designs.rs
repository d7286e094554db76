//! Design grid route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::CartBadge;
use crate::routes::cart_badge;
use crate::state::AppState;

/// Design card display data.
#[derive(Clone)]
pub struct DesignCard {
    pub id: String,
    /// Position in the catalog, for linking into the customizer.
    pub index: usize,
    pub label: String,
    pub name: Option<&'static str>,
    pub image: String,
    pub price: String,
}

/// Design grid page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/designs.html")]
pub struct DesignsTemplate {
    pub designs: Vec<DesignCard>,
    pub badge: CartBadge,
}

/// Display every design with an add-to-cart button.
///
/// # Errors
///
/// Returns an error if the session can't be read.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let designs = state
        .catalog()
        .designs
        .iter()
        .enumerate()
        .map(|(index, design)| DesignCard {
            id: design.id.to_string(),
            index,
            label: design.label(),
            name: design.display_name(),
            image: design.image_ref.clone(),
            price: design.unit_price.to_string(),
        })
        .collect();

    Ok(DesignsTemplate {
        designs,
        badge: cart_badge(&session).await?,
    })
}
