//! Content and form page route handlers.
//!
//! The about page is rendered from markdown; the upload and custom order pages
//! are static forms that post to the JSON API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::submission::{Budget, Occasion, OrderType, Timeline};
use crate::models::CartBadge;
use crate::routes::cart_badge;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub title: String,
    pub description: String,
    pub quote: Option<String>,
    pub content_html: String,
    pub badge: CartBadge,
}

/// Display the about page, showing the next quote in rotation.
///
/// # Errors
///
/// Returns 404 if the about page isn't loaded.
#[instrument(skip(state, session))]
pub async fn about(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let page = state
        .content()
        .get_page("about")
        .ok_or_else(|| AppError::NotFound("about".to_string()))?;
    let quote = page.quote(state.next_quote_turn()).map(str::to_string);

    Ok(AboutTemplate {
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        quote,
        content_html: page.content_html.clone(),
        badge: cart_badge(&session).await?,
    })
}

/// Artist upload form template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/upload.html")]
pub struct UploadTemplate {
    pub badge: CartBadge,
}

/// Display the artist upload form.
///
/// # Errors
///
/// Returns an error if the session can't be read.
#[instrument(skip(session))]
pub async fn upload(session: Session) -> Result<impl IntoResponse> {
    Ok(UploadTemplate {
        badge: cart_badge(&session).await?,
    })
}

/// An `<option>` in a select box.
#[derive(Clone)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

macro_rules! options {
    ($ty:ty) => {
        <$ty>::ALL
            .iter()
            .map(|choice| ChoiceOption {
                value: choice.value(),
                label: choice.label(),
            })
            .collect()
    };
}

/// Custom order form template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/custom_orders.html")]
pub struct CustomOrdersTemplate {
    pub order_types: Vec<ChoiceOption>,
    pub occasions: Vec<ChoiceOption>,
    pub budgets: Vec<ChoiceOption>,
    pub timelines: Vec<ChoiceOption>,
    pub badge: CartBadge,
}

/// Display the custom order form.
///
/// # Errors
///
/// Returns an error if the session can't be read.
#[instrument(skip(session))]
pub async fn custom_orders(session: Session) -> Result<impl IntoResponse> {
    Ok(CustomOrdersTemplate {
        order_types: options!(OrderType),
        occasions: options!(Occasion),
        budgets: options!(Budget),
        timelines: options!(Timeline),
        badge: cart_badge(&session).await?,
    })
}
