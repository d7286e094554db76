//! Customizer and preview route handlers.
//!
//! The customizer state (garment, design and size) travels in the query
//! string, so every view is a plain link and works without JavaScript.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use detach_core::{Catalog, Combination, CustomizerState, selection};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::CartBadge;
use crate::routes::cart_badge;
use crate::state::AppState;

/// Designs shown in the showroom carousel.
const SHOWROOM_POOL: usize = selection::SHOWROOM_DESIGN_POOL;

/// Query string for a customizer state.
fn query_string(state: &CustomizerState) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("garment", &state.garment.to_string());
    query.append_pair("design", &state.design.to_string());
    if let Some(size) = &state.size {
        query.append_pair("size", size);
    }
    query.finish()
}

fn href(path: &str, state: &CustomizerState) -> String {
    format!("{path}?{}", query_string(state))
}

/// The resolved pairing, flattened for templates.
#[derive(Clone)]
pub struct CombinationView {
    pub garment_id: String,
    pub garment_name: String,
    pub garment_details: String,
    pub garment_image: String,
    pub design_id: String,
    pub design_label: String,
    pub design_name: Option<&'static str>,
    pub design_image: String,
    pub size: String,
    pub garment_price: String,
    pub design_price: String,
    pub price: String,
}

impl From<&Combination<'_>> for CombinationView {
    fn from(combo: &Combination<'_>) -> Self {
        Self {
            garment_id: combo.garment.id.to_string(),
            garment_name: combo.garment.display_name.clone(),
            garment_details: combo.garment.details.clone(),
            garment_image: combo.garment.image_ref.clone(),
            design_id: combo.design.id.to_string(),
            design_label: combo.design.label(),
            design_name: combo.design.display_name(),
            design_image: combo.design.image_ref.clone(),
            size: combo.size.clone(),
            garment_price: combo.garment.unit_price.to_string(),
            design_price: combo.design.unit_price.to_string(),
            price: combo.price.to_string(),
        }
    }
}

/// A size button in the customizer.
#[derive(Clone)]
pub struct SizeOption {
    pub size: String,
    pub href: String,
    pub selected: bool,
}

/// One thumbnail in a carousel strip.
#[derive(Clone)]
pub struct CarouselSlot {
    pub href: String,
    pub image: String,
    pub label: String,
    pub current: bool,
}

/// Customizer page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/customizer.html")]
pub struct CustomizerTemplate {
    pub combo: CombinationView,
    pub sizes: Vec<SizeOption>,
    pub prev_garment_href: String,
    pub next_garment_href: String,
    pub prev_design_href: String,
    pub next_design_href: String,
    pub garments: Vec<CarouselSlot>,
    pub showroom: Vec<CarouselSlot>,
    pub badge: CartBadge,
}

/// Preview ("surprise me") page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/preview.html")]
pub struct PreviewTemplate {
    pub combo: CombinationView,
    pub garment_index: usize,
    pub design_index: usize,
    pub customize_href: String,
    pub badge: CartBadge,
}

fn resolve<'a>(state: &CustomizerState, catalog: &'a Catalog) -> Result<Combination<'a>> {
    Ok(state.combination(catalog)?)
}

/// Normalise the query against the resolved pairing so links carry real
/// indices and a size the garment offers.
fn normalised(combo: &Combination<'_>) -> CustomizerState {
    CustomizerState {
        garment: combo.garment_index,
        design: combo.design_index,
        size: Some(combo.size.clone()),
    }
}

/// Previous, current and next garments.
fn garment_strip(current: &CustomizerState, catalog: &Catalog) -> Result<Vec<CarouselSlot>> {
    let window = selection::neighbours(current.garment, catalog.garments.len())?;

    Ok(window
        .iter()
        .filter_map(|&index| {
            let garment = catalog.garment_at(index)?;
            let target = CustomizerState {
                garment: index,
                ..current.clone()
            };
            Some(CarouselSlot {
                href: href("/", &target),
                image: garment.image_ref.clone(),
                label: garment.display_name.clone(),
                current: index == current.garment,
            })
        })
        .collect())
}

/// Previous, current and next designs from the showroom pool.
fn showroom_strip(current: &CustomizerState, catalog: &Catalog) -> Result<Vec<CarouselSlot>> {
    let pool = SHOWROOM_POOL.min(catalog.designs.len());
    let window = selection::neighbours(current.design, pool)?;

    Ok(window
        .iter()
        .filter_map(|&index| {
            let design = catalog.design_at(index)?;
            let target = CustomizerState {
                design: index,
                ..current.clone()
            };
            Some(CarouselSlot {
                href: href("/", &target),
                image: design.image_ref.clone(),
                label: design.label(),
                current: index == current.design,
            })
        })
        .collect())
}

/// Display the customizer.
///
/// GET /?garment=&design=&size=
///
/// # Errors
///
/// Returns an error if the catalog has an empty category or the session
/// can't be read.
#[instrument(skip(state, session))]
pub async fn customizer(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CustomizerState>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let combo = resolve(&query, catalog)?;
    let current = normalised(&combo);

    let sizes = combo
        .garment
        .allowed_sizes
        .iter()
        .map(|size| SizeOption {
            size: size.clone(),
            href: href(
                "/",
                &CustomizerState {
                    size: Some(size.clone()),
                    ..current.clone()
                },
            ),
            selected: *size == combo.size,
        })
        .collect();

    Ok(CustomizerTemplate {
        combo: CombinationView::from(&combo),
        sizes,
        prev_garment_href: href("/", &current.prev_garment(catalog)?),
        next_garment_href: href("/", &current.next_garment(catalog)?),
        prev_design_href: href("/", &current.prev_design(catalog)?),
        next_design_href: href("/", &current.next_design(catalog)?),
        garments: garment_strip(&current, catalog)?,
        showroom: showroom_strip(&current, catalog)?,
        badge: cart_badge(&session).await?,
    })
}

/// Display the simplified preview.
///
/// GET /preview?garment=&design=&size=
///
/// # Errors
///
/// Returns an error if the catalog has an empty category or the session
/// can't be read.
#[instrument(skip(state, session))]
pub async fn preview(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CustomizerState>,
) -> Result<impl IntoResponse> {
    let combo = resolve(&query, state.catalog())?;
    let current = normalised(&combo);

    Ok(PreviewTemplate {
        combo: CombinationView::from(&combo),
        garment_index: current.garment,
        design_index: current.design,
        customize_href: href("/", &current),
        badge: cart_badge(&session).await?,
    })
}

/// Pick a random pairing and show it, keeping the chosen size.
///
/// POST /preview/shuffle
///
/// # Errors
///
/// Returns an error if the catalog has an empty category.
#[instrument(skip(state))]
pub async fn shuffle(
    State(state): State<AppState>,
    Form(form): Form<CustomizerState>,
) -> Result<Redirect> {
    let shuffled = form.shuffled(state.catalog(), &mut rand::rng())?;

    tracing::debug!(
        garment = shuffled.garment,
        design = shuffled.design,
        "Shuffled preview"
    );

    Ok(Redirect::to(&href("/preview", &shuffled)))
}
