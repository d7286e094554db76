//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Customizer (query: garment, design, size)
//! GET  /health                 - Health check
//! GET  /preview                - Simplified preview
//! POST /preview/shuffle        - Random pairing, redirects to /preview
//! GET  /designs                - Design grid
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add/garment       - Add garment (returns badge, triggers cart-updated)
//! POST /cart/add/design        - Add design (returns badge, triggers cart-updated)
//! POST /cart/add/combo         - Add garment and design (returns badge)
//! POST /cart/remove            - Remove by position (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Trial Room
//! GET  /trial-room             - Garments, designs and the previewed pair
//! POST /trial-room/select      - Select a garment or design
//! POST /trial-room/remove      - Remove an entry by id
//!
//! # Pages
//! GET  /about                  - Our story
//! GET  /upload                 - Artist upload form
//! GET  /custom-orders          - Custom order form
//!
//! # Submissions (JSON, rate limited)
//! POST /api/upload             - Artist design upload (multipart)
//! POST /api/custom-order       - Custom order request
//! ```

pub mod api;
pub mod cart;
pub mod designs;
pub mod home;
pub mod pages;
pub mod trial_room;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::submission_rate_limiter;
use crate::models::{CartBadge, ShopperCart};
use crate::state::AppState;

/// The header cart badge for the shopper's session.
///
/// # Errors
///
/// Returns an error if the session can't be read.
pub async fn cart_badge(session: &Session) -> Result<CartBadge> {
    let cart = ShopperCart::load(session).await?;
    Ok(CartBadge::from(&cart))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/garment", post(cart::add_garment))
        .route("/add/design", post(cart::add_design))
        .route("/add/combo", post(cart::add_combo))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the trial room routes router.
pub fn trial_room_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(trial_room::show))
        .route("/select", post(trial_room::select))
        .route("/remove", post(trial_room::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Customizer
        .route("/", get(home::customizer))
        .route("/preview", get(home::preview))
        .route("/preview/shuffle", post(home::shuffle))
        .route("/designs", get(designs::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Trial room
        .nest("/trial-room", trial_room_routes())
        // Pages
        .route("/about", get(pages::about))
        .route("/upload", get(pages::upload))
        .route("/custom-orders", get(pages::custom_orders))
        // Submissions
        .nest("/api", api::api_routes().layer(submission_rate_limiter()))
}
