//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Maps a catalog image reference to its URL under `/static`.
///
/// Usage in templates: `{{ garment.image_ref|asset }}`
#[askama::filter_fn]
pub fn asset(image_ref: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(asset_url(&image_ref.to_string()))
}

/// `/mockups/tshirt_1.jpg` becomes `/static/mockups/tshirt_1.jpg`.
#[must_use]
pub fn asset_url(image_ref: &str) -> String {
    format!("/static/{}", image_ref.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_url() {
        assert_eq!(asset_url("/mockups/tshirt_1.jpg"), "/static/mockups/tshirt_1.jpg");
        assert_eq!(asset_url("designs/image_2.webp"), "/static/designs/image_2.webp");
    }
}
