//! Integration tests for page rendering and shared middleware.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use detach_integration_tests::TestApp;

#[tokio::test]
async fn test_customizer_defaults_to_first_pairing() {
    let mut app = TestApp::new();
    let res = app.get("/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Maroon + Design #1"));
    assert!(res.body.contains("₹698"));
}

#[tokio::test]
async fn test_customizer_reads_query() {
    let mut app = TestApp::new();
    let res = app.get("/?garment=2&design=7&size=XXL").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Black + Design #8"));
    assert!(res.body.contains("₹598"));
    assert!(res.body.contains(r#"href="/?garment=3&#38;design=7&#38;size=XXL""#));
}

#[tokio::test]
async fn test_customizer_wraps_out_of_range_indices() {
    let mut app = TestApp::new();
    let res = app.get("/?garment=6&design=25&size=S").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Army Green + Design #2"));
}

#[tokio::test]
async fn test_preview_and_shuffle() {
    let mut app = TestApp::new();
    let res = app.get("/preview?garment=4&design=0").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Random T-Shirt &amp; Design Combo"));

    let res = app
        .post_form("/preview/shuffle", "garment=4&design=0&size=XXL")
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    let location = res.header("location").unwrap();
    assert!(location.starts_with("/preview?garment="));
    assert!(location.ends_with("&size=XXL"));
}

#[tokio::test]
async fn test_designs_lists_catalog() {
    let mut app = TestApp::new();
    let res = app.get("/designs").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Design #1"));
    assert!(res.body.contains("Design #24"));
    assert!(res.body.contains("/static/designs/image_24.webp"));
}

#[tokio::test]
async fn test_about_rotates_quotes() {
    let mut app = TestApp::new();

    let first = app.get("/about").await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body.contains("Our Story"));
    assert!(first.body.contains("Michael Scott"));

    let second = app.get("/about").await;
    assert!(second.body.contains("Wubba Lubba Dub Dub!"));
    assert!(!second.body.contains("Michael Scott"));
}

#[tokio::test]
async fn test_submission_pages_render() {
    let mut app = TestApp::new();

    let res = app.get("/upload").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Upload Your Design"));
    assert!(res.body.contains(r#"name="designName""#));

    let res = app.get("/custom-orders").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Custom Orders"));
    assert!(res.body.contains("Formal Event"));
    assert!(res.body.contains(r#"value="10000+""#));
}

#[tokio::test]
async fn test_cart_badge_on_pages() {
    let mut app = TestApp::new();
    app.post_form("/cart/add/design", "design_id=3").await;

    let res = app.get("/designs").await;
    assert!(res.body.contains(r#"hx-trigger="cart-updated from:body""#));
    assert!(res.body.contains(r#"<span class="cart-count">1</span>"#));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut app = TestApp::new();
    let res = app.get("/collections/all").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let mut app = TestApp::new();
    let res = app.get("/").await;
    assert_eq!(res.header("x-frame-options"), Some("DENY"));
    assert_eq!(res.header("x-content-type-options"), Some("nosniff"));
    assert!(res.header("content-security-policy").is_some());
    assert!(res.header("x-request-id").is_some_and(|id| !id.is_empty()));
}
