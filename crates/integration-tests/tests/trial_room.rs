//! Integration tests for the trial room.

use axum::http::StatusCode;
use detach_integration_tests::TestApp;

/// Black tee (entry 0), designs #3 (entry 1), #8 (entry 2) and #5 (entry 3).
async fn stocked_app() -> TestApp {
    let mut app = TestApp::new();
    app.post_form("/cart/add/garment", "garment_id=3&size=XL").await;
    app.post_form("/cart/add/design", "design_id=3").await;
    app.post_form("/cart/add/design", "design_id=8").await;
    app.post_form("/cart/add/design", "design_id=5").await;
    app
}

#[tokio::test]
async fn test_empty_trial_room_blocks_checkout() {
    let mut app = TestApp::new();
    let res = app.get("/trial-room").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("No t-shirts added"));
    assert!(res.body.contains("No designs added"));
    assert!(res.body.contains("Select items to preview"));
    assert!(res.body.contains(r#"aria-disabled="true""#));
}

#[tokio::test]
async fn test_garment_only_blocks_checkout() {
    let mut app = TestApp::new();
    app.post_form("/cart/add/garment", "garment_id=1&size=XL").await;
    let res = app.get("/trial-room").await;
    assert!(res.body.contains(r#"aria-disabled="true""#));
    assert!(res.body.contains("No designs added"));
}

#[tokio::test]
async fn test_first_items_are_previewed() {
    let mut app = stocked_app().await;
    let res = app.get("/trial-room").await;
    assert!(res.body.contains("Black + Design #3"));
    assert!(res.body.contains("₹598"));
    assert!(res.body.contains(r#"href="/cart">Proceed to Checkout"#));
}

#[tokio::test]
async fn test_select_changes_preview() {
    let mut app = stocked_app().await;

    let res = app.post_form("/trial-room/select", "kind=design&index=2").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.header("location"), Some("/trial-room"));

    let res = app.get("/trial-room").await;
    assert!(res.body.contains("Black + Design #5"));
}

#[tokio::test]
async fn test_out_of_range_select_is_ignored() {
    let mut app = stocked_app().await;
    app.post_form("/trial-room/select", "kind=design&index=1").await;

    let res = app.post_form("/trial-room/select", "kind=design&index=9").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let res = app.get("/trial-room").await;
    assert!(res.body.contains("Black + Design #8"));
}

#[tokio::test]
async fn test_removing_selected_last_design_moves_back() {
    let mut app = stocked_app().await;
    app.post_form("/trial-room/select", "kind=design&index=2").await;

    let res = app.post_form("/trial-room/remove", "entry_id=3").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let res = app.get("/trial-room").await;
    assert!(res.body.contains("Black + Design #8"));
    let res = app.get("/cart/count").await;
    assert!(res.body.contains(">3</span>"));
}

#[tokio::test]
async fn test_removing_earlier_design_keeps_selection() {
    let mut app = stocked_app().await;
    app.post_form("/trial-room/select", "kind=design&index=1").await;

    app.post_form("/trial-room/remove", "entry_id=1").await;

    let res = app.get("/trial-room").await;
    assert!(res.body.contains("Black + Design #8"));
}

#[tokio::test]
async fn test_removing_last_garment_blocks_checkout() {
    let mut app = stocked_app().await;
    app.post_form("/trial-room/remove", "entry_id=0").await;

    let res = app.get("/trial-room").await;
    assert!(res.body.contains("No t-shirts added"));
    assert!(res.body.contains(r#"aria-disabled="true""#));
    assert!(!res.body.contains("Black + Design"));
}

#[tokio::test]
async fn test_unknown_entry_removal_is_ignored() {
    let mut app = stocked_app().await;
    let res = app.post_form("/trial-room/remove", "entry_id=42").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let res = app.get("/cart/count").await;
    assert!(res.body.contains(">4</span>"));
}

#[tokio::test]
async fn test_cart_removal_reconciles_trial_room() {
    let mut app = stocked_app().await;
    app.post_form("/trial-room/select", "kind=design&index=2").await;

    // Cart position 3 is the selected design #5
    app.post_form("/cart/remove", "index=3").await;

    let res = app.get("/trial-room").await;
    assert!(res.body.contains("Black + Design #8"));
}
