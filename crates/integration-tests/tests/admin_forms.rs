//! Integration tests for on-change field validation.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use storefront_admin_integration_tests::TestApp;

#[tokio::test]
async fn test_only_touched_fields_report_errors() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    let page = browser
        .post_json(
            "/forms/login/field",
            &json!({"field": "email", "value": "nope"}),
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    let body = page.json();
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"]["email"], "Please enter a valid email address.");
    assert!(body["errors"].get("password").is_none());
}

#[tokio::test]
async fn test_fixing_a_field_clears_its_error() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    browser
        .post_json("/forms/register/field", &json!({"field": "name", "value": ""}))
        .await;
    let page = browser
        .post_json(
            "/forms/register/field",
            &json!({"field": "name", "value": "Jo"}),
        )
        .await;

    assert_eq!(page.json()["errors"], json!({}));
}

#[tokio::test]
async fn test_field_state_is_rendered_on_the_page() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    browser
        .post_json(
            "/forms/create/field",
            &json!({"field": "price", "value": "abc"}),
        )
        .await;
    let page = browser.get("/create").await;

    assert!(page.contains("Price must be a number"));
    assert!(page.contains("value=\"abc\""));
}

#[tokio::test]
async fn test_create_rating_is_clamped_on_change() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    let page = browser
        .post_json(
            "/forms/create/field",
            &json!({"field": "rating", "value": "9"}),
        )
        .await;
    assert!(page.json()["errors"].get("rating").is_none());

    let form = browser.get("/create").await;
    assert!(form.contains("Rating: 5"));
}

#[tokio::test]
async fn test_unknown_form_is_not_found() {
    let app = TestApp::seeded();
    let page = app
        .browser()
        .post_json("/forms/checkout/field", &json!({"field": "x", "value": ""}))
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_field_is_bad_request() {
    let app = TestApp::seeded();
    let page = app
        .browser()
        .post_json("/forms/login/field", &json!({"field": "age", "value": "3"}))
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
}
