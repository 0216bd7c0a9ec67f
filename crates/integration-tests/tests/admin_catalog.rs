//! Integration tests for the catalog page and product mutations.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use storefront_admin::backend::{BackendCall, InMemoryBackend, Operation};
use storefront_admin::catalog::FilterMode;
use storefront_admin_core::ProductQuery;
use storefront_admin_integration_tests::TestApp;

const ALL_NAMES: [&str; 5] = [
    "Accent Chair",
    "Floor Lamp",
    "Three-Seat Sofa",
    "Side Table",
    "Bed Frame",
];

fn shown(body: &str) -> Vec<&'static str> {
    ALL_NAMES
        .iter()
        .copied()
        .filter(|name| body.contains(&format!("<h2>{name}</h2>")))
        .collect()
}

// =============================================================================
// Listing and filters
// =============================================================================

#[tokio::test]
async fn test_products_page_lists_everything_on_mount() {
    let app = TestApp::seeded();
    let page = app.browser().get("/products").await;

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(shown(&page.body), ALL_NAMES.to_vec());
    assert!(page.contains("Fetched products successfully"));
    assert_eq!(
        app.backend.calls(),
        vec![BackendCall::ListProducts(ProductQuery::default())]
    );
}

#[tokio::test]
async fn test_anonymous_catalog_has_no_mutation_controls() {
    let app = TestApp::seeded();
    let page = app.browser().get("/products").await;

    assert!(!page.contains("Save changes"));
    assert!(!page.contains("/delete"));
}

#[tokio::test]
async fn test_price_filter() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.get("/products").await;

    let page = browser
        .post_form("/products/filters/price", &[("max_price", "50")])
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(shown(&page.body), vec!["Floor Lamp", "Side Table"]);
    assert!(page.contains("Max Price: $50"));
}

#[tokio::test]
async fn test_featured_toggle_on_and_off() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.get("/products").await;

    let on = browser.post_form("/products/filters/featured", &[]).await;
    assert_eq!(shown(&on.body), vec!["Accent Chair", "Three-Seat Sofa"]);
    assert!(on.contains("Fetched only featured products"));

    let off = browser.post_form("/products/filters/featured", &[]).await;
    assert_eq!(shown(&off.body), ALL_NAMES.to_vec());
}

#[tokio::test]
async fn test_rating_filter() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.get("/products").await;

    let page = browser
        .post_form("/products/filters/rating", &[("min_rating", "4.5")])
        .await;

    assert_eq!(shown(&page.body), vec!["Accent Chair", "Three-Seat Sofa"]);
}

#[tokio::test]
async fn test_filters_are_independent_by_default() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.get("/products").await;

    browser
        .post_form("/products/filters/price", &[("max_price", "50")])
        .await;
    let page = browser.post_form("/products/filters/featured", &[]).await;

    // The featured query ignores the price slider
    assert_eq!(shown(&page.body), vec!["Accent Chair", "Three-Seat Sofa"]);
}

#[tokio::test]
async fn test_compound_mode_combines_filters() {
    let app = TestApp::with_backend(InMemoryBackend::seeded(), FilterMode::Compound);
    let mut browser = app.browser();
    browser.get("/products").await;

    browser
        .post_form("/products/filters/price", &[("max_price", "50")])
        .await;
    let page = browser.post_form("/products/filters/featured", &[]).await;

    assert!(shown(&page.body).is_empty());
    assert!(page.contains("No products found."));
}

#[tokio::test]
async fn test_unchanged_filter_does_not_refetch() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.get("/products").await;

    browser
        .post_form("/products/filters/price", &[("max_price", "50")])
        .await;
    browser
        .post_form("/products/filters/price", &[("max_price", "50")])
        .await;

    assert_eq!(app.backend.call_count(Operation::ListProducts), 2);
}

#[tokio::test]
async fn test_bad_filter_value_is_bad_request() {
    let app = TestApp::seeded();
    let page = app
        .browser()
        .post_form("/products/filters/price", &[("max_price", "cheap")])
        .await;

    assert_eq!(page.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_failure_toasts_reason() {
    let app = TestApp::seeded();
    app.backend
        .reject_next(Operation::ListProducts, "Catalog unavailable");

    let page = app.browser().get("/products").await;

    assert!(page.contains("Catalog unavailable"));
    assert!(page.contains("toast-destructive"));
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn test_delete_product() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.login_as_demo().await;
    browser.get("/products").await;

    let lamp = app
        .backend
        .products()
        .into_iter()
        .find(|p| p.name == "Floor Lamp")
        .unwrap();

    let page = browser
        .post_form(&format!("/products/{}/delete", lamp.id), &[])
        .await;

    assert!(page.contains("Product deleted successfully"));
    assert!(!shown(&page.body).contains(&"Floor Lamp"));
    assert_eq!(app.backend.products().len(), 4);
}

#[tokio::test]
async fn test_delete_unknown_product_toasts_not_found() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.login_as_demo().await;

    let page = browser.post_form("/products/missing/delete", &[]).await;

    assert!(page.contains("Product not found"));
    assert_eq!(app.backend.products().len(), 5);
}

#[tokio::test]
async fn test_update_product() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.login_as_demo().await;

    let table = app
        .backend
        .products()
        .into_iter()
        .find(|p| p.name == "Side Table")
        .unwrap();

    let page = browser
        .post_form(
            &format!("/products/{}/update", table.id),
            &[
                ("product_id", "TB-400"),
                ("name", "Oak Side Table"),
                ("price", "30"),
                ("rating", "3"),
                ("company", "ikea"),
            ],
        )
        .await;

    assert!(page.contains("Product updated successfully"));
    assert!(page.contains("<h2>Oak Side Table</h2>"));
    let updated = app
        .backend
        .products()
        .into_iter()
        .find(|p| p.id == table.id)
        .unwrap();
    assert_eq!(updated.price.display(), "$30.00");
    assert!(!updated.featured);
}

#[tokio::test]
async fn test_update_with_invalid_fields_is_not_sent() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.login_as_demo().await;

    let page = browser
        .post_form(
            "/products/anything/update",
            &[
                ("product_id", "TB-400"),
                ("name", "Table"),
                ("price", "-3"),
                ("rating", "3"),
                ("company", "ikea"),
            ],
        )
        .await;

    assert!(page.contains("Price must be a positive number"));
    assert_eq!(app.backend.call_count(Operation::UpdateProduct), 0);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_product_resets_form() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.login_as_demo().await;

    let page = browser
        .post_form(
            "/create",
            &[
                ("product_id", "DK-600"),
                ("name", "Standing Desk"),
                ("price", "120"),
                ("featured", "on"),
                ("rating", "4.2"),
                ("company", "ikea"),
            ],
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.contains("Product Created"));
    assert!(!page.contains("value=\"Standing Desk\""));

    let desk = app
        .backend
        .products()
        .into_iter()
        .find(|p| p.product_id.as_str() == "DK-600")
        .unwrap();
    assert!(desk.featured);
    assert_eq!(desk.rating.to_string(), "4.2");
}

#[tokio::test]
async fn test_create_duplicate_code_keeps_input() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    let page = browser
        .post_form(
            "/create",
            &[
                ("product_id", "CH-100"),
                ("name", "Second Chair"),
                ("price", "10"),
                ("rating", "1"),
                ("company", "ikea"),
            ],
        )
        .await;

    assert!(page.contains("Product with ID CH-100 already exists"));
    assert!(page.contains("value=\"Second Chair\""));
    assert_eq!(app.backend.products().len(), 5);
}

#[tokio::test]
async fn test_create_validation_messages() {
    let app = TestApp::seeded();
    let page = app.browser().post_form("/create", &[]).await;

    assert!(page.contains("Product ID is required"));
    assert!(page.contains("Product name is required"));
    assert!(page.contains("Company name is required"));
    assert_eq!(app.backend.call_count(Operation::CreateProduct), 0);
}
