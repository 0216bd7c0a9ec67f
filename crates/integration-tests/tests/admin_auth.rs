//! Integration tests for login, registration and logout.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use storefront_admin::backend::{BackendCall, Operation};
use storefront_admin_integration_tests::TestApp;

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::seeded();
    let page = app.browser().get("/health").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_anonymous_navbar_offers_login_and_signup() {
    let app = TestApp::seeded();
    let page = app.browser().get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.contains("href=\"/login\""));
    assert!(page.contains("href=\"/register\""));
    assert!(!page.contains("href=\"/create\""));
}

#[tokio::test]
async fn test_security_headers_applied() {
    let app = TestApp::seeded();
    let page = app.browser().get("/about").await;

    assert_eq!(page.headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(page.headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(page.headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_session_cookie_is_http_only() {
    let app = TestApp::seeded();
    let page = app.browser().get("/").await;

    let cookie = page.headers.get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("storefront_admin_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_success_redirects_home_with_toast() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    let page = browser.login_as_demo().await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/"));

    let home = browser.get("/").await;
    assert!(home.contains("Logged in successfully"));
    assert!(home.contains("admin@example.com"));
    assert!(home.contains("href=\"/create\""));
    assert!(!home.contains("href=\"/login\""));

    // Toasts are shown once
    let again = browser.get("/").await;
    assert!(!again.contains("Logged in successfully"));
}

#[tokio::test]
async fn test_login_invalid_input_never_reaches_backend() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    let page = browser
        .post_form("/login", &[("email", "nope"), ("password", "short")])
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.contains("Please enter a valid email address."));
    assert!(page.contains("Password must be at least 8 characters long."));
    assert_eq!(app.backend.call_count(Operation::Login), 0);
}

#[tokio::test]
async fn test_login_rejected_shows_backend_reason() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    let page = browser
        .post_form(
            "/login",
            &[("email", "admin@example.com"), ("password", "wrong-password")],
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.contains("Invalid email or password"));
    assert!(page.contains("toast-destructive"));
    // Email is kept, password is not echoed
    assert!(page.contains("value=\"admin@example.com\""));
    assert!(!page.contains("wrong-password"));
    assert_eq!(
        app.backend.calls(),
        vec![BackendCall::Login {
            email: "admin@example.com".to_string()
        }]
    );
}

#[tokio::test]
async fn test_login_is_per_session() {
    let app = TestApp::seeded();
    let mut alice = app.browser();
    let mut bob = app.browser();

    alice.login_as_demo().await;

    assert!(alice.get("/").await.contains("admin@example.com"));
    assert!(!bob.get("/").await.contains("admin@example.com"));
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_then_login_with_new_account() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    let page = browser
        .post_form(
            "/register",
            &[
                ("name", "Jo Doe"),
                ("email", "jo@example.com"),
                ("password", "secret123"),
            ],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/"));
    assert!(
        browser
            .get("/")
            .await
            .contains("Your account has been created successfully")
    );

    let mut other = app.browser();
    let login = other
        .post_form(
            "/login",
            &[("email", "jo@example.com"), ("password", "secret123")],
        )
        .await;
    assert_eq!(login.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_register_duplicate_keeps_input() {
    let app = TestApp::seeded();
    let mut browser = app.browser();

    let page = browser
        .post_form(
            "/register",
            &[
                ("name", "Another Admin"),
                ("email", "admin@example.com"),
                ("password", "secret1"),
            ],
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.contains("User already exists"));
    assert!(page.contains("value=\"Another Admin\""));
}

#[tokio::test]
async fn test_register_validation_messages() {
    let app = TestApp::seeded();
    let page = app
        .browser()
        .post_form(
            "/register",
            &[("name", " "), ("email", "x"), ("password", "123")],
        )
        .await;

    assert!(page.contains("Name is required"));
    assert!(page.contains("Invalid email address"));
    assert!(page.contains("Password must be at least 6 characters"));
    assert_eq!(app.backend.call_count(Operation::Register), 0);
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_returns_to_anonymous_navbar() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.login_as_demo().await;
    browser.get("/").await;

    let page = browser.post_form("/logout", &[]).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/"));

    let home = browser.get("/").await;
    assert!(home.contains("Logged out successfully"));
    assert!(home.contains("href=\"/login\""));
    assert!(!home.contains("admin@example.com"));
}

#[tokio::test]
async fn test_logout_failure_keeps_session() {
    let app = TestApp::seeded();
    let mut browser = app.browser();
    browser.login_as_demo().await;
    app.backend.reject_next(Operation::Logout, "Logout failed");

    browser.post_form("/logout", &[]).await;

    let home = browser.get("/").await;
    assert!(home.contains("Logout failed"));
    assert!(home.contains("admin@example.com"));
}
