//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home
//! GET  /about                     - About
//!
//! # Auth
//! GET  /login      POST /login    - Login form
//! GET  /register   POST /register - Registration form
//! POST /logout                    - Log out
//!
//! # Catalog
//! GET  /products                  - Mount catalog (reset filters, fetch all)
//! POST /products/filters/price    - Set max price
//! POST /products/filters/rating   - Set min rating
//! POST /products/filters/featured - Toggle featured-only
//! POST /products/{id}/update      - Update product
//! POST /products/{id}/delete      - Delete product
//! GET  /create     POST /create   - Create product form
//!
//! # Forms
//! POST /forms/{form}/field        - On-change validation (JSON)
//! ```
//!
//! Every page render drains the session's pending toasts into the layout.

use axum::Router;

use crate::context::ClientContext;
use crate::models::Route;
use crate::navbar::NavBar;
use crate::notify::Toast;
use crate::state::AppState;

pub mod auth;
pub mod forms;
pub mod pages;
pub mod products;

/// Build the router for every page and form endpoint.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(forms::router())
}

/// Data shared by every page: navigation and pending toasts.
pub struct Layout {
    pub title: &'static str,
    pub nav: NavBar,
    pub toasts: Vec<Toast>,
}

impl Layout {
    /// Build the layout for `current`, taking the session's pending toasts.
    #[must_use]
    pub fn new(ctx: &ClientContext, current: Option<Route>, title: &'static str) -> Self {
        Self {
            title,
            nav: ctx.navbar(current),
            toasts: ctx.take_toasts(),
        }
    }
}
