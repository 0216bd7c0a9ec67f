//! Static pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, routing::get};

use super::Layout;
use crate::filters;
use crate::middleware::Client;
use crate::models::Route;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub product_count: usize,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub layout: Layout,
}

/// Build the pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
}

/// GET /
async fn home(Client(ctx): Client) -> HomeTemplate {
    HomeTemplate {
        product_count: ctx.store().select(|s| s.catalog.products.len()),
        layout: Layout::new(&ctx, Some(Route::Home), "Home"),
    }
}

/// GET /about
async fn about(Client(ctx): Client) -> AboutTemplate {
    AboutTemplate {
        layout: Layout::new(&ctx, Some(Route::About), "About"),
    }
}
