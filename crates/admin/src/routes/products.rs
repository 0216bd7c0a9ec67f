//! Catalog and create-product route handlers.
//!
//! Filter, update and delete posts render the catalog page directly so the
//! filter controls keep their positions. Only `GET /products` mounts the
//! view, which resets the filters.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::Path,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_admin_core::validation::ProductFields;
use storefront_admin_core::{FilterState, Product, ProductRecordId};
use tracing::instrument;

use super::Layout;
use crate::catalog::FilterMode;
use crate::context::ClientContext;
use crate::error::AppError;
use crate::filters;
use crate::forms::{AfterSuccess, FormView, SubmitOutcome};
use crate::middleware::Client;
use crate::models::Route;
use crate::state::AppState;

/// A product as shown in the catalog grid.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub price: String,
    pub rating: String,
    pub featured: bool,
    pub company: String,
    /// Pre-filled fields for the update dialog.
    pub edit: ProductFields,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            product_id: product.product_id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            rating: product.rating.to_string(),
            featured: product.featured,
            company: product.company.clone(),
            edit: ProductFields::from_product(product),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct CatalogTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
    pub filters: FilterState,
    pub mode: FilterMode,
    pub is_loading: bool,
    pub is_logged_in: bool,
    pub price_max: u32,
    pub rating_step: f64,
}

impl CatalogTemplate {
    fn for_context(ctx: &ClientContext) -> Self {
        let catalog = ctx.store().catalog();
        Self {
            products: catalog.products.iter().map(ProductCard::from).collect(),
            filters: ctx.catalog.filters(),
            mode: ctx.catalog.mode(),
            is_loading: catalog.is_loading,
            is_logged_in: ctx.is_logged_in(),
            price_max: FilterState::PRICE_SLIDER_MAX,
            rating_step: FilterState::RATING_STEP,
            layout: Layout::new(ctx, Some(Route::Products), "Products"),
        }
    }
}

/// Create product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/create.html")]
pub struct CreateTemplate {
    pub layout: Layout,
    pub form: FormView<ProductFields>,
    pub rating: f64,
}

impl CreateTemplate {
    fn for_context(ctx: &ClientContext) -> Self {
        let form = ctx.create_product.snapshot();
        Self {
            rating: form.fields.rating_value(),
            form,
            layout: Layout::new(ctx, Some(Route::Create), "Create product"),
        }
    }
}

/// Price slider form.
#[derive(Debug, Deserialize)]
pub struct PriceFilterForm {
    pub max_price: String,
}

/// Rating slider form.
#[derive(Debug, Deserialize)]
pub struct RatingFilterForm {
    pub min_rating: String,
}

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index))
        .route("/products/filters/price", post(filter_price))
        .route("/products/filters/rating", post(filter_rating))
        .route("/products/filters/featured", post(filter_featured))
        .route("/products/{id}/update", post(update))
        .route("/products/{id}/delete", post(delete))
        .route("/create", get(create_page).post(create))
}

/// GET /products
#[instrument(skip_all)]
async fn index(Client(ctx): Client) -> CatalogTemplate {
    ctx.catalog.mount().await;
    CatalogTemplate::for_context(&ctx)
}

/// POST /products/filters/price
#[instrument(skip_all, fields(max_price = %form.max_price))]
async fn filter_price(
    Client(ctx): Client,
    Form(form): Form<PriceFilterForm>,
) -> Result<CatalogTemplate, AppError> {
    let value: Decimal = form
        .max_price
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid max price '{}'", form.max_price)))?;

    ctx.catalog.set_max_price(value).await;
    Ok(CatalogTemplate::for_context(&ctx))
}

/// POST /products/filters/rating
#[instrument(skip_all, fields(min_rating = %form.min_rating))]
async fn filter_rating(
    Client(ctx): Client,
    Form(form): Form<RatingFilterForm>,
) -> Result<CatalogTemplate, AppError> {
    let value: f64 = form
        .min_rating
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid min rating '{}'", form.min_rating)))?;

    ctx.catalog.set_min_rating(value).await;
    Ok(CatalogTemplate::for_context(&ctx))
}

/// POST /products/filters/featured
#[instrument(skip_all)]
async fn filter_featured(Client(ctx): Client) -> CatalogTemplate {
    ctx.catalog.toggle_featured().await;
    CatalogTemplate::for_context(&ctx)
}

/// POST /products/{id}/update
#[instrument(skip_all, fields(id = %id))]
async fn update(
    Client(ctx): Client,
    Path(id): Path<String>,
    Form(fields): Form<ProductFields>,
) -> CatalogTemplate {
    ctx.catalog.update(ProductRecordId::new(id), fields).await;
    CatalogTemplate::for_context(&ctx)
}

/// POST /products/{id}/delete
#[instrument(skip_all, fields(id = %id))]
async fn delete(Client(ctx): Client, Path(id): Path<String>) -> CatalogTemplate {
    ctx.catalog.delete(ProductRecordId::new(id)).await;
    CatalogTemplate::for_context(&ctx)
}

/// GET /create
async fn create_page(Client(ctx): Client) -> CreateTemplate {
    CreateTemplate::for_context(&ctx)
}

/// POST /create
#[instrument(skip_all)]
async fn create(Client(ctx): Client, Form(fields): Form<ProductFields>) -> Response {
    match ctx.create_product.submit(fields).await {
        SubmitOutcome::Succeeded(AfterSuccess::Navigate(route)) => {
            Redirect::to(route.path()).into_response()
        }
        _ => CreateTemplate::for_context(&ctx).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use storefront_admin_core::{Price, ProductCode, Rating};

    use super::*;

    #[test]
    fn test_product_card_formats_price() {
        let product = Product {
            id: ProductRecordId::new("abc"),
            product_id: ProductCode::new("SKU-1"),
            name: "Chair".to_string(),
            price: Price::from_units(20),
            featured: true,
            rating: Rating::clamped(4.5),
            company: "ikea".to_string(),
        };
        let card = ProductCard::from(&product);
        assert_eq!(card.price, "$20.00");
        assert_eq!(card.rating, "4.5");
        assert_eq!(card.edit.price, "20");
    }
}
