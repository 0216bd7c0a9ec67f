//! Catalog view: product list, filter controls and per-item actions.
//!
//! Filter changes re-query the store. In [`FilterMode::Independent`] each
//! control issues a request filtered by its own dimension only; in
//! [`FilterMode::Compound`] every change sends all active filters together.
//! A change that leaves the value as it was issues nothing.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::Serialize;
use storefront_admin_core::validation::{ProductFields, ProductSchema};
use storefront_admin_core::{FilterState, ProductRecordId, Schema};
use thiserror::Error;
use tracing::instrument;

use crate::notify::{Notifier, Toast};
use crate::store::{Action, Dispatcher, Payload};

/// How filter changes become backend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Each control queries by its own dimension only.
    #[default]
    Independent,
    /// Every change queries by all active filters.
    Compound,
}

#[derive(Debug, Error)]
#[error("unknown filter mode '{0}' (expected 'independent' or 'compound')")]
pub struct UnknownFilterMode(String);

impl FromStr for FilterMode {
    type Err = UnknownFilterMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(Self::Independent),
            "compound" => Ok(Self::Compound),
            _ => Err(UnknownFilterMode(s.to_string())),
        }
    }
}

/// Catalog screen state for one client context.
pub struct CatalogView {
    dispatcher: Arc<dyn Dispatcher>,
    notifier: Arc<dyn Notifier>,
    filters: Mutex<FilterState>,
    mode: FilterMode,
}

impl CatalogView {
    #[must_use]
    pub fn new(
        dispatcher: Arc<dyn Dispatcher>,
        notifier: Arc<dyn Notifier>,
        mode: FilterMode,
    ) -> Self {
        Self {
            dispatcher,
            notifier,
            filters: Mutex::new(FilterState::default()),
            mode,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FilterState> {
        self.filters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current filter controls.
    #[must_use]
    pub fn filters(&self) -> FilterState {
        *self.lock()
    }

    #[must_use]
    pub const fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Open the catalog: reset the filters and fetch everything.
    #[instrument(skip(self))]
    pub async fn mount(&self) {
        *self.lock() = FilterState::default();
        self.run(Action::FetchProducts, "Fetched products successfully")
            .await;
    }

    /// Move the price slider. Values are rounded and clamped to `[0, 200]`.
    #[instrument(skip(self))]
    pub async fn set_max_price(&self, value: Decimal) {
        let price = FilterState::price_slider(value);
        let filters = {
            let mut filters = self.lock();
            if filters.max_price == price {
                return;
            }
            filters.max_price = price;
            *filters
        };

        match self.mode {
            FilterMode::Independent => {
                self.run(
                    Action::PriceLessThanValue(price),
                    "Fetched products under max price",
                )
                .await;
            }
            FilterMode::Compound => self.run_compound(filters).await,
        }
    }

    /// Move the rating slider. Values are clamped to `[0, 5]` in steps of 0.5.
    #[instrument(skip(self))]
    pub async fn set_min_rating(&self, value: f64) {
        let rating = FilterState::rating_slider(value);
        let filters = {
            let mut filters = self.lock();
            if filters.min_rating == rating {
                return;
            }
            filters.min_rating = rating;
            *filters
        };

        match self.mode {
            FilterMode::Independent => {
                self.run(
                    Action::RatingHigherThanValue(rating),
                    "Fetched products with minimum rating",
                )
                .await;
            }
            FilterMode::Compound => self.run_compound(filters).await,
        }
    }

    /// Flip the featured-only switch.
    #[instrument(skip(self))]
    pub async fn toggle_featured(&self) {
        let filters = {
            let mut filters = self.lock();
            filters.is_featured = !filters.is_featured;
            *filters
        };

        match (self.mode, filters.is_featured) {
            (FilterMode::Independent, true) => {
                self.run(Action::OnlyFeatured, "Fetched only featured products")
                    .await;
            }
            (FilterMode::Independent, false) => {
                self.run(Action::FetchProducts, "Fetched all products successfully")
                    .await;
            }
            (FilterMode::Compound, _) => self.run_compound(filters).await,
        }
    }

    /// Delete a product, then refetch the unfiltered list.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: ProductRecordId) {
        if self
            .run(Action::DeleteProduct(id), "Product deleted successfully")
            .await
        {
            self.run(Action::FetchProducts, "Fetched products successfully")
                .await;
        }
    }

    /// Validate and save edits to a product, then refetch the unfiltered list.
    #[instrument(skip(self, fields), fields(id = %id))]
    pub async fn update(&self, id: ProductRecordId, mut fields: ProductFields) {
        fields.clamp_rating();
        let product = match ProductSchema.validate(&fields) {
            Ok(product) => product,
            Err(errors) => {
                let reason = errors.first_message().unwrap_or("Invalid product");
                self.notifier.notify(Toast::error(reason));
                return;
            }
        };

        if self
            .run(
                Action::UpdateProduct { id, product },
                "Product updated successfully",
            )
            .await
        {
            self.run(Action::FetchProducts, "Fetched products successfully")
                .await;
        }
    }

    async fn run_compound(&self, filters: FilterState) {
        self.run(
            Action::FilterProducts(filters.compound_query()),
            "Fetched filtered products",
        )
        .await;
    }

    /// Dispatch and report the outcome. Returns whether the action succeeded.
    async fn run(&self, action: Action, success: &str) -> bool {
        match self.dispatcher.dispatch(action).await {
            Ok(Payload::Superseded) => true,
            Ok(_) => {
                self.notifier.notify(Toast::success(success));
                true
            }
            Err(e) => {
                self.notifier.notify(Toast::error(e.reason));
                false
            }
        }
    }
}
