//! Product records, create/update payloads and catalog filters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductCode, ProductRecordId};
use super::price::Price;
use super::rating::Rating;

/// A product as stored by the backend.
///
/// The record id is assigned by the backend and travels as `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductRecordId,
    pub product_id: ProductCode,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub rating: Rating,
    pub company: String,
}

impl Product {
    /// Attach a backend id to a validated payload.
    #[must_use]
    pub fn from_new(id: ProductRecordId, product: NewProduct) -> Self {
        Self {
            id,
            product_id: product.product_id,
            name: product.name,
            price: product.price,
            featured: product.featured,
            rating: product.rating,
            company: product.company,
        }
    }

    /// The editable fields of this product.
    #[must_use]
    pub fn details(&self) -> NewProduct {
        NewProduct {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            price: self.price,
            featured: self.featured,
            rating: self.rating,
            company: self.company.clone(),
        }
    }
}

/// Product fields without the backend id: the body of create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_id: ProductCode,
    pub name: String,
    pub price: Price,
    pub featured: bool,
    pub rating: Rating,
    pub company: String,
}

/// Filter sent to the backend when listing products.
///
/// An empty query lists everything.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProductQuery {
    /// Only products priced at or below this amount.
    pub max_price: Option<Price>,
    /// Only products rated at or above this value.
    pub min_rating: Option<Rating>,
    /// Only featured products.
    pub featured_only: bool,
}

impl ProductQuery {
    /// The unfiltered listing.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Featured products only.
    #[must_use]
    pub fn featured() -> Self {
        Self {
            featured_only: true,
            ..Self::default()
        }
    }

    /// Products at or under a price bound, ignoring every other dimension.
    #[must_use]
    pub fn price_at_most(max_price: Price) -> Self {
        Self {
            max_price: Some(max_price),
            ..Self::default()
        }
    }

    /// Products at or above a rating, ignoring every other dimension.
    #[must_use]
    pub fn rating_at_least(min_rating: Rating) -> Self {
        Self {
            min_rating: Some(min_rating),
            ..Self::default()
        }
    }

    /// Whether this query lists everything.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.max_price.is_none() && self.min_rating.is_none() && !self.featured_only
    }

    /// Query-string pairs understood by the backend's `GET /products`.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(max_price) = self.max_price {
            pairs.push(("maxPrice", max_price.to_string()));
        }
        if let Some(min_rating) = self.min_rating {
            pairs.push(("minRating", min_rating.to_string()));
        }
        if self.featured_only {
            pairs.push(("featured", "true".to_string()));
        }
        pairs
    }

    /// Whether a product satisfies every dimension of this query.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.max_price.is_none_or(|max| product.price <= max)
            && self.min_rating.is_none_or(|min| product.rating >= min)
            && (!self.featured_only || product.featured)
    }
}

/// Catalog filter controls. Local to one catalog view and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterState {
    pub max_price: Price,
    pub is_featured: bool,
    pub min_rating: Rating,
}

impl FilterState {
    /// Upper bound of the price slider.
    pub const PRICE_SLIDER_MAX: u32 = 200;
    /// Initial price slider position.
    pub const PRICE_DEFAULT: u32 = 100;
    /// Rating slider granularity.
    pub const RATING_STEP: f64 = 0.5;

    /// Clamp a raw price slider value into the slider's range.
    #[must_use]
    pub fn price_slider(value: Decimal) -> Price {
        Price::clamped(
            value,
            Price::ZERO,
            Price::from_units(Self::PRICE_SLIDER_MAX),
        )
    }

    /// Clamp and snap a raw rating slider value.
    #[must_use]
    pub fn rating_slider(value: f64) -> Rating {
        Rating::snapped(value, Self::RATING_STEP)
    }

    /// Every active dimension composed into one query.
    #[must_use]
    pub fn compound_query(&self) -> ProductQuery {
        ProductQuery {
            max_price: Some(self.max_price),
            min_rating: (self.min_rating > Rating::MIN).then_some(self.min_rating),
            featured_only: self.is_featured,
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            max_price: Price::from_units(Self::PRICE_DEFAULT),
            is_featured: false,
            min_rating: Rating::MIN,
        }
    }
}
