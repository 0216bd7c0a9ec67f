//! Product create/update schema.

use serde::Deserialize;

use super::{FieldErrors, FieldInput, Schema, checkbox, parse_flag, required};
use crate::types::{NewProduct, Price, PriceError, Product, ProductCode, Rating, RatingError};

/// Raw product form fields.
///
/// Numeric inputs stay as text until validated so that a bad entry can be
/// shown back to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductFields {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub featured: bool,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub company: String,
}

impl Default for ProductFields {
    fn default() -> Self {
        Self {
            product_id: String::new(),
            name: String::new(),
            price: "0".to_string(),
            featured: false,
            rating: "0".to_string(),
            company: String::new(),
        }
    }
}

impl ProductFields {
    /// Pre-filled fields for editing an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.product_id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            featured: product.featured,
            rating: product.rating.to_string(),
            company: product.company.clone(),
        }
    }

    /// Clamp the rating into `[0, 5]` the way the rating slider does.
    ///
    /// Non-numeric text is left alone so validation can report it.
    pub fn clamp_rating(&mut self) {
        if let Ok(value) = self.rating.trim().parse::<f64>() {
            self.rating = Rating::clamped(value).to_string();
        }
    }

    /// Current rating as a number for the slider, defaulting to zero.
    #[must_use]
    pub fn rating_value(&self) -> f64 {
        self.rating
            .trim()
            .parse::<f64>()
            .map_or(0.0, |v| Rating::clamped(v).value())
    }
}

impl FieldInput for ProductFields {
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "name",
        "price",
        "featured",
        "rating",
        "company",
    ];

    fn set_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "product_id" => self.product_id = value.to_string(),
            "name" => self.name = value.to_string(),
            "price" => self.price = value.to_string(),
            "featured" => self.featured = parse_flag(value),
            "rating" => self.rating = value.to_string(),
            "company" => self.company = value.to_string(),
            _ => return false,
        }
        true
    }
}

/// Validates [`ProductFields`] into a [`NewProduct`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductSchema;

impl Schema for ProductSchema {
    type Input = ProductFields;
    type Output = NewProduct;

    fn validate(&self, input: &ProductFields) -> Result<NewProduct, FieldErrors> {
        let mut errors = FieldErrors::new();

        let product_id = required(
            &mut errors,
            "product_id",
            &input.product_id,
            "Product ID is required",
        );
        let name = required(&mut errors, "name", &input.name, "Product name is required");

        let price = Price::parse(&input.price)
            .map_err(|e| match e {
                PriceError::NotANumber => errors.insert("price", "Price must be a number"),
                PriceError::Negative => errors.insert("price", "Price must be a positive number"),
            })
            .ok();

        let rating = Rating::parse(&input.rating)
            .map_err(|e| match e {
                RatingError::NotANumber => errors.insert("rating", "Rating must be a number"),
                RatingError::OutOfRange { .. } => {
                    errors.insert("rating", "Rating must be between 0 and 5");
                }
            })
            .ok();

        let company = required(
            &mut errors,
            "company",
            &input.company,
            "Company name is required",
        );

        match (price, rating) {
            (Some(price), Some(rating)) if errors.is_empty() => Ok(NewProduct {
                product_id: ProductCode::new(product_id),
                name,
                price,
                featured: input.featured,
                rating,
                company,
            }),
            _ => Err(errors),
        }
    }
}
