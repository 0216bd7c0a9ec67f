//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use storefront_admin_core::Rating;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a rating as five stars, e.g. `4.5` becomes `★★★★☆`.
///
/// Usage in templates: `{{ product.rating|stars }}`
#[askama::filter_fn]
pub fn stars(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let rating = Rating::parse(&value.to_string()).unwrap_or_default();
    let filled = usize::from(rating.filled_stars());
    Ok(format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled)))
}
