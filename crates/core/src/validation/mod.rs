//! Declarative form validation.
//!
//! A [`Schema`] turns raw form fields into a typed value or a set of
//! per-field messages. Schemas are pure: they never perform I/O, so they run
//! on every submit and on every change to a touched field.
//!
//! # Example
//!
//! ```
//! use storefront_admin_core::validation::{LoginFields, LoginSchema};
//! use storefront_admin_core::Schema;
//!
//! let fields = LoginFields {
//!     email: "a@b.com".to_string(),
//!     password: "short".to_string(),
//! };
//!
//! let errors = LoginSchema.validate(&fields).unwrap_err();
//! assert_eq!(
//!     errors.get("password"),
//!     Some("Password must be at least 8 characters long.")
//! );
//! ```

mod auth;
mod product;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

pub use auth::{LoginFields, LoginSchema, RegistrationFields, RegistrationSchema};
pub use product::{ProductFields, ProductSchema};

/// Per-field validation messages, keyed by field name.
///
/// Only the first message recorded for a field is kept, matching how a form
/// shows one message under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// No errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field` unless one is already present.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// The message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has a message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The first message in field-name order, for one-line summaries.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    /// Keep only messages for the given fields.
    #[must_use]
    pub fn only(mut self, fields: &BTreeSet<String>) -> Self {
        self.0.retain(|field, _| fields.contains(field));
        self
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when any field has a message.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// A validator for one form.
pub trait Schema {
    /// Raw field values as entered.
    type Input;
    /// Normalized, typed value.
    type Output;

    /// Validate every field of `input`.
    ///
    /// # Errors
    ///
    /// Returns the messages of every failing field.
    fn validate(&self, input: &Self::Input) -> Result<Self::Output, FieldErrors>;
}

/// Raw form fields that can be edited one at a time.
pub trait FieldInput: Default + Clone {
    /// Names of every field, in display order.
    const FIELDS: &'static [&'static str];

    /// Overwrite one field from its string form. Returns `false` for an
    /// unknown field name.
    fn set_field(&mut self, field: &str, value: &str) -> bool;
}

/// Required, non-blank text. Returns the trimmed value.
fn required(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, message);
    }
    trimmed.to_string()
}

/// Deserialize an HTML checkbox. Browsers send `on` when checked and omit
/// the field otherwise.
pub(crate) fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.is_some_and(|v| parse_flag(&v)))
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}
