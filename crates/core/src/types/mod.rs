//! Core types for the storefront admin.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod rating;

pub use account::{Credentials, RegistrationInput, UserInfo};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{FilterState, NewProduct, Product, ProductQuery};
pub use rating::{Rating, RatingError};
