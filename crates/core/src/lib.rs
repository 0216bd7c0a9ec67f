//! Storefront Admin Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront admin:
//! - `admin` - Server-rendered administration UI
//! - `integration-tests` - In-process router tests
//!
//! # Architecture
//!
//! The core crate contains only types, traits and validation - no I/O, no
//! HTTP clients, no templates. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, ratings, emails, products
//! - [`validation`] - Form schemas producing typed values or field errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{FieldErrors, FieldInput, Schema};
