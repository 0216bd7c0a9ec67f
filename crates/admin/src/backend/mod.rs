//! Storefront backend API.
//!
//! The store talks to the backend through the [`Backend`] trait. Two
//! implementations are provided:
//!
//! - [`HttpBackend`] calls the REST API with `reqwest`, one cookie jar per
//!   client context.
//! - [`InMemoryBackend`] keeps the catalog in process, for local development
//!   and tests.

mod http;
mod memory;

use async_trait::async_trait;
use storefront_admin_core::{
    Credentials, NewProduct, Product, ProductQuery, ProductRecordId, RegistrationInput, UserInfo,
};
use thiserror::Error;

pub use http::HttpBackend;
pub use memory::{BackendCall, InMemoryBackend, Operation};

/// Errors from the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Message suitable for showing to the user.
    ///
    /// Rejections carry the backend's own message verbatim.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Http(e) if e.is_timeout() => "The request timed out".to_string(),
            Self::Http(_) => "Could not reach the server".to_string(),
            Self::Decode(_) => "Unexpected response from the server".to_string(),
        }
    }
}

/// Operations of the storefront REST API.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<UserInfo, BackendError>;

    /// `POST /auth/register`
    async fn register(&self, input: &RegistrationInput) -> Result<UserInfo, BackendError>;

    /// `POST /auth/logout`
    async fn logout(&self) -> Result<(), BackendError>;

    /// `GET /products`
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, BackendError>;

    /// `POST /products`
    async fn create_product(&self, product: &NewProduct) -> Result<Product, BackendError>;

    /// `PUT /products/{id}`
    async fn update_product(
        &self,
        id: &ProductRecordId,
        product: &NewProduct,
    ) -> Result<Product, BackendError>;

    /// `DELETE /products/{id}`
    async fn delete_product(&self, id: &ProductRecordId) -> Result<(), BackendError>;
}
