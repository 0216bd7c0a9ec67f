//! REST client for the storefront backend.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use storefront_admin_core::{
    Credentials, NewProduct, Product, ProductQuery, ProductRecordId, RegistrationInput, UserInfo,
};
use tracing::instrument;
use url::Url;

use super::{Backend, BackendError};
use crate::config::ApiConfig;

/// Backend client over HTTP.
///
/// Each instance has its own cookie jar, so the backend's session cookie is
/// scoped to one client context.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

/// `{ "user": ... }` or a bare user object.
#[derive(Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped { user: UserInfo },
    Bare(UserInfo),
}

/// `[...]` or `{ "products": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductList {
    Bare(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

/// `{ "product": ... }` or a bare product object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductEnvelope {
    Wrapped { product: Product },
    Bare(Product),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

impl HttpBackend {
    /// Create a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Decode(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Turn a non-success response into `BackendError::Rejected`.
    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
            |_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            },
            |e| e.message,
        );
        tracing::warn!(status = status.as_u16(), %message, "Backend rejected request");

        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let body = Self::check(response).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<UserInfo, BackendError> {
        let url = self.endpoint(&["auth", "login"])?;
        let response = self.request(Method::POST, url).json(credentials).send().await?;
        let envelope: UserEnvelope = Self::decode(response).await?;
        Ok(match envelope {
            UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
        })
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn register(&self, input: &RegistrationInput) -> Result<UserInfo, BackendError> {
        let url = self.endpoint(&["auth", "register"])?;
        let response = self.request(Method::POST, url).json(input).send().await?;
        let envelope: UserEnvelope = Self::decode(response).await?;
        Ok(match envelope {
            UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
        })
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<(), BackendError> {
        let url = self.endpoint(&["auth", "logout"])?;
        let response = self.request(Method::POST, url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, BackendError> {
        let url = self.endpoint(&["products"])?;
        let response = self
            .request(Method::GET, url)
            .query(&query.to_query_pairs())
            .send()
            .await?;
        let list: ProductList = Self::decode(response).await?;
        Ok(match list {
            ProductList::Bare(products) | ProductList::Wrapped { products } => products,
        })
    }

    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    async fn create_product(&self, product: &NewProduct) -> Result<Product, BackendError> {
        let url = self.endpoint(&["products"])?;
        let response = self.request(Method::POST, url).json(product).send().await?;
        let envelope: ProductEnvelope = Self::decode(response).await?;
        Ok(match envelope {
            ProductEnvelope::Wrapped { product } | ProductEnvelope::Bare(product) => product,
        })
    }

    #[instrument(skip(self, product), fields(id = %id))]
    async fn update_product(
        &self,
        id: &ProductRecordId,
        product: &NewProduct,
    ) -> Result<Product, BackendError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        let response = self.request(Method::PUT, url).json(product).send().await?;
        let envelope: ProductEnvelope = Self::decode(response).await?;
        Ok(match envelope {
            ProductEnvelope::Wrapped { product } | ProductEnvelope::Bare(product) => product,
        })
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_product(&self, id: &ProductRecordId) -> Result<(), BackendError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        let response = self.request(Method::DELETE, url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(&ApiConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let backend = backend("https://api.shop.test/v1");
        assert_eq!(
            backend.endpoint(&["auth", "login"]).unwrap().as_str(),
            "https://api.shop.test/v1/auth/login"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let backend = backend("https://api.shop.test");
        assert_eq!(
            backend.endpoint(&["products", "a/b c"]).unwrap().as_str(),
            "https://api.shop.test/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_product_list_shapes() {
        let item = serde_json::json!({
            "_id": "1",
            "productId": "SKU-1",
            "name": "Chair",
            "price": 10,
            "featured": false,
            "rating": 3,
            "company": "ikea"
        });

        let bare: ProductList = serde_json::from_value(serde_json::json!([item])).unwrap();
        assert!(matches!(bare, ProductList::Bare(ref p) if p.len() == 1));

        let wrapped: ProductList =
            serde_json::from_value(serde_json::json!({ "products": [item] })).unwrap();
        assert!(matches!(wrapped, ProductList::Wrapped { ref products } if products.len() == 1));
    }

    #[test]
    fn test_user_envelope_shapes() {
        let wrapped: UserEnvelope = serde_json::from_value(serde_json::json!({
            "user": { "name": "Ada", "email": "ada@example.com" }
        }))
        .unwrap();
        assert!(matches!(wrapped, UserEnvelope::Wrapped { ref user } if user.name == "Ada"));

        let bare: UserEnvelope =
            serde_json::from_value(serde_json::json!({ "email": "ada@example.com" })).unwrap();
        assert!(matches!(bare, UserEnvelope::Bare(ref user) if user.name.is_empty()));
    }

    #[test]
    fn test_error_body_accepts_error_key() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"Product not found"}"#).unwrap();
        assert_eq!(body.message, "Product not found");
    }
}
