//! Integration test harness for the storefront admin.
//!
//! Drives the full router (sessions, security headers, tracing) in-process
//! against a shared in-memory backend. A [`Browser`] keeps its own session
//! cookie, so several browsers against one [`TestApp`] behave like separate
//! users.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storefront-admin-integration-tests
//! ```

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use storefront_admin::backend::{Backend, InMemoryBackend};
use storefront_admin::build_app;
use storefront_admin::catalog::FilterMode;
use storefront_admin::config::{AdminConfig, ApiConfig};
use storefront_admin::context::ContextRegistry;
use storefront_admin::state::AppState;
use tower::ServiceExt;

/// Response bodies larger than this are a bug in the page under test.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The admin app wired to an inspectable in-memory backend.
pub struct TestApp {
    router: Router,
    pub backend: Arc<InMemoryBackend>,
}

impl TestApp {
    /// App backed by the seeded demo catalog and account.
    pub fn seeded() -> Self {
        Self::with_backend(InMemoryBackend::seeded(), FilterMode::Independent)
    }

    /// App backed by `backend`, filtering in `mode`.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory API url is rejected.
    #[allow(clippy::expect_used)]
    pub fn with_backend(backend: InMemoryBackend, mode: FilterMode) -> Self {
        let backend = Arc::new(backend);
        let api = ApiConfig::new("memory:").expect("memory api url");
        let mut config = AdminConfig::local(api);
        config.catalog_filter_mode = mode;

        let shared: Arc<dyn Backend> = backend.clone();
        let state = AppState::with_contexts(config, ContextRegistry::shared(shared, mode));

        Self {
            router: build_app(state),
            backend,
        }
    }

    /// A fresh browser with no session.
    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            cookie: None,
        }
    }
}

/// A browser session against a [`TestApp`].
pub struct Browser {
    router: Router,
    cookie: Option<String>,
}

/// A buffered response.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Page {
    /// Redirect target, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }

    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[allow(clippy::expect_used)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("json body")
    }
}

impl Browser {
    pub async fn get(&mut self, path: &str) -> Page {
        self.send(Request::get(path), Body::empty()).await
    }

    /// POST an urlencoded form.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Page {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::post(path).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    /// POST a JSON body.
    pub async fn post_json(&mut self, path: &str, value: &serde_json::Value) -> Page {
        self.send(
            Request::post(path).header(header::CONTENT_TYPE, "application/json"),
            Body::from(value.to_string()),
        )
        .await
    }

    /// Log in as the seeded demo account.
    pub async fn login_as_demo(&mut self) -> Page {
        self.post_form(
            "/login",
            &[("email", "admin@example.com"), ("password", "password123")],
        )
        .await
    }

    #[allow(clippy::expect_used)]
    async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> Page {
        let builder = match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        };
        let request = builder.body(body).expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("body");

        Page {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
