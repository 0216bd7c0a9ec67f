//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::context::ContextRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the registry of per-session client contexts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    contexts: ContextRegistry,
}

impl AppState {
    /// Create application state with the backend selected by `config`.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let contexts = ContextRegistry::from_config(&config);
        Self::with_contexts(config, contexts)
    }

    /// Create application state with an explicit context registry.
    #[must_use]
    pub fn with_contexts(config: AdminConfig, contexts: ContextRegistry) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, contexts }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the client context registry.
    #[must_use]
    pub fn contexts(&self) -> &ContextRegistry {
        &self.inner.contexts
    }
}
