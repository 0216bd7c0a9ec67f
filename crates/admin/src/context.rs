//! Per-session client contexts.
//!
//! Every browser session gets its own [`ClientContext`]: a store, a toast
//! queue, one controller per form and a catalog view, all wired to a backend
//! client of its own. Contexts are kept in a `moka` cache keyed by an id
//! stored in the session, and expire after the same idle period as sessions.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::backend::{Backend, BackendError, HttpBackend, InMemoryBackend};
use crate::catalog::{CatalogView, FilterMode};
use crate::config::AdminConfig;
use crate::forms::{CreateProductForm, FormController, LoginForm, RegisterForm};
use crate::models::Route;
use crate::navbar::{self, NavBar};
use crate::notify::{Notifier, Toast, ToastQueue};
use crate::store::{Dispatcher, Store};

/// Idle time after which a context is dropped (matches the session expiry).
pub const CONTEXT_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

const MAX_CONTEXTS: u64 = 10_000;

/// Creates a backend client for a new context.
pub type BackendFactory = Arc<dyn Fn() -> Result<Arc<dyn Backend>, BackendError> + Send + Sync>;

/// The state behind one browser session.
pub struct ClientContext {
    id: Uuid,
    store: Arc<Store>,
    toasts: Arc<ToastQueue>,
    pub login: FormController<LoginForm>,
    pub register: FormController<RegisterForm>,
    pub create_product: FormController<CreateProductForm>,
    pub catalog: CatalogView,
}

impl ClientContext {
    #[must_use]
    pub fn new(id: Uuid, backend: Arc<dyn Backend>, mode: FilterMode) -> Self {
        let store = Arc::new(Store::new(backend));
        let toasts = Arc::new(ToastQueue::new());
        let dispatcher: Arc<dyn Dispatcher> = store.clone();
        let notifier: Arc<dyn Notifier> = toasts.clone();

        Self {
            id,
            login: FormController::new(dispatcher.clone(), notifier.clone()),
            register: FormController::new(dispatcher.clone(), notifier.clone()),
            create_product: FormController::new(dispatcher.clone(), notifier.clone()),
            catalog: CatalogView::new(dispatcher, notifier, mode),
            store,
            toasts,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Pending toasts, removed from the queue.
    #[must_use]
    pub fn take_toasts(&self) -> Vec<Toast> {
        self.toasts.drain()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.store.select(|s| s.auth.is_logged_in)
    }

    #[must_use]
    pub fn navbar(&self, current: Option<Route>) -> NavBar {
        NavBar::for_session(&self.store.auth(), current)
    }

    /// Log out through the store. Returns whether it succeeded.
    pub async fn logout(&self) -> bool {
        let dispatcher: Arc<dyn Dispatcher> = self.store.clone();
        let notifier: Arc<dyn Notifier> = self.toasts.clone();
        navbar::logout(&dispatcher, &notifier).await
    }
}

/// All live client contexts.
#[derive(Clone)]
pub struct ContextRegistry {
    contexts: Cache<Uuid, Arc<ClientContext>>,
    factory: BackendFactory,
    mode: FilterMode,
}

impl ContextRegistry {
    #[must_use]
    pub fn new(factory: BackendFactory, mode: FilterMode) -> Self {
        let contexts = Cache::builder()
            .max_capacity(MAX_CONTEXTS)
            .time_to_idle(CONTEXT_IDLE_TIMEOUT)
            .build();

        Self {
            contexts,
            factory,
            mode,
        }
    }

    /// Registry for `config`: an HTTP client per context, or one shared
    /// in-memory backend when the API URL uses the `memory:` scheme.
    #[must_use]
    pub fn from_config(config: &AdminConfig) -> Self {
        let factory: BackendFactory = if config.api.is_in_memory() {
            Self::shared_factory(Arc::new(InMemoryBackend::seeded()))
        } else {
            let api = config.api.clone();
            Arc::new(move || -> Result<Arc<dyn Backend>, BackendError> {
                Ok(Arc::new(HttpBackend::new(&api)?))
            })
        };
        Self::new(factory, config.catalog_filter_mode)
    }

    /// Registry whose contexts all share `backend`.
    #[must_use]
    pub fn shared(backend: Arc<dyn Backend>, mode: FilterMode) -> Self {
        Self::new(Self::shared_factory(backend), mode)
    }

    fn shared_factory(backend: Arc<dyn Backend>) -> BackendFactory {
        Arc::new(move || -> Result<Arc<dyn Backend>, BackendError> { Ok(backend.clone()) })
    }

    /// The context for `id`, created on first use.
    ///
    /// # Errors
    ///
    /// Returns the backend error if a client for a new context cannot be built.
    pub async fn get_or_create(&self, id: Uuid) -> Result<Arc<ClientContext>, Arc<BackendError>> {
        self.contexts
            .try_get_with(id, async {
                let backend = (self.factory)()?;
                tracing::debug!(context_id = %id, "Creating client context");
                Ok::<_, BackendError>(Arc::new(ClientContext::new(id, backend, self.mode)))
            })
            .await
    }

    /// Drop the context for `id`.
    pub async fn remove(&self, id: Uuid) {
        self.contexts.invalidate(&id).await;
    }

    /// Number of live contexts (approximate, see `moka::future::Cache::entry_count`).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.contexts.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
