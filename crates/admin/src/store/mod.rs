//! Observable application store.
//!
//! The [`Store`] is the only source of application data for a client
//! context. It is written through [`Dispatcher::dispatch`] and read through
//! [`Store::select`], [`Store::snapshot`] or a [`Store::subscribe`] receiver
//! that wakes on every change.
//!
//! Catalog fetches are latest-wins: every fetch takes a ticket, and a
//! response whose ticket is older than the newest issued fetch is neither
//! applied nor reported. Its caller receives [`Payload::Superseded`].

mod state;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use storefront_admin_core::{
    Credentials, NewProduct, Price, Product, ProductQuery, ProductRecordId, Rating,
    RegistrationInput, UserInfo,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::instrument;

use crate::backend::{Backend, BackendError};

pub use state::{AuthState, CatalogState, StoreState};

/// Requests understood by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login(Credentials),
    Register(RegistrationInput),
    Logout,
    CreateProduct(NewProduct),
    UpdateProduct {
        id: ProductRecordId,
        product: NewProduct,
    },
    /// Unfiltered product list.
    FetchProducts,
    OnlyFeatured,
    PriceLessThanValue(Price),
    RatingHigherThanValue(Rating),
    /// Several filter dimensions composed into one query.
    FilterProducts(ProductQuery),
    DeleteProduct(ProductRecordId),
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::CreateProduct(_) => "create_product",
            Self::UpdateProduct { .. } => "update_product",
            Self::FetchProducts => "fetch_products",
            Self::OnlyFeatured => "only_featured",
            Self::PriceLessThanValue(_) => "price_less_than_value",
            Self::RatingHigherThanValue(_) => "rating_higher_than_value",
            Self::FilterProducts(_) => "filter_products",
            Self::DeleteProduct(_) => "delete_product",
        }
    }

    /// The backend query for fetch actions, `None` for everything else.
    #[must_use]
    pub fn query(&self) -> Option<ProductQuery> {
        match self {
            Self::FetchProducts => Some(ProductQuery::all()),
            Self::OnlyFeatured => Some(ProductQuery::featured()),
            Self::PriceLessThanValue(price) => Some(ProductQuery::price_at_most(*price)),
            Self::RatingHigherThanValue(rating) => Some(ProductQuery::rating_at_least(*rating)),
            Self::FilterProducts(query) => Some(*query),
            _ => None,
        }
    }
}

/// Result of a resolved action.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    User(UserInfo),
    LoggedOut,
    Product(Product),
    Products(Vec<Product>),
    Deleted(ProductRecordId),
    /// A newer fetch was issued before this one resolved.
    Superseded,
}

/// Rejection of an action, with a reason fit for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ActionError {
    pub reason: String,
}

impl ActionError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<BackendError> for ActionError {
    fn from(err: BackendError) -> Self {
        Self::new(err.reason())
    }
}

/// Asynchronous action dispatch.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Run `action` to completion.
    ///
    /// # Errors
    ///
    /// Returns `ActionError` with the backend's reason when the action is
    /// rejected or the backend cannot be reached.
    async fn dispatch(&self, action: Action) -> Result<Payload, ActionError>;
}

/// State slice whose loading flag a request holds up.
#[derive(Debug, Clone, Copy)]
enum Slice {
    Auth,
    Catalog,
}

impl Slice {
    fn begin(self, state: &mut StoreState) {
        match self {
            Self::Auth => state.auth.begin(),
            Self::Catalog => state.catalog.begin(),
        }
    }

    fn finish(self, state: &mut StoreState) {
        match self {
            Self::Auth => state.auth.finish(),
            Self::Catalog => state.catalog.finish(),
        }
    }
}

/// Keeps a slice loading until the request completes or is dropped.
struct Loading<'a> {
    store: &'a Store,
    slice: Slice,
    done: bool,
}

impl<'a> Loading<'a> {
    fn begin(store: &'a Store, slice: Slice) -> Self {
        store.update(|s| slice.begin(s));
        Self {
            store,
            slice,
            done: false,
        }
    }

    /// Clear the loading flag and apply the result in one change.
    fn complete(mut self, apply: impl FnOnce(&mut StoreState)) {
        self.done = true;
        let slice = self.slice;
        self.store.update(|s| {
            slice.finish(s);
            apply(s);
        });
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        if !self.done {
            tracing::debug!(slice = ?self.slice, "Request dropped before completion");
            let slice = self.slice;
            self.store.update(|s| slice.finish(s));
        }
    }
}

/// Store for one client context.
pub struct Store {
    backend: Arc<dyn Backend>,
    state: watch::Sender<StoreState>,
    latest_fetch: AtomicU64,
}

impl Store {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: watch::Sender::new(StoreState::default()),
            latest_fetch: AtomicU64::new(0),
        }
    }

    /// Read part of the state.
    pub fn select<R>(&self, selector: impl FnOnce(&StoreState) -> R) -> R {
        selector(&self.state.borrow())
    }

    /// A copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn auth(&self) -> AuthState {
        self.select(|s| s.auth.clone())
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogState {
        self.select(|s| s.catalog.clone())
    }

    /// A receiver notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    fn update(&self, f: impl FnOnce(&mut StoreState)) {
        self.state.send_modify(f);
    }

    async fn run_auth(&self, action: Action) -> Result<Payload, ActionError> {
        let loading = Loading::begin(self, Slice::Auth);

        let result = match &action {
            Action::Login(credentials) => self.backend.login(credentials).await.map(Payload::User),
            Action::Register(input) => self.backend.register(input).await.map(Payload::User),
            _ => self.backend.logout().await.map(|()| Payload::LoggedOut),
        };

        loading.complete(|s| match &result {
            Ok(Payload::User(user)) => s.auth.sign_in(user.clone()),
            Ok(Payload::LoggedOut) => s.auth.sign_out(),
            _ => {}
        });

        result.map_err(ActionError::from)
    }

    async fn run_fetch(&self, query: ProductQuery) -> Result<Payload, ActionError> {
        let ticket = self.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
        let loading = Loading::begin(self, Slice::Catalog);

        let result = self.backend.list_products(&query).await;
        let current = self.latest_fetch.load(Ordering::SeqCst) == ticket;

        loading.complete(|s| {
            if current && let Ok(products) = &result {
                s.catalog.products.clone_from(products);
            }
        });

        if !current {
            tracing::debug!(ticket, "Discarding superseded product fetch");
            return Ok(Payload::Superseded);
        }
        result.map(Payload::Products).map_err(ActionError::from)
    }

    async fn run_mutation(&self, action: Action) -> Result<Payload, ActionError> {
        let loading = Loading::begin(self, Slice::Catalog);

        let result = match action {
            Action::CreateProduct(product) => self
                .backend
                .create_product(&product)
                .await
                .map(Payload::Product),
            Action::UpdateProduct { id, product } => self
                .backend
                .update_product(&id, &product)
                .await
                .map(Payload::Product),
            Action::DeleteProduct(id) => self
                .backend
                .delete_product(&id)
                .await
                .map(|()| Payload::Deleted(id.clone())),
            other => Err(BackendError::Decode(format!(
                "{} is not a catalog mutation",
                other.name()
            ))),
        };

        loading.complete(|_| {});
        result.map_err(ActionError::from)
    }
}

#[async_trait]
impl Dispatcher for Store {
    #[instrument(skip_all, fields(action = action.name()))]
    async fn dispatch(&self, action: Action) -> Result<Payload, ActionError> {
        let result = if let Some(query) = action.query() {
            self.run_fetch(query).await
        } else {
            match action {
                Action::Login(_) | Action::Register(_) | Action::Logout => {
                    self.run_auth(action).await
                }
                mutation => self.run_mutation(mutation).await,
            }
        };

        if let Err(e) = &result {
            tracing::info!(reason = %e.reason, "Action rejected");
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use storefront_admin_core::{Email, ProductCode};
    use tokio::sync::oneshot;

    use super::*;
    use crate::backend::{InMemoryBackend, Operation};

    fn credentials() -> Credentials {
        Credentials {
            email: Email::parse("admin@example.com").unwrap(),
            password: "password123".to_string(),
        }
    }

    fn seeded_store() -> (Arc<InMemoryBackend>, Store) {
        let backend = Arc::new(InMemoryBackend::seeded());
        let store = Store::new(backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn test_login_sets_session_only_on_success() {
        let (backend, store) = seeded_store();

        backend.reject_next(Operation::Login, "Invalid email or password");
        let err = store.dispatch(Action::Login(credentials())).await.unwrap_err();
        assert_eq!(err.reason, "Invalid email or password");
        assert!(!store.auth().is_logged_in);

        let payload = store.dispatch(Action::Login(credentials())).await.unwrap();
        assert!(matches!(payload, Payload::User(ref u) if u.email == "admin@example.com"));
        let auth = store.auth();
        assert!(auth.is_logged_in);
        assert!(!auth.is_loading);
    }

    #[tokio::test]
    async fn test_logout_failure_keeps_session() {
        let (backend, store) = seeded_store();
        store.dispatch(Action::Login(credentials())).await.unwrap();

        backend.reject_next(Operation::Logout, "Session store unavailable");
        assert!(store.dispatch(Action::Logout).await.is_err());
        assert!(store.auth().is_logged_in);

        store.dispatch(Action::Logout).await.unwrap();
        assert!(!store.auth().is_logged_in);
        assert!(store.auth().userinfo.is_none());
    }

    #[tokio::test]
    async fn test_fetch_replaces_cache() {
        let (_, store) = seeded_store();
        store.dispatch(Action::FetchProducts).await.unwrap();
        let all = store.catalog().products.len();

        store.dispatch(Action::OnlyFeatured).await.unwrap();
        let featured = store.catalog().products;
        assert!(featured.len() < all);
        assert!(featured.iter().all(|p| p.featured));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_list() {
        let (backend, store) = seeded_store();
        store.dispatch(Action::FetchProducts).await.unwrap();
        let before = store.catalog().products;

        backend.reject_next(Operation::ListProducts, "Database offline");
        let err = store.dispatch(Action::OnlyFeatured).await.unwrap_err();
        assert_eq!(err.reason, "Database offline");
        assert_eq!(store.catalog().products, before);
        assert!(!store.catalog().is_loading);
    }

    #[tokio::test]
    async fn test_mutations_do_not_patch_cache() {
        let (backend, store) = seeded_store();
        store.dispatch(Action::FetchProducts).await.unwrap();
        let victim = store.catalog().products[0].id.clone();

        let payload = store
            .dispatch(Action::DeleteProduct(victim.clone()))
            .await
            .unwrap();
        assert_eq!(payload, Payload::Deleted(victim.clone()));
        assert!(store.catalog().products.iter().any(|p| p.id == victim));
        assert!(backend.products().iter().all(|p| p.id != victim));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let (_, store) = seeded_store();
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        store.dispatch(Action::FetchProducts).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().catalog.products.is_empty());
    }

    /// Backend whose product listings resolve only when released.
    #[derive(Default)]
    struct GatedBackend {
        gates: Mutex<VecDeque<oneshot::Receiver<Vec<Product>>>>,
    }

    impl GatedBackend {
        fn gate(&self) -> oneshot::Sender<Vec<Product>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl Backend for GatedBackend {
        async fn login(&self, _: &Credentials) -> Result<UserInfo, BackendError> {
            unimplemented!()
        }
        async fn register(&self, _: &RegistrationInput) -> Result<UserInfo, BackendError> {
            unimplemented!()
        }
        async fn logout(&self) -> Result<(), BackendError> {
            unimplemented!()
        }
        async fn list_products(&self, _: &ProductQuery) -> Result<Vec<Product>, BackendError> {
            let gate = self.gates.lock().unwrap().pop_front().unwrap();
            Ok(gate.await.unwrap())
        }
        async fn create_product(&self, _: &NewProduct) -> Result<Product, BackendError> {
            unimplemented!()
        }
        async fn update_product(
            &self,
            _: &ProductRecordId,
            _: &NewProduct,
        ) -> Result<Product, BackendError> {
            unimplemented!()
        }
        async fn delete_product(&self, _: &ProductRecordId) -> Result<(), BackendError> {
            unimplemented!()
        }
    }

    fn product(code: &str) -> Product {
        Product {
            id: ProductRecordId::new(code),
            product_id: ProductCode::new(code),
            name: code.to_string(),
            price: Price::from_units(10),
            featured: false,
            rating: Rating::MIN,
            company: "acme".to_string(),
        }
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let backend = Arc::new(GatedBackend::default());
        let first_gate = backend.gate();
        let second_gate = backend.gate();
        let store = Arc::new(Store::new(backend.clone()));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.dispatch(Action::FetchProducts).await }
        });
        while store.latest_fetch.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.dispatch(Action::OnlyFeatured).await }
        });
        while store.latest_fetch.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        second_gate.send(vec![product("new")]).unwrap();
        let second = second.await.unwrap().unwrap();
        assert!(matches!(second, Payload::Products(ref p) if p[0].name == "new"));
        assert!(store.catalog().is_loading);

        first_gate.send(vec![product("old")]).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), Payload::Superseded);

        let catalog = store.catalog();
        assert_eq!(catalog.products, vec![product("new")]);
        assert!(!catalog.is_loading);
    }

    #[tokio::test]
    async fn test_dropped_fetch_stops_loading() {
        let backend = Arc::new(GatedBackend::default());
        let _never = backend.gate();
        let next = backend.gate();
        let store = Arc::new(Store::new(backend.clone()));

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.dispatch(Action::FetchProducts).await }
        });
        while !store.catalog().is_loading {
            tokio::task::yield_now().await;
        }
        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());
        assert!(!store.catalog().is_loading);

        next.send(vec![product("fresh")]).unwrap();
        store.dispatch(Action::FetchProducts).await.unwrap();
        let catalog = store.catalog();
        assert_eq!(catalog.products, vec![product("fresh")]);
        assert!(!catalog.is_loading);
    }
}
