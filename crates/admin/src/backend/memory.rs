//! In-process backend for local development and tests.
//!
//! Keeps users and products in memory, records the most recent calls it
//! receives, and can be told to reject the next call of a given operation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use storefront_admin_core::{
    Credentials, NewProduct, Price, Product, ProductCode, ProductQuery, ProductRecordId, Rating,
    RegistrationInput, UserInfo,
};

use super::{Backend, BackendError};

/// Number of calls kept in the call log; older calls are evicted first.
const CALL_LOG_CAPACITY: usize = 256;

/// Backend operations, for scripting rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    Logout,
    ListProducts,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

/// A call received by [`InMemoryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Login { email: String },
    Register { email: String },
    Logout,
    ListProducts(ProductQuery),
    CreateProduct(NewProduct),
    UpdateProduct(ProductRecordId, NewProduct),
    DeleteProduct(ProductRecordId),
}

impl BackendCall {
    const fn operation(&self) -> Operation {
        match self {
            Self::Login { .. } => Operation::Login,
            Self::Register { .. } => Operation::Register,
            Self::Logout => Operation::Logout,
            Self::ListProducts(_) => Operation::ListProducts,
            Self::CreateProduct(_) => Operation::CreateProduct,
            Self::UpdateProduct(..) => Operation::UpdateProduct,
            Self::DeleteProduct(_) => Operation::DeleteProduct,
        }
    }
}

struct Account {
    name: String,
    password: String,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    products: Vec<Product>,
    next_id: u64,
    calls: VecDeque<BackendCall>,
    rejections: HashMap<Operation, String>,
}

impl Inner {
    fn assign_id(&mut self) -> ProductRecordId {
        self.next_id += 1;
        ProductRecordId::new(format!("{:024x}", self.next_id))
    }

    /// Log the call and apply a scripted rejection, if one is pending.
    fn record(&mut self, call: BackendCall) -> Result<(), BackendError> {
        let operation = call.operation();
        if self.calls.len() == CALL_LOG_CAPACITY {
            self.calls.pop_front();
        }
        self.calls.push_back(call);
        match self.rejections.remove(&operation) {
            Some(message) => Err(BackendError::Rejected {
                status: 400,
                message,
            }),
            None => Ok(()),
        }
    }

    fn position(&self, id: &ProductRecordId) -> Result<usize, BackendError> {
        self.products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| BackendError::Rejected {
                status: 404,
                message: "Product not found".to_string(),
            })
    }

    fn ensure_unique_code(
        &self,
        code: &ProductCode,
        except: Option<&ProductRecordId>,
    ) -> Result<(), BackendError> {
        let taken = self
            .products
            .iter()
            .any(|p| &p.product_id == code && Some(&p.id) != except);
        if taken {
            return Err(BackendError::Rejected {
                status: 409,
                message: format!("Product with ID {code} already exists"),
            });
        }
        Ok(())
    }
}

/// Backend kept entirely in memory.
#[derive(Default)]
pub struct InMemoryBackend {
    inner: Mutex<Inner>,
}

impl InMemoryBackend {
    /// An empty backend with no users and no products.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with a demo account and a small catalog.
    ///
    /// The demo account is `admin@example.com` / `password123`.
    #[must_use]
    pub fn seeded() -> Self {
        let catalog = [
            ("CH-100", "Accent Chair", 89, true, 4.5, "ikea"),
            ("LP-200", "Floor Lamp", 45, false, 3.5, "liddy"),
            ("SF-300", "Three-Seat Sofa", 180, true, 4.8, "caressa"),
            ("TB-400", "Side Table", 25, false, 2.5, "marcos"),
            ("BD-500", "Bed Frame", 150, false, 4.0, "caressa"),
        ];

        let backend = Self::new().with_account("Admin", "admin@example.com", "password123");
        for (code, name, price, featured, rating, company) in catalog {
            backend.insert(NewProduct {
                product_id: ProductCode::new(code),
                name: name.to_string(),
                price: Price::from_units(price),
                featured,
                rating: Rating::clamped(rating),
                company: company.to_string(),
            });
        }
        backend
    }

    /// Add an account that can sign in.
    #[must_use]
    pub fn with_account(self, name: &str, email: &str, password: &str) -> Self {
        self.lock().accounts.insert(
            email.to_string(),
            Account {
                name: name.to_string(),
                password: password.to_string(),
            },
        );
        self
    }

    /// Store a product directly, bypassing the call log.
    pub fn insert(&self, product: NewProduct) -> Product {
        let mut inner = self.lock();
        let id = inner.assign_id();
        let product = Product::from_new(id, product);
        inner.products.push(product.clone());
        product
    }

    /// Reject the next call of `operation` with `message`.
    pub fn reject_next(&self, operation: Operation, message: impl Into<String>) {
        self.lock().rejections.insert(operation, message.into());
    }

    /// Logged calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.iter().cloned().collect()
    }

    /// Number of logged calls of `operation`.
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Current catalog contents.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> Result<UserInfo, BackendError> {
        let mut inner = self.lock();
        inner.record(BackendCall::Login {
            email: credentials.email.to_string(),
        })?;

        match inner.accounts.get(credentials.email.as_str()) {
            Some(account) if account.password == credentials.password => Ok(UserInfo {
                name: account.name.clone(),
                email: credentials.email.to_string(),
            }),
            _ => Err(BackendError::Rejected {
                status: 401,
                message: "Invalid email or password".to_string(),
            }),
        }
    }

    async fn register(&self, input: &RegistrationInput) -> Result<UserInfo, BackendError> {
        let mut inner = self.lock();
        inner.record(BackendCall::Register {
            email: input.email.to_string(),
        })?;

        if inner.accounts.contains_key(input.email.as_str()) {
            return Err(BackendError::Rejected {
                status: 409,
                message: "User already exists".to_string(),
            });
        }
        inner.accounts.insert(
            input.email.to_string(),
            Account {
                name: input.name.clone(),
                password: input.password.clone(),
            },
        );
        Ok(UserInfo {
            name: input.name.clone(),
            email: input.email.to_string(),
        })
    }

    async fn logout(&self) -> Result<(), BackendError> {
        self.lock().record(BackendCall::Logout)
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, BackendError> {
        let mut inner = self.lock();
        inner.record(BackendCall::ListProducts(*query))?;
        Ok(inner
            .products
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, BackendError> {
        let mut inner = self.lock();
        inner.record(BackendCall::CreateProduct(product.clone()))?;
        inner.ensure_unique_code(&product.product_id, None)?;

        let id = inner.assign_id();
        let created = Product::from_new(id, product.clone());
        inner.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: &ProductRecordId,
        product: &NewProduct,
    ) -> Result<Product, BackendError> {
        let mut inner = self.lock();
        inner.record(BackendCall::UpdateProduct(id.clone(), product.clone()))?;
        let index = inner.position(id)?;
        inner.ensure_unique_code(&product.product_id, Some(id))?;

        let updated = Product::from_new(id.clone(), product.clone());
        inner.products[index] = updated.clone();
        Ok(updated)
    }

    async fn delete_product(&self, id: &ProductRecordId) -> Result<(), BackendError> {
        let mut inner = self.lock();
        inner.record(BackendCall::DeleteProduct(id.clone()))?;
        let index = inner.position(id)?;
        inner.products.remove(index);
        Ok(())
    }
}
