//! Store state slices.

use serde::Serialize;
use storefront_admin_core::{Product, UserInfo};

/// Everything the store holds for one client context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreState {
    pub auth: AuthState,
    pub catalog: CatalogState,
}

/// Session slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// True while any auth request is in flight.
    pub is_loading: bool,
    pub userinfo: Option<UserInfo>,
    pub is_logged_in: bool,
    #[serde(skip)]
    in_flight: usize,
}

impl AuthState {
    pub(super) const fn begin(&mut self) {
        self.in_flight += 1;
        self.is_loading = true;
    }

    pub(super) const fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_loading = self.in_flight > 0;
    }

    pub(super) fn sign_in(&mut self, user: UserInfo) {
        self.userinfo = Some(user);
        self.is_logged_in = true;
    }

    pub(super) fn sign_out(&mut self) {
        self.userinfo = None;
        self.is_logged_in = false;
    }
}

/// Catalog slice: the last applied product list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    /// True while any catalog request is in flight.
    pub is_loading: bool,
    pub products: Vec<Product>,
    #[serde(skip)]
    in_flight: usize,
}

impl CatalogState {
    pub(super) const fn begin(&mut self) {
        self.in_flight += 1;
        self.is_loading = true;
    }

    pub(super) const fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_loading = self.in_flight > 0;
    }
}
