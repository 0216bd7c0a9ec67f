//! Session-aware navigation bar.

use std::sync::Arc;

use storefront_admin_core::UserInfo;
use tracing::instrument;

use crate::models::Route;
use crate::notify::{Notifier, Toast};
use crate::store::{AuthState, Action, Dispatcher};

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
    pub active: bool,
}

impl NavLink {
    fn new(label: &'static str, route: Route, current: Option<Route>) -> Self {
        Self {
            label,
            route,
            active: current == Some(route),
        }
    }

    #[must_use]
    pub const fn href(&self) -> &'static str {
        self.route.path()
    }
}

/// Everything the navigation bar renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    pub links: Vec<NavLink>,
    /// Account links (create product when signed in, log in and sign up when not).
    pub account_links: Vec<NavLink>,
    pub user: Option<UserInfo>,
    pub is_logged_in: bool,
}

impl NavBar {
    /// Build the bar from the auth slice. `current` highlights the active page.
    #[must_use]
    pub fn for_session(auth: &AuthState, current: Option<Route>) -> Self {
        let links = vec![
            NavLink::new("Home", Route::Home, current),
            NavLink::new("About", Route::About, current),
            NavLink::new("Products", Route::Products, current),
        ];

        let account_links = if auth.is_logged_in {
            vec![NavLink::new("Create product", Route::Create, current)]
        } else {
            vec![
                NavLink::new("Log in", Route::Login, current),
                NavLink::new("Sign up", Route::Register, current),
            ]
        };

        Self {
            links,
            account_links,
            user: auth.userinfo.clone().filter(|_| auth.is_logged_in),
            is_logged_in: auth.is_logged_in,
        }
    }

    /// Avatar text for the signed-in user.
    #[must_use]
    pub fn initials(&self) -> String {
        self.user.as_ref().map(UserInfo::initials).unwrap_or_default()
    }
}

/// Dispatch a logout and report it. Returns whether it succeeded.
#[instrument(skip_all)]
pub async fn logout(dispatcher: &Arc<dyn Dispatcher>, notifier: &Arc<dyn Notifier>) -> bool {
    match dispatcher.dispatch(Action::Logout).await {
        Ok(_) => {
            notifier.notify(Toast::success("Logged out successfully"));
            true
        }
        Err(e) => {
            notifier.notify(Toast::error(e.reason));
            false
        }
    }
}
