//! Named application paths.

use serde::Serialize;

/// Pages of the admin that components may link or navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    Home,
    Login,
    Register,
    Create,
    About,
    Products,
}

impl Route {
    /// Every route, in navigation order.
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::About,
        Self::Products,
        Self::Create,
        Self::Login,
        Self::Register,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Create => "/create",
            Self::About => "/about",
            Self::Products => "/products",
        }
    }

    /// Resolve a request path to a route.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
