//! Shared models for admin.

pub mod route;
pub mod session;

pub use route::Route;
