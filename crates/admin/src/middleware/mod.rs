//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers
//! 4. Session layer (tower-sessions with the in-memory store)
//!
//! Handlers reach their session's client context through the [`Client`]
//! extractor.

pub mod context;
pub mod security_headers;
pub mod session;

pub use context::Client;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
