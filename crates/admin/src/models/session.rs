//! Session-stored values.

/// Session keys for admin browser sessions.
pub mod keys {
    /// Key for the id of the session's client context.
    pub const CLIENT_CONTEXT: &str = "client_context";
}
