//! Client context extractor.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::context::ClientContext;
use crate::error::AppError;
use crate::models::session::keys;
use crate::state::AppState;

/// The client context of the requesting browser session.
///
/// The context id is stored in the session on first use; a session whose
/// context has expired gets a fresh context under the same id.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Client(ctx): Client) -> impl IntoResponse {
///     ctx.navbar(None)
/// }
/// ```
pub struct Client(pub Arc<ClientContext>);

impl FromRequestParts<AppState> for Client {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = if let Some(id) = session.get::<Uuid>(keys::CLIENT_CONTEXT).await? {
            id
        } else {
            let id = Uuid::new_v4();
            session.insert(keys::CLIENT_CONTEXT, id).await?;
            id
        };

        let context = state
            .contexts()
            .get_or_create(id)
            .await
            .map_err(|e| AppError::Context(e.to_string()))?;

        tracing::Span::current().record("client_context", tracing::field::display(id));
        Ok(Self(context))
    }
}
