//! Authentication route handlers for admin.
//!
//! Login and registration forms post back to themselves. On success the
//! browser is redirected to the form's target page, where the toast shows.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use storefront_admin_core::validation::{LoginFields, RegistrationFields};
use tracing::instrument;

use super::Layout;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{AfterSuccess, FormView, SubmitOutcome};
use crate::middleware::Client;
use crate::models::Route;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub form: FormView<LoginFields>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub form: FormView<RegistrationFields>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", post(logout))
}

/// GET /login
async fn login_page(Client(ctx): Client) -> LoginTemplate {
    LoginTemplate {
        form: ctx.login.snapshot(),
        layout: Layout::new(&ctx, Some(Route::Login), "Log in"),
    }
}

/// POST /login
#[instrument(skip_all)]
async fn login(Client(ctx): Client, Form(fields): Form<LoginFields>) -> Response {
    let outcome = ctx.login.submit(fields).await;

    if let Some(user) = ctx.store().auth().userinfo
        && matches!(outcome, SubmitOutcome::Succeeded(_))
    {
        set_sentry_user(&user.email);
    }

    match outcome {
        SubmitOutcome::Succeeded(AfterSuccess::Navigate(route)) => {
            Redirect::to(route.path()).into_response()
        }
        _ => LoginTemplate {
            form: ctx.login.snapshot(),
            layout: Layout::new(&ctx, Some(Route::Login), "Log in"),
        }
        .into_response(),
    }
}

/// GET /register
async fn register_page(Client(ctx): Client) -> RegisterTemplate {
    RegisterTemplate {
        form: ctx.register.snapshot(),
        layout: Layout::new(&ctx, Some(Route::Register), "Sign up"),
    }
}

/// POST /register
#[instrument(skip_all)]
async fn register(Client(ctx): Client, Form(fields): Form<RegistrationFields>) -> Response {
    match ctx.register.submit(fields).await {
        SubmitOutcome::Succeeded(AfterSuccess::Navigate(route)) => {
            Redirect::to(route.path()).into_response()
        }
        _ => RegisterTemplate {
            form: ctx.register.snapshot(),
            layout: Layout::new(&ctx, Some(Route::Register), "Sign up"),
        }
        .into_response(),
    }
}

/// POST /logout
///
/// Redirects home either way; the toast reports the outcome.
#[instrument(skip_all)]
async fn logout(Client(ctx): Client) -> Redirect {
    if ctx.logout().await {
        clear_sentry_user();
    }
    Redirect::to(Route::Home.path())
}
