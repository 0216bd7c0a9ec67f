//! On-change field validation.
//!
//! `POST /forms/{form}/field` with `{"field": "email", "value": "..."}`
//! marks the field touched, re-validates the form and answers with the
//! messages of every touched field.

use axum::{Json, Router, extract::Path, routing::post};
use serde::{Deserialize, Serialize};
use storefront_admin_core::FieldErrors;

use crate::error::AppError;
use crate::forms::{CreateProductForm, FormKind, LoginForm, RegisterForm};
use crate::middleware::Client;
use crate::state::AppState;

/// A single field change.
#[derive(Debug, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Validation state after the change.
#[derive(Debug, Serialize)]
pub struct FieldValidation {
    pub valid: bool,
    pub errors: FieldErrors,
}

/// Build the forms router.
pub fn router() -> Router<AppState> {
    Router::new().route("/forms/{form}/field", post(change_field))
}

/// POST /forms/{form}/field
async fn change_field(
    Client(ctx): Client,
    Path(form): Path<String>,
    Json(change): Json<FieldChange>,
) -> Result<Json<FieldValidation>, AppError> {
    let name = form.as_str();
    let changed = if name == LoginForm::NAME {
        ctx.login.change(&change.field, &change.value)
    } else if name == RegisterForm::NAME {
        ctx.register.change(&change.field, &change.value)
    } else if name == CreateProductForm::NAME {
        ctx.create_product.change(&change.field, &change.value)
    } else {
        return Err(AppError::NotFound(format!("form '{form}'")));
    };
    let errors = changed
        .ok_or_else(|| AppError::BadRequest(format!("unknown field '{}'", change.field)))?;

    Ok(Json(FieldValidation {
        valid: errors.is_empty(),
        errors,
    }))
}
