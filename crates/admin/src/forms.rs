//! Interactive forms.
//!
//! A [`FormController`] binds a validation schema to a set of fields and
//! runs the submit cycle:
//!
//! ```text
//! Idle -> Validating -> Submitting -> Succeeded | Failed -> Idle
//! ```
//!
//! Validation failures stop before dispatch. While a submission is in flight
//! further submits are refused. The outcome is reported as a toast and the
//! form either navigates away or resets, depending on its [`FormKind`].

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use storefront_admin_core::validation::{
    LoginFields, LoginSchema, ProductFields, ProductSchema, RegistrationFields,
    RegistrationSchema,
};
use storefront_admin_core::{FieldErrors, FieldInput, Schema};
use tracing::instrument;

use crate::models::Route;
use crate::notify::{Notifier, Toast};
use crate::store::{Action, Dispatcher};

/// Where a form is in its submit cycle.
///
/// `Succeeded` and `Failed` are settled phases: they accept the next submit
/// exactly like `Idle` and only record how the last attempt ended. A
/// submission abandoned while `Submitting` returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl FormPhase {
    #[must_use]
    pub const fn is_submitting(self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// What a form does after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSuccess {
    Navigate(Route),
    Reset,
}

/// Result of [`FormController::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was dispatched.
    Invalid(FieldErrors),
    /// A submission was already in flight; nothing was dispatched.
    Busy,
    Succeeded(AfterSuccess),
    /// The action was rejected with this reason.
    Failed(String),
}

/// One kind of form: its fields, schema, action and outcome handling.
pub trait FormKind: Send + Sync + 'static {
    type Fields: FieldInput + Send + Sync;
    type Schema: Schema<Input = Self::Fields> + Default + Send + Sync;

    /// Identifier used in URLs and logs.
    const NAME: &'static str;
    const AFTER_SUCCESS: AfterSuccess;

    /// The action to dispatch for a validated value.
    fn action(value: <Self::Schema as Schema>::Output) -> Action;

    fn success_toast() -> Toast;

    fn failure_toast(reason: &str) -> Toast {
        Toast::error(reason)
    }

    /// Adjust raw fields before validation.
    fn normalize(_fields: &mut Self::Fields) {}
}

/// Login form.
pub struct LoginForm;

impl FormKind for LoginForm {
    type Fields = LoginFields;
    type Schema = LoginSchema;

    const NAME: &'static str = "login";
    const AFTER_SUCCESS: AfterSuccess = AfterSuccess::Navigate(Route::Home);

    fn action(value: storefront_admin_core::Credentials) -> Action {
        Action::Login(value)
    }

    fn success_toast() -> Toast {
        Toast::success("Logged in successfully")
    }
}

/// Registration form.
pub struct RegisterForm;

impl FormKind for RegisterForm {
    type Fields = RegistrationFields;
    type Schema = RegistrationSchema;

    const NAME: &'static str = "register";
    const AFTER_SUCCESS: AfterSuccess = AfterSuccess::Navigate(Route::Home);

    fn action(value: storefront_admin_core::RegistrationInput) -> Action {
        Action::Register(value)
    }

    fn success_toast() -> Toast {
        Toast::success("Your account has been created successfully")
    }
}

/// Create product form. The rating input is a slider clamped to `[0, 5]`.
pub struct CreateProductForm;

impl FormKind for CreateProductForm {
    type Fields = ProductFields;
    type Schema = ProductSchema;

    const NAME: &'static str = "create";
    const AFTER_SUCCESS: AfterSuccess = AfterSuccess::Reset;

    fn action(value: storefront_admin_core::NewProduct) -> Action {
        Action::CreateProduct(value)
    }

    fn success_toast() -> Toast {
        Toast::success("Product Created")
            .with_description("Your product has been successfully created.")
    }

    fn failure_toast(reason: &str) -> Toast {
        Toast::error("Error").with_description(reason)
    }

    fn normalize(fields: &mut ProductFields) {
        fields.clamp_rating();
    }
}

/// Renderable state of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView<F> {
    pub fields: F,
    pub errors: FieldErrors,
    pub phase: FormPhase,
}

struct FormInner<F> {
    fields: F,
    errors: FieldErrors,
    touched: BTreeSet<String>,
    phase: FormPhase,
}

impl<F: Default> Default for FormInner<F> {
    fn default() -> Self {
        Self {
            fields: F::default(),
            errors: FieldErrors::new(),
            touched: BTreeSet::new(),
            phase: FormPhase::Idle,
        }
    }
}

/// Returns an abandoned submission to `Idle`.
struct InFlight<'a, F> {
    inner: &'a Mutex<FormInner<F>>,
    settled: bool,
}

impl<F> Drop for InFlight<'_, F> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("Submission dropped before the action resolved");
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.phase = FormPhase::Idle;
        }
    }
}

/// A form instance bound to a dispatcher and a notifier.
pub struct FormController<K: FormKind> {
    dispatcher: Arc<dyn Dispatcher>,
    notifier: Arc<dyn Notifier>,
    schema: K::Schema,
    inner: Mutex<FormInner<K::Fields>>,
}

impl<K: FormKind> FormController<K> {
    #[must_use]
    pub fn new(dispatcher: Arc<dyn Dispatcher>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            dispatcher,
            notifier,
            schema: K::Schema::default(),
            inner: Mutex::new(FormInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormInner<K::Fields>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current fields, errors and phase.
    #[must_use]
    pub fn snapshot(&self) -> FormView<K::Fields> {
        let inner = self.lock();
        FormView {
            fields: inner.fields.clone(),
            errors: inner.errors.clone(),
            phase: inner.phase,
        }
    }

    #[must_use]
    pub fn phase(&self) -> FormPhase {
        self.lock().phase
    }

    /// Set one field, mark it touched and re-validate.
    ///
    /// Returns the errors of touched fields, or `None` for an unknown field.
    pub fn change(&self, field: &str, value: &str) -> Option<FieldErrors> {
        let mut inner = self.lock();
        if !inner.fields.set_field(field, value) {
            return None;
        }
        K::normalize(&mut inner.fields);
        inner.touched.insert(field.to_string());

        let errors = match self.schema.validate(&inner.fields) {
            Ok(_) => FieldErrors::new(),
            Err(errors) => errors.only(&inner.touched),
        };
        inner.errors = errors.clone();
        Some(errors)
    }

    /// Validate `fields` and, when valid, dispatch the form's action.
    #[instrument(skip_all, fields(form = K::NAME))]
    pub async fn submit(&self, mut fields: K::Fields) -> SubmitOutcome {
        let value = {
            let mut inner = self.lock();
            if inner.phase.is_submitting() {
                tracing::debug!("Submit refused while a submission is in flight");
                return SubmitOutcome::Busy;
            }

            inner.phase = FormPhase::Validating;
            K::normalize(&mut fields);
            inner.fields = fields;

            match self.schema.validate(&inner.fields) {
                Ok(value) => {
                    inner.errors = FieldErrors::new();
                    inner.phase = FormPhase::Submitting;
                    value
                }
                Err(errors) => {
                    inner.touched = <K::Fields as FieldInput>::FIELDS
                        .iter()
                        .map(ToString::to_string)
                        .collect();
                    inner.errors = errors.clone();
                    inner.phase = FormPhase::Idle;
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        let mut in_flight = InFlight {
            inner: &self.inner,
            settled: false,
        };
        let result = self.dispatcher.dispatch(K::action(value)).await;
        in_flight.settled = true;

        let mut inner = self.lock();
        match result {
            Ok(_) => {
                self.notifier.notify(K::success_toast());
                // Navigating away leaves a fresh form behind too
                *inner = FormInner::default();
                inner.phase = FormPhase::Succeeded;
                SubmitOutcome::Succeeded(K::AFTER_SUCCESS)
            }
            Err(e) => {
                self.notifier.notify(K::failure_toast(&e.reason));
                inner.phase = FormPhase::Failed;
                SubmitOutcome::Failed(e.reason)
            }
        }
    }
}
