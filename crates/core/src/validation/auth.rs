//! Login and registration schemas.
//!
//! The minimum password length differs between the two forms (8 to sign in,
//! 6 to sign up). Both limits are kept as the backend accepts them.

use core::fmt;

use serde::Deserialize;

use super::{FieldErrors, FieldInput, Schema, required};
use crate::types::{Credentials, Email, RegistrationInput};

/// Minimum password length accepted by the login form.
pub const LOGIN_PASSWORD_MIN: usize = 8;
/// Minimum password length accepted by the registration form.
pub const REGISTER_PASSWORD_MIN: usize = 6;

/// Raw login form fields.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginFields {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginFields")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl FieldInput for LoginFields {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    fn set_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "email" => self.email = value.to_string(),
            "password" => self.password = value.to_string(),
            _ => return false,
        }
        true
    }
}

/// Validates [`LoginFields`] into [`Credentials`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginSchema;

impl Schema for LoginSchema {
    type Input = LoginFields;
    type Output = Credentials;

    fn validate(&self, input: &LoginFields) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = Email::parse(input.email.trim())
            .map_err(|_| errors.insert("email", "Please enter a valid email address."))
            .ok();

        if input.password.chars().count() < LOGIN_PASSWORD_MIN {
            errors.insert(
                "password",
                "Password must be at least 8 characters long.",
            );
        }

        match email {
            Some(email) if errors.is_empty() => Ok(Credentials {
                email,
                password: input.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Raw registration form fields.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for RegistrationFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationFields")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl FieldInput for RegistrationFields {
    const FIELDS: &'static [&'static str] = &["name", "email", "password"];

    fn set_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "name" => self.name = value.to_string(),
            "email" => self.email = value.to_string(),
            "password" => self.password = value.to_string(),
            _ => return false,
        }
        true
    }
}

/// Validates [`RegistrationFields`] into [`RegistrationInput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationSchema;

impl Schema for RegistrationSchema {
    type Input = RegistrationFields;
    type Output = RegistrationInput;

    fn validate(&self, input: &RegistrationFields) -> Result<RegistrationInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &input.name, "Name is required");

        let email = Email::parse(input.email.trim())
            .map_err(|_| errors.insert("email", "Invalid email address"))
            .ok();

        if input.password.chars().count() < REGISTER_PASSWORD_MIN {
            errors.insert("password", "Password must be at least 6 characters");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(RegistrationInput {
                name,
                email,
                password: input.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginFields {
        LoginFields {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn registration(name: &str, email: &str, password: &str) -> RegistrationFields {
        RegistrationFields {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_valid() {
        let creds = LoginSchema
            .validate(&login(" a@b.com ", "password1"))
            .unwrap();
        assert_eq!(creds.email.as_str(), "a@b.com");
        assert_eq!(creds.password, "password1");
    }

    #[test]
    fn test_login_rejects_every_short_password() {
        for len in 0..LOGIN_PASSWORD_MIN {
            let errors = LoginSchema
                .validate(&login("a@b.com", &"x".repeat(len)))
                .unwrap_err();
            assert_eq!(
                errors.get("password"),
                Some("Password must be at least 8 characters long.")
            );
        }
    }

    #[test]
    fn test_login_reports_both_fields() {
        let errors = LoginSchema.validate(&login("nope", "short")).unwrap_err();
        assert_eq!(
            errors.get("email"),
            Some("Please enter a valid email address.")
        );
        assert!(errors.contains("password"));
    }

    #[test]
    fn test_register_accepts_six_character_password() {
        let input = RegistrationSchema
            .validate(&registration("Ada", "ada@example.com", "sixsix"))
            .unwrap();
        assert_eq!(input.name, "Ada");
    }

    #[test]
    fn test_register_rejects_every_short_password() {
        for len in 0..REGISTER_PASSWORD_MIN {
            let errors = RegistrationSchema
                .validate(&registration("Ada", "ada@example.com", &"x".repeat(len)))
                .unwrap_err();
            assert_eq!(
                errors.get("password"),
                Some("Password must be at least 6 characters")
            );
        }
    }

    #[test]
    fn test_register_requires_name_and_email() {
        let errors = RegistrationSchema
            .validate(&registration("   ", "bad", "longenough"))
            .unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
    }

    #[test]
    fn test_set_field() {
        let mut fields = LoginFields::default();
        assert!(fields.set_field("email", "a@b.com"));
        assert!(!fields.set_field("nickname", "x"));
        assert_eq!(fields.email, "a@b.com");
    }

    #[test]
    fn test_debug_redacts_password() {
        let output = format!("{:?}", login("a@b.com", "hunter22"));
        assert!(!output.contains("hunter22"));
    }
}
