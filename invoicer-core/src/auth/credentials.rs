//! Submitted credentials and their shape validation

use std::collections::HashMap;
use thiserror::Error;

const MAX_USERNAME_LEN: usize = 254;

/// Username/password pair taken from a login form
///
/// Lives only for the duration of one validation call. `Debug` never prints
/// the password.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Malformed or missing credential fields
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username is missing")]
    MissingUsername,
    #[error("username exceeds 254 characters")]
    UsernameTooLong,
    #[error("password is missing")]
    MissingPassword,
    #[error("password shorter than {0} characters")]
    PasswordTooShort(usize),
}

impl ValidationError {
    /// The one message shown on the login form for any shape problem
    pub fn user_message(&self) -> &'static str {
        "Please enter a valid username and password."
    }
}

impl Credentials {
    /// Validate raw field values
    ///
    /// The username is trimmed; the password is taken verbatim.
    pub fn parse(
        username: Option<&str>,
        password: Option<&str>,
        min_password_length: usize,
    ) -> Result<Self, ValidationError> {
        let username = username.map(str::trim).unwrap_or_default();
        if username.is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(ValidationError::UsernameTooLong);
        }

        let password = password.unwrap_or_default();
        if password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        if password.chars().count() < min_password_length {
            return Err(ValidationError::PasswordTooShort(min_password_length));
        }

        Ok(Self { username: username.to_string(), password: password.to_string() })
    }

    /// Validate the `username` and `password` fields of a decoded form
    pub fn from_form(
        fields: &HashMap<String, String>,
        min_password_length: usize,
    ) -> Result<Self, ValidationError> {
        Self::parse(
            fields.get("username").map(String::as_str),
            fields.get("password").map(String::as_str),
            min_password_length,
        )
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}
