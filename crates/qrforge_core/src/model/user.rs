//! User account model.
//!
//! # Invariants
//! - `username` is unique, trimmed and at most 80 characters.
//! - `email` is unique and at most 120 characters.
//! - `password_hash` is always a PHC string, never plaintext.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

pub type UserId = i64;

pub const USERNAME_MAX_CHARS: usize = 80;
pub const EMAIL_MAX_CHARS: usize = 120;

/// Persisted account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Registration input, as received from the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks field presence and widths.
    ///
    /// Uniqueness is checked against storage by the account service.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::EmptyField("username"));
        }
        if username.chars().count() > USERNAME_MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: "username",
                max: USERNAME_MAX_CHARS,
            });
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmptyField("email"));
        }
        if email.chars().count() > EMAIL_MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: "email",
                max: EMAIL_MAX_CHARS,
            });
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(ValidationError::InvalidEmail(email.to_string())),
        }

        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("password"));
        }

        Ok(())
    }
}
