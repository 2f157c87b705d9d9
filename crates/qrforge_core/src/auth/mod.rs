//! Credential primitives: password hashing and session tokens.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod password;

pub use password::{hash_password, verify_password};

/// Failure inside the password hashing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashError(pub String);

impl Display for PasswordHashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password hashing failed: {}", self.0)
    }
}

impl Error for PasswordHashError {}

/// Generates a fresh opaque session token.
pub fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::new_session_token;

    #[test]
    fn session_tokens_are_unique_hex() {
        let first = new_session_token();
        let second = new_session_token();
        assert_ne!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
