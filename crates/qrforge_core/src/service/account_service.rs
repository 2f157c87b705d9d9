//! Registration, login and session use-cases.
//!
//! # Invariants
//! - Usernames and emails are unique across accounts.
//! - Plaintext passwords never leave this module; only Argon2 hashes are
//!   persisted.
//! - Login failures do not reveal whether the username exists.

use crate::auth::{hash_password, new_session_token, verify_password, PasswordHashError};
use crate::model::user::{NewUser, User, UserId};
use crate::model::validation::ValidationError;
use crate::repo::session_repo::{SessionRepository, SESSION_MAX_AGE_MS};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::timestamp::now_epoch_ms;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for account use-cases.
#[derive(Debug)]
pub enum AccountError {
    Validation(ValidationError),
    UsernameTaken,
    EmailTaken,
    InvalidCredentials,
    Hashing(PasswordHashError),
    Repo(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UsernameTaken => write!(f, "username already exists"),
            Self::EmailTaken => write!(f, "email already registered"),
            Self::InvalidCredentials => write!(f, "invalid login credentials"),
            Self::Hashing(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Hashing(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Conflict(_) => Self::UsernameTaken,
            other => Self::Repo(other),
        }
    }
}

impl From<PasswordHashError> for AccountError {
    fn from(value: PasswordHashError) -> Self {
        Self::Hashing(value)
    }
}

/// Active login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
}

/// Account service facade over user and session repositories.
pub struct AccountService<U: UserRepository, S: SessionRepository> {
    users: U,
    sessions: S,
}

impl<U: UserRepository, S: SessionRepository> AccountService<U, S> {
    pub fn new(users: U, sessions: S) -> Self {
        Self { users, sessions }
    }

    /// Creates an account after uniqueness checks.
    pub fn register(&self, new_user: &NewUser) -> Result<UserId, AccountError> {
        new_user.validate().map_err(AccountError::Validation)?;

        if self.users.username_exists(&new_user.username)? {
            info!("event=user_register module=service status=rejected reason=username_taken");
            return Err(AccountError::UsernameTaken);
        }
        if self.users.email_exists(&new_user.email)? {
            info!("event=user_register module=service status=rejected reason=email_taken");
            return Err(AccountError::EmailTaken);
        }

        let password_hash = hash_password(&new_user.password)?;
        let user_id = self.users.create_user(new_user, &password_hash)?;
        info!("event=user_register module=service status=ok user_id={user_id}");
        Ok(user_id)
    }

    /// Verifies credentials and opens a new session.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AccountError> {
        let Some(user) = self.users.find_by_username(username)? else {
            warn!("event=user_login module=service status=rejected reason=unknown_user");
            return Err(AccountError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(
                "event=user_login module=service status=rejected reason=bad_password user_id={}",
                user.id
            );
            return Err(AccountError::InvalidCredentials);
        }

        let pruned = self
            .sessions
            .prune_sessions(now_epoch_ms() - SESSION_MAX_AGE_MS)?;
        let token = new_session_token();
        self.sessions.create_session(&token, user.id)?;
        info!(
            "event=user_login module=service status=ok user_id={} pruned_sessions={pruned}",
            user.id
        );
        Ok(Session {
            token,
            user_id: user.id,
        })
    }

    /// Closes a session. Returns `false` when the token was already unknown.
    pub fn logout(&self, token: &str) -> Result<bool, AccountError> {
        let removed = self.sessions.delete_session(token)?;
        info!("event=user_logout module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Resolves the user owning `token`.
    pub fn current_user(&self, token: &str) -> Result<Option<User>, AccountError> {
        match self.sessions.resolve_session(token)? {
            Some(user_id) => Ok(self.users.get_user(user_id)?),
            None => Ok(None),
        }
    }
}
