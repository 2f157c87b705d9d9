//! Login session persistence.
//!
//! A session is an opaque random token mapped to a user id. Tokens are
//! created on login and removed on logout or once older than
//! [`SESSION_MAX_AGE_MS`].

use crate::model::user::UserId;
use crate::repo::{ensure_tables, RepoResult};
use crate::timestamp::now_epoch_ms;
use rusqlite::{params, Connection, OptionalExtension};

/// Sessions older than this no longer resolve (7 days).
pub const SESSION_MAX_AGE_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Repository interface for session tokens.
pub trait SessionRepository {
    fn create_session(&self, token: &str, user_id: UserId) -> RepoResult<()>;
    /// Returns the owner of `token`, if the session is still active.
    fn resolve_session(&self, token: &str) -> RepoResult<Option<UserId>>;
    /// Returns `true` when a session row was removed.
    fn delete_session(&self, token: &str) -> RepoResult<bool>;
    /// Deletes sessions created before `cutoff_ms`; returns how many.
    fn prune_sessions(&self, cutoff_ms: i64) -> RepoResult<usize>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["sessions", "users"])?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn create_session(&self, token: &str, user_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3);",
            params![token, user_id, now_epoch_ms()],
        )?;
        Ok(())
    }

    fn resolve_session(&self, token: &str) -> RepoResult<Option<UserId>> {
        let user_id = self
            .conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token = ?1 AND created_at >= ?2;",
                params![token, now_epoch_ms() - SESSION_MAX_AGE_MS],
                |row| row.get::<_, UserId>(0),
            )
            .optional()?;
        Ok(user_id)
    }

    fn delete_session(&self, token: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1;", [token])?;
        Ok(changed > 0)
    }

    fn prune_sessions(&self, cutoff_ms: i64) -> RepoResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM sessions WHERE created_at < ?1;", [cutoff_ms])?)
    }
}
