//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `NewUser::validate()` before SQL mutations.
//! - Username/email uniqueness violations surface as `RepoError::Conflict`.

use crate::model::user::{NewUser, User, UserId};
use crate::repo::{ensure_tables, map_unique_violation, RepoResult};
use crate::timestamp::now_epoch_ms;
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, email, password_hash, created_at FROM users";

/// Repository interface for account rows.
pub trait UserRepository {
    /// Inserts a user whose password was already hashed.
    fn create_user(&self, user: &NewUser, password_hash: &str) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn username_exists(&self, username: &str) -> RepoResult<bool>;
    fn email_exists(&self, email: &str) -> RepoResult<bool>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser, password_hash: &str) -> RepoResult<UserId> {
        user.validate()?;

        self.conn
            .execute(
                "INSERT INTO users (username, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    user.username.trim(),
                    user.email.trim(),
                    password_hash,
                    now_epoch_ms(),
                ],
            )
            .map_err(|err| map_unique_violation(err, "user"))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE username = ?1;"),
                [username.trim()],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn username_exists(&self, username: &str) -> RepoResult<bool> {
        exists(self.conn, "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1);", username)
    }

    fn email_exists(&self, email: &str) -> RepoResult<bool> {
        exists(self.conn, "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1);", email)
    }
}

fn exists(conn: &Connection, sql: &str, value: &str) -> RepoResult<bool> {
    let found: i64 = conn.query_row(sql, [value.trim()], |row| row.get(0))?;
    Ok(found == 1)
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}
