//! Favorite repository contract and SQLite implementation.
//!
//! # Invariants
//! - One row per `(user_id, qr_code_id)` pair; re-adding is a no-op.
//! - Listings are ordered by favorite creation time, then row id.

use crate::model::favorite::FavoriteEntry;
use crate::model::qr_code::{QrCodeId, QrType};
use crate::model::user::UserId;
use crate::repo::{ensure_tables, RepoError, RepoResult};
use crate::timestamp::now_epoch_ms;
use rusqlite::{params, Connection};

/// Repository interface for favorite links.
pub trait FavoriteRepository {
    /// Returns `true` when a new row was inserted, `false` when the pair
    /// already existed.
    fn add_favorite(&self, user_id: UserId, qr_code_id: QrCodeId) -> RepoResult<bool>;
    /// Returns `true` when a row was removed.
    fn remove_favorite(&self, user_id: UserId, qr_code_id: QrCodeId) -> RepoResult<bool>;
    fn list_favorites(&self, user_id: UserId) -> RepoResult<Vec<FavoriteEntry>>;
}

/// SQLite-backed favorite repository.
pub struct SqliteFavoriteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFavoriteRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["favorites", "qr_codes", "users"])?;
        Ok(Self { conn })
    }
}

impl FavoriteRepository for SqliteFavoriteRepository<'_> {
    fn add_favorite(&self, user_id: UserId, qr_code_id: QrCodeId) -> RepoResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO favorites (user_id, qr_code_id, created_at)
             VALUES (?1, ?2, ?3);",
            params![user_id, qr_code_id, now_epoch_ms()],
        )?;
        Ok(inserted > 0)
    }

    fn remove_favorite(&self, user_id: UserId, qr_code_id: QrCodeId) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND qr_code_id = ?2;",
            params![user_id, qr_code_id],
        )?;
        Ok(removed > 0)
    }

    fn list_favorites(&self, user_id: UserId) -> RepoResult<Vec<FavoriteEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT q.id, q.type, q.created_at
             FROM favorites f
             JOIN qr_codes q ON q.id = f.qr_code_id
             WHERE f.user_id = ?1
             ORDER BY f.created_at ASC, f.id ASC;",
        )?;
        let mut rows = stmt.query([user_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let type_text: String = row.get(1)?;
            let kind = QrType::parse(&type_text).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid qr type `{type_text}` in qr_codes.type"))
            })?;
            entries.push(FavoriteEntry {
                qr_code_id: row.get(0)?,
                kind,
                created_at: row.get(2)?,
            });
        }
        Ok(entries)
    }
}
