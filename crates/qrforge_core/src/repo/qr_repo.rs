//! QR code repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist QR metadata rows produced by generation requests.
//! - Keep view counters and the favorite flag in sync with use-cases.
//!
//! # Invariants
//! - Read paths reject unknown `type` labels instead of masking them.
//! - User listings are ordered by `id ASC` (creation order).

use crate::model::qr_code::{NewQrCode, QrCode, QrCodeId, QrType};
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use crate::repo::{ensure_tables, int_to_bool, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const QR_SELECT_SQL: &str = "SELECT
    id,
    type,
    data,
    created_at,
    user_id,
    is_favorite,
    password_hash,
    expiry_date,
    views
FROM qr_codes";

/// Repository interface for QR code rows.
pub trait QrCodeRepository {
    fn create_qr_code(&self, qr_code: &NewQrCode) -> RepoResult<QrCodeId>;
    fn get_qr_code(&self, id: QrCodeId) -> RepoResult<Option<QrCode>>;
    fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<QrCode>>;
    /// Adds one view and returns the new counter value.
    fn increment_views(&self, id: QrCodeId) -> RepoResult<i64>;
    fn set_favorite_flag(&self, id: QrCodeId, is_favorite: bool) -> RepoResult<()>;
}

/// SQLite-backed QR code repository.
pub struct SqliteQrCodeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQrCodeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["qr_codes", "users"])?;
        Ok(Self { conn })
    }
}

impl QrCodeRepository for SqliteQrCodeRepository<'_> {
    fn create_qr_code(&self, qr_code: &NewQrCode) -> RepoResult<QrCodeId> {
        if qr_code.data.trim().is_empty() {
            return Err(ValidationError::EmptyField("data").into());
        }

        self.conn.execute(
            "INSERT INTO qr_codes (
                type,
                data,
                created_at,
                user_id,
                is_favorite,
                password_hash,
                expiry_date,
                views
            ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, 0);",
            params![
                qr_code.kind.as_str(),
                qr_code.data.as_str(),
                qr_code.created_at,
                qr_code.user_id,
                qr_code.password_hash.as_deref(),
                qr_code.expiry_date,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_qr_code(&self, id: QrCodeId) -> RepoResult<Option<QrCode>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_qr_row(row)?));
        }
        Ok(None)
    }

    fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<QrCode>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QR_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"))?;
        let mut rows = stmt.query([user_id])?;
        let mut codes = Vec::new();
        while let Some(row) = rows.next()? {
            codes.push(parse_qr_row(row)?);
        }
        Ok(codes)
    }

    fn increment_views(&self, id: QrCodeId) -> RepoResult<i64> {
        let views = self
            .conn
            .query_row(
                "UPDATE qr_codes SET views = views + 1 WHERE id = ?1 RETURNING views;",
                [id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        views.ok_or(RepoError::NotFound("qr code", id))
    }

    fn set_favorite_flag(&self, id: QrCodeId, is_favorite: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE qr_codes SET is_favorite = ?2 WHERE id = ?1;",
            params![id, i64::from(is_favorite)],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound("qr code", id));
        }
        Ok(())
    }
}

fn parse_qr_row(row: &Row<'_>) -> RepoResult<QrCode> {
    let type_text: String = row.get("type")?;
    let kind = QrType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid qr type `{type_text}` in qr_codes.type"))
    })?;

    Ok(QrCode {
        id: row.get("id")?,
        kind,
        data: row.get("data")?,
        created_at: row.get("created_at")?,
        user_id: row.get("user_id")?,
        is_favorite: int_to_bool(row.get("is_favorite")?, "qr_codes.is_favorite")?,
        password_hash: row.get("password_hash")?,
        expiry_date: row.get("expiry_date")?,
        views: row.get("views")?,
    })
}
