//! Favorites use-cases.
//!
//! # Invariants
//! - Users can only favorite QR codes they own.
//! - `qr_codes.is_favorite` mirrors whether the owner has a favorite row.

use crate::model::favorite::FavoriteEntry;
use crate::model::qr_code::QrCodeId;
use crate::model::user::UserId;
use crate::repo::favorite_repo::FavoriteRepository;
use crate::repo::qr_repo::QrCodeRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for favorite use-cases.
#[derive(Debug)]
pub enum FavoriteError {
    /// QR code does not exist or belongs to another user.
    QrCodeNotFound(QrCodeId),
    /// Remove requested for a code that is not a favorite.
    NotFavorite(QrCodeId),
    Repo(RepoError),
}

impl Display for FavoriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QrCodeNotFound(id) => write!(f, "qr code not found: {id}"),
            Self::NotFavorite(id) => write!(f, "qr code {id} is not a favorite"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FavoriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for FavoriteError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_, id) => Self::QrCodeNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Favorite service facade.
pub struct FavoriteService<F: FavoriteRepository, Q: QrCodeRepository> {
    favorites: F,
    codes: Q,
}

impl<F: FavoriteRepository, Q: QrCodeRepository> FavoriteService<F, Q> {
    pub fn new(favorites: F, codes: Q) -> Self {
        Self { favorites, codes }
    }

    pub fn list(&self, user_id: UserId) -> Result<Vec<FavoriteEntry>, FavoriteError> {
        Ok(self.favorites.list_favorites(user_id)?)
    }

    /// Marks an owned QR code as favorite. Re-adding is a no-op.
    pub fn add(&self, user_id: UserId, qr_code_id: QrCodeId) -> Result<(), FavoriteError> {
        self.require_owned(user_id, qr_code_id)?;
        let inserted = self.favorites.add_favorite(user_id, qr_code_id)?;
        self.codes.set_favorite_flag(qr_code_id, true)?;
        info!(
            "event=favorite_add module=service status=ok user_id={user_id} qr_id={qr_code_id} inserted={inserted}"
        );
        Ok(())
    }

    pub fn remove(&self, user_id: UserId, qr_code_id: QrCodeId) -> Result<(), FavoriteError> {
        self.require_owned(user_id, qr_code_id)?;
        if !self.favorites.remove_favorite(user_id, qr_code_id)? {
            return Err(FavoriteError::NotFavorite(qr_code_id));
        }
        self.codes.set_favorite_flag(qr_code_id, false)?;
        info!("event=favorite_remove module=service status=ok user_id={user_id} qr_id={qr_code_id}");
        Ok(())
    }

    fn require_owned(&self, user_id: UserId, qr_code_id: QrCodeId) -> Result<(), FavoriteError> {
        match self.codes.get_qr_code(qr_code_id)? {
            Some(code) if code.user_id == user_id => Ok(()),
            _ => Err(FavoriteError::QrCodeNotFound(qr_code_id)),
        }
    }
}
