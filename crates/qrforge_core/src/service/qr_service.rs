//! QR generation and viewing use-cases.
//!
//! # Responsibility
//! - Build payload, render and compress the image, persist metadata and
//!   count the generation in daily statistics.
//! - Serve stored codes to scanners while honoring expiry and password.
//!
//! # Invariants
//! - A QR row is only written after rendering succeeded.
//! - Stored `data` never contains the plaintext password.
//! - Views are counted only for successful (unexpired, authorized) reads.

use crate::auth::{hash_password, verify_password, PasswordHashError};
use crate::model::qr_code::{NewQrCode, QrCodeId, QrType};
use crate::model::user::UserId;
use crate::qr::render::MAX_IMAGE_PX;
use crate::qr::{
    build_payload, compress_image, encode_png, png_data_url, render_qr, GenerateRequest, QrError,
    QrStyle,
};
use crate::repo::qr_repo::QrCodeRepository;
use crate::repo::stats_repo::StatisticsRepository;
use crate::repo::RepoError;
use crate::service::stats_service::StatisticsService;
use crate::timestamp::{now_epoch_ms, parse_iso8601};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for QR use-cases.
#[derive(Debug)]
pub enum QrServiceError {
    Qr(QrError),
    /// `expiry_date` is not an ISO-8601 date or date-time.
    InvalidExpiry(String),
    Json(serde_json::Error),
    Hashing(PasswordHashError),
    NotFound(QrCodeId),
    Expired(QrCodeId),
    /// Password missing or wrong for a protected code.
    PasswordMismatch(QrCodeId),
    Repo(RepoError),
}

impl Display for QrServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Qr(err) => write!(f, "{err}"),
            Self::InvalidExpiry(value) => write!(f, "invalid expiry_date `{value}`"),
            Self::Json(err) => write!(f, "qr data serialization failed: {err}"),
            Self::Hashing(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "qr code not found: {id}"),
            Self::Expired(id) => write!(f, "qr code expired: {id}"),
            Self::PasswordMismatch(id) => write!(f, "qr code password mismatch: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QrServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Qr(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Hashing(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QrError> for QrServiceError {
    fn from(value: QrError) -> Self {
        Self::Qr(value)
    }
}

impl From<serde_json::Error> for QrServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<PasswordHashError> for QrServiceError {
    fn from(value: PasswordHashError) -> Self {
        Self::Hashing(value)
    }
}

impl From<RepoError> for QrServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_, id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQr {
    pub qr_id: QrCodeId,
    pub kind: QrType,
    pub png: Vec<u8>,
    /// `data:image/png;base64,...`
    pub data_url: String,
}

/// Scanner-facing projection of a stored code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrView {
    pub id: QrCodeId,
    pub kind: QrType,
    pub payload: String,
    pub views: i64,
}

/// QR service facade over QR and statistics repositories.
pub struct QrService<Q: QrCodeRepository, S: StatisticsRepository> {
    codes: Q,
    stats: StatisticsService<S>,
}

impl<Q: QrCodeRepository, S: StatisticsRepository> QrService<Q, S> {
    pub fn new(codes: Q, stats: S) -> Self {
        Self {
            codes,
            stats: StatisticsService::new(stats),
        }
    }

    /// Generates, persists and counts a QR code owned by `user_id`.
    pub fn generate(
        &self,
        user_id: UserId,
        request: &GenerateRequest,
    ) -> Result<GeneratedQr, QrServiceError> {
        let payload = build_payload(request)?;
        let style = QrStyle::from_colors(&request.fill_color, &request.back_color)?;
        let expiry_date = parse_expiry(request.expiry_date.as_deref())?;

        let image = compress_image(render_qr(&payload, &style)?, MAX_IMAGE_PX);
        let png = encode_png(&image)?;

        let password_hash = request.effective_password().map(hash_password).transpose()?;
        let created_at = now_epoch_ms();
        let qr_id = self.codes.create_qr_code(&NewQrCode {
            kind: request.kind,
            data: serde_json::to_string(request)?,
            user_id,
            password_hash,
            expiry_date,
            created_at,
        })?;
        self.stats.record_generation(created_at)?;

        info!(
            "event=qr_generate module=service status=ok qr_id={qr_id} user_id={user_id} type={} width={} protected={}",
            request.kind.as_str(),
            image.width(),
            request.effective_password().is_some()
        );

        Ok(GeneratedQr {
            qr_id,
            kind: request.kind,
            data_url: png_data_url(&png),
            png,
        })
    }

    /// Reads a stored code for a scanner, counting the view.
    pub fn view(&self, id: QrCodeId, password: Option<&str>) -> Result<QrView, QrServiceError> {
        self.view_at(id, password, now_epoch_ms())
    }

    /// Same as [`QrService::view`] with an explicit clock.
    pub fn view_at(
        &self,
        id: QrCodeId,
        password: Option<&str>,
        now_ms: i64,
    ) -> Result<QrView, QrServiceError> {
        let code = self
            .codes
            .get_qr_code(id)?
            .ok_or(QrServiceError::NotFound(id))?;

        if code.is_expired_at(now_ms) {
            info!("event=qr_view module=service status=rejected reason=expired qr_id={id}");
            return Err(QrServiceError::Expired(id));
        }

        if let Some(hash) = code.password_hash.as_deref() {
            let authorized = match password {
                Some(candidate) => verify_password(candidate, hash)?,
                None => false,
            };
            if !authorized {
                warn!("event=qr_view module=service status=rejected reason=password qr_id={id}");
                return Err(QrServiceError::PasswordMismatch(id));
            }
        }

        let request: GenerateRequest = serde_json::from_str(&code.data)?;
        let payload = build_payload(&request)?;
        let views = self.codes.increment_views(id)?;
        self.stats.record_view(now_ms)?;

        Ok(QrView {
            id,
            kind: code.kind,
            payload,
            views,
        })
    }
}

fn parse_expiry(raw: Option<&str>) -> Result<Option<i64>, QrServiceError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_iso8601(value)
            .map(Some)
            .ok_or_else(|| QrServiceError::InvalidExpiry(value.to_string())),
        None => Ok(None),
    }
}
