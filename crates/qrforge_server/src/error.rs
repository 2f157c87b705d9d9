//! HTTP error envelope.
//!
//! # Invariants
//! - Every error body is `{"error": "<message>"}`.
//! - 500 responses carry a static message; the cause is only logged.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use qrforge_core::{AccountError, ExportError, FavoriteError, QrServiceError, RepoError};
use serde_json::json;

pub const INTERNAL_ERROR: &str = "Internal server error";
pub const GENERATION_FAILED: &str = "An error occurred while generating the QR code";
pub const LOGIN_REQUIRED: &str = "Login required";

/// Error returned by handlers and extractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Gone(String),
    NotImplemented(String),
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Gone(_) => StatusCode::GONE,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Gone(message)
            | Self::NotImplemented(message) => message.as_str(),
            Self::Internal(message) => *message,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized(LOGIN_REQUIRED.to_string())
    }

    /// Logs `cause` and hides it behind `message`.
    pub fn internal(message: &'static str, cause: &dyn std::fmt::Display) -> Self {
        error!("event=http_error module=server status=error cause=\"{cause}\"");
        Self::Internal(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::internal(INTERNAL_ERROR, &value)
    }
}

impl From<AccountError> for ApiError {
    fn from(value: AccountError) -> Self {
        match value {
            AccountError::Validation(err) => Self::BadRequest(err.to_string()),
            AccountError::UsernameTaken => Self::bad_request("Username already exists"),
            AccountError::EmailTaken => Self::bad_request("Email already registered"),
            AccountError::InvalidCredentials => {
                Self::Unauthorized("Invalid login credentials".to_string())
            }
            other @ (AccountError::Hashing(_) | AccountError::Repo(_)) => {
                Self::internal(INTERNAL_ERROR, &other)
            }
        }
    }
}

impl From<QrServiceError> for ApiError {
    fn from(value: QrServiceError) -> Self {
        match value {
            QrServiceError::Qr(err) if err.is_client_error() => Self::BadRequest(err.to_string()),
            err @ QrServiceError::InvalidExpiry(_) => Self::BadRequest(err.to_string()),
            QrServiceError::NotFound(_) => Self::NotFound("QR code not found".to_string()),
            QrServiceError::Expired(_) => Self::Gone("QR code has expired".to_string()),
            QrServiceError::PasswordMismatch(_) => Self::Forbidden("Invalid password".to_string()),
            other => Self::internal(INTERNAL_ERROR, &other),
        }
    }
}

impl From<FavoriteError> for ApiError {
    fn from(value: FavoriteError) -> Self {
        match value {
            FavoriteError::QrCodeNotFound(_) => Self::NotFound("QR code not found".to_string()),
            FavoriteError::NotFavorite(_) => {
                Self::NotFound("QR code is not in favorites".to_string())
            }
            FavoriteError::Repo(err) => Self::internal(INTERNAL_ERROR, &err),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(value: ExportError) -> Self {
        match value {
            ExportError::UnknownFormat(format) => {
                Self::BadRequest(format!("Unsupported export format: {format}"))
            }
            ExportError::Unsupported(format) => Self::NotImplemented(format!(
                "{} export is not implemented yet",
                format.as_str().to_ascii_uppercase()
            )),
            other => Self::internal(INTERNAL_ERROR, &other),
        }
    }
}
