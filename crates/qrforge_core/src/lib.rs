//! Core domain logic for the QR code generator.
//! This crate is the single source of truth for persistence and QR rendering;
//! the web server and the desktop app are thin shells over it.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod qr;
pub mod repo;
pub mod service;
pub mod theme;
pub mod timestamp;

pub use logging::{
    active_log_settings, default_log_level, init_logging, LogLevel, LogSettings, LoggingError,
};
pub use model::favorite::FavoriteEntry;
pub use model::qr_code::{NewQrCode, QrCode, QrCodeId, QrType};
pub use model::statistics::DailyStatistics;
pub use model::user::{NewUser, User, UserId};
pub use model::validation::ValidationError;
pub use qr::{GenerateRequest, QrError, QrStyle};
pub use repo::favorite_repo::{FavoriteRepository, SqliteFavoriteRepository};
pub use repo::qr_repo::{QrCodeRepository, SqliteQrCodeRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository, SESSION_MAX_AGE_MS};
pub use repo::stats_repo::{SqliteStatisticsRepository, StatisticsRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{in_transaction, RepoError, RepoResult};
pub use service::account_service::{AccountError, AccountService, Session};
pub use service::export_service::{ExportError, ExportFile, ExportFormat, ExportService};
pub use service::favorite_service::{FavoriteError, FavoriteService};
pub use service::qr_service::{GeneratedQr, QrService, QrServiceError, QrView};
pub use service::stats_service::StatisticsService;
pub use theme::{themes, Theme};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
