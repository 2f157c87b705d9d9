//! JSON web API over `qrforge_core`.
//!
//! Accounts, QR generation, favorites, export and statistics behind
//! session-cookie authentication.

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

use axum::routing::{delete, get, post};
use axum::Router;

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/register", post(api::register))
        .route("/login", post(api::login))
        .route("/logout", get(api::logout))
        .route("/generate", post(api::generate))
        .route(
            "/favorites",
            get(api::list_favorites).post(api::add_favorite),
        )
        .route("/favorites/{qr_code_id}", delete(api::remove_favorite))
        .route("/export", get(api::export))
        .route("/statistics", get(api::statistics))
        .route("/themes", get(api::list_themes))
        .route("/qr/{id}", get(api::view_qr))
        .with_state(state)
}
