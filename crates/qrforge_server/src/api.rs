//! HTTP use-case handlers.
//!
//! # Responsibility
//! - Translate JSON requests into core service calls and core results into
//!   JSON envelopes.
//! - Keep every database touch inside `AppState::run_blocking`.
//!
//! # Invariants
//! - Handlers never panic; failures become an `ApiError` response.
//! - Request bodies are parsed from raw bytes and path/query extractors are
//!   taken as `Result`, so malformed input yields a `400 {"error": ...}`
//!   envelope like every other client error.

use crate::error::{ApiError, GENERATION_FAILED};
use crate::session::{clear_session_cookie, session_cookie, CurrentUser};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::info;
use qrforge_core::timestamp::to_iso8601;
use qrforge_core::{
    core_version, themes, AccountService, ExportService, FavoriteService, GenerateRequest,
    NewUser, QrCodeId, QrService, SqliteFavoriteRepository, SqliteQrCodeRepository,
    SqliteSessionRepository, SqliteStatisticsRepository, SqliteUserRepository, StatisticsService,
    Theme,
};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

type Accounts<'conn> = AccountService<SqliteUserRepository<'conn>, SqliteSessionRepository<'conn>>;
type QrCodes<'conn> = QrService<SqliteQrCodeRepository<'conn>, SqliteStatisticsRepository<'conn>>;
type Favorites<'conn> =
    FavoriteService<SqliteFavoriteRepository<'conn>, SqliteQrCodeRepository<'conn>>;

pub(crate) fn accounts(conn: &Connection) -> Result<Accounts<'_>, ApiError> {
    Ok(AccountService::new(
        SqliteUserRepository::try_new(conn)?,
        SqliteSessionRepository::try_new(conn)?,
    ))
}

fn qr_codes(conn: &Connection) -> Result<QrCodes<'_>, ApiError> {
    Ok(QrService::new(
        SqliteQrCodeRepository::try_new(conn)?,
        SqliteStatisticsRepository::try_new(conn)?,
    ))
}

fn favorites(conn: &Connection) -> Result<Favorites<'_>, ApiError> {
    Ok(FavoriteService::new(
        SqliteFavoriteRepository::try_new(conn)?,
        SqliteQrCodeRepository::try_new(conn)?,
    ))
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::bad_request(format!("Invalid request body: {err}")))
}

fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

#[derive(Debug, Deserialize)]
struct RegisterBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct FavoriteBody {
    qr_code_id: QrCodeId,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteItem {
    id: QrCodeId,
    #[serde(rename = "type")]
    kind: &'static str,
    created_at: String,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": core_version() }))
}

pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let body: RegisterBody = parse_json(&body)?;
    let new_user = NewUser::new(body.username, body.email, body.password);
    let user_id = state
        .run_blocking(move |conn| Ok(accounts(conn)?.register(&new_user)?))
        .await?;
    info!("event=http_register module=server status=ok user_id={user_id}");
    Ok(message("User registered"))
}

pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let body: LoginBody = parse_json(&body)?;
    let session = state
        .run_blocking(move |conn| Ok(accounts(conn)?.login(&body.username, &body.password)?))
        .await?;
    Ok((
        [(SET_COOKIE, session_cookie(&session.token))],
        message("Logged in successfully"),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> Result<Response, ApiError> {
    let token = user.token;
    state
        .run_blocking(move |conn| Ok(accounts(conn)?.logout(&token)?))
        .await?;
    info!(
        "event=http_logout module=server status=ok user_id={}",
        user.user_id
    );
    Ok((
        [(SET_COOKIE, clear_session_cookie())],
        message("Logged out successfully"),
    )
        .into_response())
}

pub async fn generate(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: GenerateRequest = parse_json(&body)?;
    let generated = state
        .run_blocking(move |conn| {
            qr_codes(conn)?
                .generate(user.user_id, &request)
                .map_err(|err| match ApiError::from(err) {
                    ApiError::Internal(_) => ApiError::Internal(GENERATION_FAILED),
                    client => client,
                })
        })
        .await?;
    Ok(Json(json!({
        "qr_code": generated.data_url,
        "qr_id": generated.qr_id,
    })))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<FavoriteItem>>, ApiError> {
    let entries = state
        .run_blocking(move |conn| Ok(favorites(conn)?.list(user.user_id)?))
        .await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|entry| FavoriteItem {
                id: entry.qr_code_id,
                kind: entry.kind.as_str(),
                created_at: to_iso8601(entry.created_at),
            })
            .collect(),
    ))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let body: FavoriteBody = parse_json(&body)?;
    state
        .run_blocking(move |conn| Ok(favorites(conn)?.add(user.user_id, body.qr_code_id)?))
        .await?;
    Ok(message("Added to favorites"))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    path: Result<Path<QrCodeId>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(qr_code_id) = path?;
    state
        .run_blocking(move |conn| Ok(favorites(conn)?.remove(user.user_id, qr_code_id)?))
        .await?;
    Ok(message("Removed from favorites"))
}

pub async fn export(
    State(state): State<AppState>,
    user: CurrentUser,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let format = query.format.unwrap_or_else(|| "csv".to_string());
    let file = state
        .run_blocking(move |conn| {
            let service = ExportService::new(SqliteQrCodeRepository::try_new(conn)?);
            Ok(service.export(user.user_id, &format)?)
        })
        .await?;
    Ok((
        [
            (CONTENT_TYPE, file.content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response())
}

pub async fn statistics(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let stats = state
        .run_blocking(|conn| {
            Ok(StatisticsService::new(SqliteStatisticsRepository::try_new(conn)?).latest()?)
        })
        .await?;
    Ok(Json(json!({
        "date": stats.date,
        "total_qr_codes": stats.total_qr_codes,
        "total_views": stats.total_views,
        "most_popular_type": stats.most_popular_type.map(|kind| kind.as_str()),
    })))
}

pub async fn list_themes() -> Json<BTreeMap<&'static str, Theme>> {
    Json(themes())
}

pub async fn view_qr(
    State(state): State<AppState>,
    path: Result<Path<QrCodeId>, PathRejection>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let Query(query) = query?;
    let view = state
        .run_blocking(move |conn| Ok(qr_codes(conn)?.view(id, query.password.as_deref())?))
        .await?;
    Ok(Json(json!({
        "id": view.id,
        "type": view.kind.as_str(),
        "payload": view.payload,
        "views": view.views,
    })))
}
