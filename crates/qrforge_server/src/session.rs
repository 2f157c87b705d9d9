//! Cookie-based session handling.
//!
//! # Invariants
//! - The cookie only carries the opaque session token; user identity is
//!   always resolved through the `sessions` table.
//! - Cookies are `HttpOnly`, `SameSite=Lax`, scoped to `/` and expire with
//!   the server-side session.

use crate::api::accounts;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use log::debug;
use qrforge_core::{UserId, SESSION_MAX_AGE_MS};

pub const SESSION_COOKIE: &str = "qrforge_session";

/// Authenticated caller of a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub username: String,
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = session_token(&parts.headers).ok_or_else(ApiError::unauthorized)?;
        let lookup_token = token.clone();
        let user = state
            .run_blocking(move |conn| Ok(accounts(conn)?.current_user(&lookup_token)?))
            .await?;

        match user {
            Some(user) => Ok(Self {
                user_id: user.id,
                username: user.username,
                token,
            }),
            None => {
                debug!("event=session_resolve module=server status=rejected reason=unknown_token");
                Err(ApiError::unauthorized())
            }
        }
    }
}

/// Extracts the session token from all `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value that starts a session.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_MAX_AGE_MS / 1000
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::{clear_session_cookie, session_cookie, session_token};
    use axum::http::header::COOKIE;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn finds_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; qrforge_session=abc123; lang=en"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn searches_every_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("qrforge_session=tok"));
        assert_eq!(session_token(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn missing_or_empty_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("qrforge_session="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookie_attributes() {
        assert_eq!(
            session_cookie("t"),
            "qrforge_session=t; HttpOnly; SameSite=Lax; Path=/; Max-Age=604800"
        );
        assert!(clear_session_cookie().ends_with("Max-Age=0"));
    }
}
