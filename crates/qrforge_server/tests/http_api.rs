use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use qrforge_core::db::open_db;
use qrforge_server::{router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_db(dir.path().join("qrforge.sqlite3")).unwrap();
        Self {
            router: router(AppState::new(conn)),
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Registers `username` and returns the `name=value` cookie of a fresh login.
    async fn sign_in(&self, username: &str) -> String {
        let (status, _) = self
            .json(
                Method::POST,
                "/register",
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "hunter22",
                })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let response = self
            .send(
                Request::post("/login")
                    .body(Body::from(
                        json!({ "username": username, "password": "hunter22" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        set_cookie(&response)
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    async fn generate_link(&self, cookie: &str, url: &str) -> i64 {
        let (status, body) = self
            .json(
                Method::POST,
                "/generate",
                Some(json!({ "type": "link", "url": url })),
                Some(cookie),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["qr_id"].as_i64().unwrap()
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let (status, body) = app.json(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = TestApp::new();
    app.sign_in("alice").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/register",
            Some(json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "pw",
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn register_rejects_missing_fields_and_bad_json() {
    let app = TestApp::new();
    let (status, body) = app
        .json(
            Method::POST,
            "/register",
            Some(json!({ "username": "bob" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let response = app
        .send(Request::post("/register").body(Body::from("{not json")).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn login_sets_http_only_cookie_and_rejects_bad_credentials() {
    let app = TestApp::new();
    app.sign_in("alice").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/login",
            Some(json!({ "username": "alice", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid login credentials");

    let response = app
        .send(
            Request::post("/login")
                .body(Body::from(
                    json!({ "username": "alice", "password": "hunter22" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("qrforge_session="));
    assert!(cookie.contains("HttpOnly"));
    assert_eq!(body_json(response).await["message"], "Logged in successfully");
}

#[tokio::test]
async fn protected_routes_require_a_valid_session() {
    let app = TestApp::new();
    for uri in ["/favorites", "/export", "/statistics", "/logout"] {
        let (status, body) = app.json(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Login required");
    }

    let (status, _) = app
        .json(
            Method::POST,
            "/generate",
            Some(json!({ "type": "text", "text": "hi" })),
            Some("qrforge_session=forged"),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    let cookie = app.sign_in("alice").await;

    let response = app
        .send(
            Request::get("/logout")
                .header(COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).contains("Max-Age=0"));

    let (status, _) = app
        .json(Method::GET, "/favorites", None, Some(&cookie))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn generate_returns_png_data_url_and_validates_input() {
    let app = TestApp::new();
    let cookie = app.sign_in("alice").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/generate",
            Some(json!({
                "type": "vcard",
                "name": "Ada Lovelace",
                "phone": "+44 20 0000",
                "fill_color": "#336699",
            })),
            Some(&cookie),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["qr_code"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert!(body["qr_id"].as_i64().is_some());

    let (status, body) = app
        .json(
            Method::POST,
            "/generate",
            Some(json!({ "type": "link" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("url"));

    let (status, _) = app
        .json(
            Method::POST,
            "/generate",
            Some(json!({ "type": "hologram" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn favorites_round_trip_through_the_api() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;
    let bob = app.sign_in("bob").await;
    let qr_id = app.generate_link(&alice, "https://example.com").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/favorites",
            Some(json!({ "qr_code_id": qr_id })),
            Some(&alice),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Added to favorites");

    let (status, body) = app.json(Method::GET, "/favorites", None, Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], qr_id);
    assert_eq!(items[0]["type"], "link");
    assert!(items[0]["created_at"].as_str().unwrap().ends_with('Z'));

    let (status, _) = app
        .json(
            Method::POST,
            "/favorites",
            Some(json!({ "qr_code_id": qr_id })),
            Some(&bob),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/favorites/{qr_id}");
    let (status, _) = app.json(Method::DELETE, &uri, None, Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.json(Method::DELETE, &uri, None, Some(&alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_serves_csv_attachment_and_rejects_other_formats() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;
    let bob = app.sign_in("bob").await;
    app.generate_link(&alice, "https://alice.example").await;
    app.generate_link(&bob, "https://bob.example").await;

    let response = app
        .send(
            Request::get("/export?format=csv")
                .header(COOKIE, &alice)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"qr_codes.csv\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("ID,Type,Data,Created at,Views"));
    assert!(csv.contains("alice.example"));
    assert!(!csv.contains("bob.example"));

    let (status, body) = app
        .json(Method::GET, "/export?format=pdf", None, Some(&alice))
        .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["error"], "PDF export is not implemented yet");

    let (status, _) = app
        .json(Method::GET, "/export?format=xlsx", None, Some(&alice))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statistics_count_generations() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;

    let (status, body) = app
        .json(Method::GET, "/statistics", None, Some(&alice))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_qr_codes"], 0);
    assert_eq!(body["most_popular_type"], Value::Null);

    app.generate_link(&alice, "https://one.example").await;
    app.generate_link(&alice, "https://two.example").await;

    let (_, body) = app
        .json(Method::GET, "/statistics", None, Some(&alice))
        .await;
    assert_eq!(body["total_qr_codes"], 2);
    assert_eq!(body["total_views"], 0);
    assert_eq!(body["most_popular_type"], "link");
}

#[tokio::test]
async fn themes_are_public() {
    let app = TestApp::new();
    let (status, body) = app.json(Method::GET, "/themes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    for name in ["light", "dark", "blue", "green"] {
        assert!(body[name]["background"].is_string(), "{name}");
    }
}

#[tokio::test]
async fn scanning_enforces_password_and_counts_views() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;
    let (_, body) = app
        .json(
            Method::POST,
            "/generate",
            Some(json!({ "type": "text", "text": "vault", "password": "letmein" })),
            Some(&alice),
        )
        .await;
    let qr_id = body["qr_id"].as_i64().unwrap();

    let (status, _) = app
        .json(Method::GET, &format!("/qr/{qr_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .json(
            Method::GET,
            &format!("/qr/{qr_id}?password=letmein"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], "vault");
    assert_eq!(body["type"], "text");
    assert_eq!(body["views"], 1);

    let (status, _) = app.json(Method::GET, "/qr/424242", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_codes_answer_gone() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;
    let (status, body) = app
        .json(
            Method::POST,
            "/generate",
            Some(json!({ "type": "text", "text": "stale", "expiry_date": "2000-01-01" })),
            Some(&alice),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let qr_id = body["qr_id"].as_i64().unwrap();

    let (status, body) = app
        .json(Method::GET, &format!("/qr/{qr_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["error"], "QR code has expired");
}

#[tokio::test]
async fn malformed_path_and_query_use_the_error_envelope() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;

    let response = app
        .send(Request::get("/qr/abc").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert!(body_json(response).await["error"].is_string());

    let (status, body) = app
        .json(Method::DELETE, "/favorites/x", None, Some(&alice))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app
        .json(Method::GET, "/export?format=csv&format=pdf", None, Some(&alice))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
