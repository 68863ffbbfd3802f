#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use reggie_api::app::AppState;
use reggie_api::auth::{Argon2PasswordEncoder, PasswordEncoder};
use reggie_api::config::AppConfig;
use reggie_api::database::memory::MemoryStore;
use reggie_api::database::models::{STATUS_DISABLED, STATUS_ENABLED};
use reggie_api::database::Storage;
use reggie_api::session::{MemorySessionStore, SessionStore};

pub const PASSWORD: &str = "123456";
pub const NOT_LOGGED_IN: &str = "NOTLOGIN";

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub admin_id: i64,
    pub frozen_id: i64,
}

impl TestApp {
    pub fn router(&self) -> Router {
        reggie_api::router(self.state.clone())
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string();
    config.session.lookup_timeout_ms = 200;
    config
}

/// Cheap argon2 parameters; production strength would make every test slow.
pub fn test_encoder() -> Arc<dyn PasswordEncoder> {
    Arc::new(Argon2PasswordEncoder::with_params(1024, 1, 1).expect("argon2 params"))
}

/// In-memory app with an enabled `admin` and a disabled `frozen` account.
pub async fn test_app() -> TestApp {
    let sessions: Arc<dyn SessionStore> =
        Arc::new(MemorySessionStore::new(std::time::Duration::from_secs(60)));
    test_app_with_sessions(sessions).await
}

pub async fn test_app_with_sessions(sessions: Arc<dyn SessionStore>) -> TestApp {
    let encoder = test_encoder();
    let store = Arc::new(MemoryStore::new());
    let digest = encoder.encode(PASSWORD).expect("hash");
    let admin = store
        .seed_employee("admin", "Administrator", &digest, STATUS_ENABLED)
        .await
        .expect("seed admin");
    let frozen = store
        .seed_employee("frozen", "Frozen Clerk", &digest, STATUS_DISABLED)
        .await
        .expect("seed frozen");

    let storage = Storage::from_memory(store.clone());
    let state = AppState::new(storage, sessions, encoder, &test_config());
    TestApp {
        state,
        store,
        admin_id: admin.id,
        frozen_id: frozen.id,
    }
}

pub fn request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<&Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Reply {
    /// `SESSION=...` pair from Set-Cookie, ready to send back
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with("SESSION="))
            .map(str::to_string)
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Result<Reply> {
    let response = app.clone().oneshot(request).await.context("oneshot")?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok(Reply { status, headers, body })
}

/// GET with a session cookie
pub async fn get(app: &Router, uri: &str, cookie: &str) -> Result<Reply> {
    send(app, request(Method::GET, uri, Some(cookie), None)).await
}

/// POST an arbitrary login body, optionally on an existing session
pub async fn post_login(app: &Router, cookie: Option<&str>, payload: &Value) -> Result<Reply> {
    send(app, request(Method::POST, "/employee/login", cookie, Some(payload))).await
}

pub async fn logout(app: &Router, cookie: Option<&str>) -> Result<Reply> {
    send(app, request(Method::POST, "/employee/logout", cookie, None)).await
}

/// Log in and return the session cookie to send on later requests.
pub async fn login(app: &Router, username: &str, password: &str) -> Result<(Reply, String)> {
    let payload = serde_json::json!({ "username": username, "password": password });
    let reply = send(app, request(Method::POST, "/employee/login", None, Some(&payload))).await?;
    let cookie = reply.session_cookie().context("login issued no session cookie")?;
    Ok((reply, cookie))
}

pub async fn login_admin(app: &Router) -> Result<String> {
    let (reply, cookie) = login(app, "admin", PASSWORD).await?;
    anyhow::ensure!(reply.body["code"] == 1, "admin login failed: {}", reply.body);
    Ok(cookie)
}

/// Serve `app` on a free local port for clients that need real sockets.
pub async fn spawn_server(app: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}
