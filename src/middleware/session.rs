use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::config::SessionConfig;
use crate::session::{generate_token, Session, SessionError};

/// Attaches a [`Session`] to every request.
///
/// A token from the cookie is honoured only if the store already knows it;
/// anything else gets a freshly issued token and a `Set-Cookie`, so clients
/// cannot pick their own session ids.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.session;
    let store = state.sessions.clone();
    let limit = config.lookup_timeout();

    let presented = parse_cookie(request.headers(), &config.cookie_name);
    let known = match presented {
        Some(token) => match bounded(limit, store.exists(&token)).await {
            Ok(true) => Some(token),
            Ok(false) => None,
            Err(e) => {
                warn!("Session lookup failed, issuing a new session: {}", e);
                None
            }
        },
        None => None,
    };

    let (token, issued) = match known {
        Some(token) => (token, None),
        None => {
            let token = generate_token();
            let issued = match bounded(limit, store.create(&token)).await {
                Ok(()) => session_cookie(config, &token),
                Err(e) => {
                    warn!("Could not create session: {}", e);
                    None
                }
            };
            debug!("Issued new session");
            (token, issued)
        }
    };

    request.extensions_mut().insert(Session::new(token, store));

    let mut response = next.run(request).await;
    // A handler that rotated the session has already set the cookie
    if let Some(cookie) = issued {
        if !sets_cookie(response.headers(), &config.cookie_name) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }
    response
}

fn sets_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split_once('='))
        .any(|(key, _)| key.trim() == name)
}

async fn bounded<T>(
    limit: Duration,
    fut: impl std::future::Future<Output = Result<T, SessionError>>,
) -> Result<T, SessionError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| SessionError::Timeout(limit))?
}

/// Value of cookie `name` from the request headers
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// HttpOnly cookie scoped to the whole site
pub fn session_cookie(config: &SessionConfig, token: &str) -> Option<HeaderValue> {
    let mut cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", config.cookie_name, token);
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}
