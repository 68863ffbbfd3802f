// handlers/public/auth.rs - POST /employee/login, POST /employee/logout

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::api::ApiJson;
use crate::app::AppState;
use crate::auth::AuthError;
use crate::error::ApiError;
use crate::middleware::{session_cookie, ApiResponse};
use crate::session::Session;

pub const LOGGED_OUT: &str = "Logged out";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /employee/login
///
/// Verifies the credentials and binds the employee id to a freshly rotated
/// session. Unknown usernames and wrong passwords get the same message; a
/// disabled account is told so. The response carries the account without its
/// password digest.
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let verified = state.verifier.verify(&payload.username, &payload.password).await;
    let (identity, employee) = match verified {
        Ok(verified) => verified,
        Err(e) => {
            match &e {
                AuthError::Store(db) => {
                    error!("Login for {:?} failed on account lookup: {}", payload.username, db)
                }
                _ => warn!("Rejected login for {:?}: {}", payload.username, e),
            }
            return Ok(ApiResponse::<()>::error(e.user_message()).into_response());
        }
    };

    let session = session.rotate().await?;
    session.bind_identity(identity).await?;
    info!("Employee {} ({}) logged in", identity, employee.username);

    let mut response = ApiResponse::success(employee).into_response();
    if let Some(cookie) = session_cookie(&state.session, session.token()) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}

/// POST /employee/logout
///
/// Clears the signed-in employee from the session. Always succeeds, also
/// when nobody was signed in.
pub async fn logout(Extension(session): Extension<Session>) -> ApiResponse<()> {
    if let Err(e) = session.unbind_identity().await {
        warn!("Could not clear session on logout: {}", e);
    }
    ApiResponse::message(LOGGED_OUT)
}
