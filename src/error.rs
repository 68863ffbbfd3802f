// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::PasswordError;
use crate::database::DatabaseError;
use crate::middleware::response::CODE_FAILURE;
use crate::session::SessionError;

/// Failure answered with the `{code: 0, message, data: null}` envelope.
///
/// Business outcomes (not found, duplicates, rule violations) keep HTTP 200 so
/// the admin front end can show `message`; malformed input and faults use real
/// status codes.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 200, business outcomes
    NotFound(String),
    Conflict(String),
    Business(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) | ApiError::Conflict(_) | ApiError::Business(_) => 200,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Business(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "code": CODE_FAILURE,
            "message": self.message(),
            "data": null
        })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn business(message: impl Into<String>) -> Self {
        ApiError::Business(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        if err.is_unavailable() {
            tracing::error!("Database unavailable: {}", err);
            return ApiError::service_unavailable("Database temporarily unavailable");
        }
        match err {
            DatabaseError::Duplicate(value) => {
                ApiError::conflict(format!("{} already exists", value))
            }
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::MigrationError(msg) => {
                tracing::error!("Migration error: {}", msg);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
            other => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", other);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        tracing::error!("Session store error: {}", err);
        match err {
            SessionError::Unavailable(_) | SessionError::Timeout(_) => {
                ApiError::service_unavailable("Session store temporarily unavailable")
            }
            SessionError::Malformed(_) => {
                ApiError::internal_server_error("Session data is corrupt")
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing failed: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
