use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

pub const CODE_SUCCESS: i32 = 1;
pub const CODE_FAILURE: i32 = 0;

/// The `{code, message, data}` envelope every endpoint answers with.
///
/// `code` is 1 on success and 0 on failure. Failures carried in this envelope
/// still travel as HTTP 200; the client branches on `code`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: CODE_FAILURE,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success carrying only a message, e.g. "Logged out"
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self) {
            Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "code": CODE_FAILURE,
                        "message": "Failed to serialize response data",
                        "data": null
                    })),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
