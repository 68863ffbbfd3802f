//! Drop-in replacements for axum's `Json`, `Query` and `Path` extractors whose
//! rejections answer with the `{code, message, data}` envelope instead of
//! axum's plain-text bodies.

use async_trait::async_trait;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Path parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Credentials {
        #[allow(dead_code)]
        username: String,
        #[allow(dead_code)]
        password: String,
    }

    fn json_request(body: &str, content_type: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn missing_field_is_a_bad_request() {
        let req = json_request(r#"{"username":"admin"}"#, Some("application/json"));
        let err = ApiJson::<Credentials>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message().contains("password"), "{}", err.message());
    }

    #[tokio::test]
    async fn missing_content_type_is_a_bad_request() {
        let req = json_request(r#"{"username":"admin","password":"x"}"#, None);
        let err = ApiJson::<Credentials>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn well_formed_body_passes_through() {
        let req = json_request(r#"{"username":"admin","password":"x"}"#, Some("application/json"));
        assert!(ApiJson::<Credentials>::from_request(req, &()).await.is_ok());
    }

    #[tokio::test]
    async fn bad_query_is_a_bad_request() {
        #[derive(Debug, Deserialize)]
        struct Paging {
            #[allow(dead_code)]
            page: u64,
        }
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/employee/page?page=first")
            .body(())
            .unwrap()
            .into_parts();
        let err = ApiQuery::<Paging>::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
