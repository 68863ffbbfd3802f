//! Server-side sessions keyed by an opaque token carried in a cookie.
//!
//! The store only knows tokens, keys and JSON values. [`Session`] is the
//! per-request handle the session middleware puts into request extensions; it
//! knows the one attribute this service uses, the signed-in employee.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::auth::Identity;

pub use memory::MemorySessionStore;

/// Session attribute holding the signed-in employee id
pub const EMPLOYEE_KEY: &str = "employee";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("session lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed session attribute: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start an empty session under `token`.
    async fn create(&self, token: &str) -> Result<(), SessionError>;

    /// Whether `token` names a live session; refreshes its idle timer.
    async fn exists(&self, token: &str) -> Result<bool, SessionError>;

    async fn get(&self, token: &str, key: &str) -> Result<Option<Value>, SessionError>;

    async fn set(&self, token: &str, key: &str, value: Value) -> Result<(), SessionError>;

    /// Removing an absent key or session is not an error.
    async fn remove(&self, token: &str, key: &str) -> Result<(), SessionError>;

    /// Drop the whole session. Destroying an unknown token is not an error.
    async fn destroy(&self, token: &str) -> Result<(), SessionError>;

    /// Drop expired sessions, returning how many were dropped.
    async fn purge_expired(&self) -> Result<usize, SessionError> {
        Ok(0)
    }
}

/// The current request's session
#[derive(Clone)]
pub struct Session {
    token: String,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(token: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            token: token.into(),
            store,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn identity(&self) -> Result<Option<Identity>, SessionError> {
        match self.store.get(&self.token, EMPLOYEE_KEY).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Lookup bounded by `limit`; a slow store counts as a failure.
    pub async fn identity_within(&self, limit: Duration) -> Result<Option<Identity>, SessionError> {
        tokio::time::timeout(limit, self.identity())
            .await
            .map_err(|_| SessionError::Timeout(limit))?
    }

    pub async fn bind_identity(&self, identity: Identity) -> Result<(), SessionError> {
        self.store
            .set(&self.token, EMPLOYEE_KEY, serde_json::to_value(identity)?)
            .await
    }

    pub async fn unbind_identity(&self) -> Result<(), SessionError> {
        self.store.remove(&self.token, EMPLOYEE_KEY).await
    }

    /// Move to a freshly issued token and drop the old session. Called on
    /// login so a token handed out before authentication never becomes an
    /// authenticated one.
    pub async fn rotate(&self) -> Result<Session, SessionError> {
        let token = generate_token();
        self.store.create(&token).await?;
        self.store.destroy(&self.token).await?;
        Ok(Session::new(token, self.store.clone()))
    }
}

/// Fresh unguessable session token
pub fn generate_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
