use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use super::{SessionError, SessionStore};

struct SessionRecord {
    attributes: HashMap<String, Value>,
    expires_at: Instant,
}

impl SessionRecord {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local sessions with an idle timeout. Every access pushes the
/// expiry forward; expired sessions read as absent and are dropped lazily or
/// by [`SessionStore::purge_expired`].
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    idle_timeout: Duration,
}

impl MemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn fresh_record(&self, now: Instant) -> SessionRecord {
        SessionRecord {
            attributes: HashMap::new(),
            expires_at: now + self.idle_timeout,
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, token: &str) -> Result<(), SessionError> {
        let now = Instant::now();
        let record = self.fresh_record(now);
        self.sessions.write().await.insert(token.to_string(), record);
        Ok(())
    }

    async fn exists(&self, token: &str) -> Result<bool, SessionError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(record) if !record.is_expired(now) => {
                record.expires_at = now + self.idle_timeout;
                Ok(true)
            }
            Some(_) => {
                sessions.remove(token);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, token: &str, key: &str) -> Result<Option<Value>, SessionError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(record) if !record.is_expired(now) => {
                record.expires_at = now + self.idle_timeout;
                Ok(record.attributes.get(key).cloned())
            }
            Some(_) => {
                sessions.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, token: &str, key: &str, value: Value) -> Result<(), SessionError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let record = sessions
            .entry(token.to_string())
            .or_insert_with(|| self.fresh_record(now));
        if record.is_expired(now) {
            *record = self.fresh_record(now);
        }
        record.expires_at = now + self.idle_timeout;
        record.attributes.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, token: &str, key: &str) -> Result<(), SessionError> {
        if let Some(record) = self.sessions.write().await.get_mut(token) {
            record.attributes.remove(key);
        }
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, SessionError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(now));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }
        Ok(purged)
    }
}
