use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Root directory holding the `backend/` and `front/` asset trees
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// When unset the in-memory store is used
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub idle_timeout_secs: u64,
    /// Upper bound on a single session lookup made by the login gate
    pub lookup_timeout_ms: u64,
    pub purge_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Initial password assigned to employees created through the API
    pub default_password: String,
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("REGGIE_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            self.server.static_dir = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            if !v.trim().is_empty() {
                self.session.cookie_name = v;
            }
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.session.cookie_secure = v.parse().unwrap_or(self.session.cookie_secure);
        }
        if let Ok(v) = env::var("SESSION_IDLE_TIMEOUT_SECS") {
            self.session.idle_timeout_secs = v.parse().unwrap_or(self.session.idle_timeout_secs);
        }
        if let Ok(v) = env::var("SESSION_LOOKUP_TIMEOUT_MS") {
            self.session.lookup_timeout_ms = v.parse().unwrap_or(self.session.lookup_timeout_ms);
        }
        if let Ok(v) = env::var("SESSION_PURGE_INTERVAL_SECS") {
            self.session.purge_interval_secs =
                v.parse().unwrap_or(self.session.purge_interval_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_DEFAULT_PASSWORD") {
            if !v.is_empty() {
                self.security.default_password = v;
            }
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 8080,
                static_dir: "static".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            session: SessionConfig {
                cookie_name: "SESSION".to_string(),
                cookie_secure: false,
                idle_timeout_secs: 30 * 60,
                lookup_timeout_ms: 500,
                purge_interval_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:8080".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                default_password: "123456".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 8080,
                static_dir: "static".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            session: SessionConfig {
                cookie_name: "SESSION".to_string(),
                cookie_secure: true,
                idle_timeout_secs: 30 * 60,
                lookup_timeout_ms: 250,
                purge_interval_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                default_password: "123456".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 8080,
                static_dir: "/srv/reggie/static".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            session: SessionConfig {
                cookie_name: "SESSION".to_string(),
                cookie_secure: true,
                idle_timeout_secs: 15 * 60,
                lookup_timeout_ms: 200,
                purge_interval_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: vec!["https://app.example.com".to_string()],
                default_password: "123456".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
