use sqlx::postgres::{PgDatabaseError, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage back ends
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint hit; carries the offending value
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Turn unique violations into `Duplicate`, pass everything else through.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let value = db
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.detail())
                    .and_then(duplicate_value)
                    .unwrap_or_else(|| db.message().to_string());
                return DatabaseError::Duplicate(value);
            }
        }
        DatabaseError::Sqlx(err)
    }

    /// Connection-level failures worth a "try again later" answer
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
                | DatabaseError::Sqlx(sqlx::Error::PoolClosed)
                | DatabaseError::Sqlx(sqlx::Error::Io(_))
        )
    }
}

/// Extract `admin` from `Key (username)=(admin) already exists.`
fn duplicate_value(detail: &str) -> Option<String> {
    let start = detail.find(")=(")? + 3;
    let end = detail[start..].rfind(')')? + start;
    Some(detail[start..end].to_string())
}

/// Builds and checks the PostgreSQL pool
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to database at {}", Self::redacted_url(url)?);
        Ok(pool)
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Connection string with the password removed, for logs
    pub fn redacted_url(url: &str) -> Result<String, DatabaseError> {
        let mut parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if parsed.password().is_some() {
            parsed
                .set_password(Some("***"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(parsed.into())
    }
}
