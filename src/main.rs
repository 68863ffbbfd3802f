use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reggie_api::app::{router, AppState};
use reggie_api::auth::{Argon2PasswordEncoder, PasswordEncoder};
use reggie_api::config::AppConfig;
use reggie_api::database::{DatabaseManager, Storage};
use reggie_api::session::{MemorySessionStore, SessionStore};

/// Restaurant back-office API server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Port to listen on (overrides REGGIE_API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Use the in-memory store even if DATABASE_URL is set
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reggie_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = reggie_api::config::config();
    info!("Starting Reggie API in {:?} mode", config.environment);

    let storage = open_storage(config, args.memory).await?;
    let encoder: Arc<dyn PasswordEncoder> = Arc::new(Argon2PasswordEncoder::new());
    if storage
        .ensure_admin(encoder.as_ref(), &config.security.default_password)
        .await
        .context("failed to create the initial admin account")?
    {
        warn!("Initial admin account created with the default password");
    }

    let sessions = Arc::new(MemorySessionStore::new(config.session.idle_timeout()));
    spawn_session_purge(sessions.clone(), config.session.purge_interval_secs);

    let state = AppState::new(storage, sessions, encoder, config);
    let app = router(state);

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Reggie API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn open_storage(config: &AppConfig, force_memory: bool) -> anyhow::Result<Storage> {
    if force_memory || config.database.url.is_none() {
        warn!("Using the in-memory store; data is lost on restart");
        return Ok(Storage::memory());
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    DatabaseManager::migrate(&pool).await.context("failed to migrate the database")?;
    DatabaseManager::health_check(&pool)
        .await
        .context("database health check failed")?;
    Ok(Storage::postgres(pool))
}

fn spawn_session_purge(sessions: Arc<MemorySessionStore>, every_secs: u64) {
    if every_secs == 0 {
        return;
    }
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(every_secs));
        loop {
            ticker.tick().await;
            if let Err(e) = sessions.purge_expired().await {
                warn!("Session purge failed: {}", e);
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
