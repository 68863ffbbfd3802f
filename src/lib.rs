pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod session;

pub use app::{router, AppState};
