// handlers/public/mod.rs - Endpoints reachable without a signed-in employee

pub mod auth;

pub use auth::{login, logout, LoginRequest, LOGGED_OUT};
