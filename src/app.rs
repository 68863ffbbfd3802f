use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::{CredentialVerifier, PasswordEncoder};
use crate::config::{AppConfig, SecurityConfig, SessionConfig};
use crate::database::Storage;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{login_check, session_middleware, ExemptPaths};
use crate::session::SessionStore;

/// Everything handlers and middleware share
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub sessions: Arc<dyn SessionStore>,
    pub verifier: Arc<CredentialVerifier>,
    pub encoder: Arc<dyn PasswordEncoder>,
    pub exempt_paths: Arc<ExemptPaths>,
    pub session: SessionConfig,
    pub security: SecurityConfig,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        storage: Storage,
        sessions: Arc<dyn SessionStore>,
        encoder: Arc<dyn PasswordEncoder>,
        config: &AppConfig,
    ) -> Self {
        let verifier = CredentialVerifier::new(storage.employees.clone(), encoder.clone());
        Self {
            storage,
            sessions,
            verifier: Arc::new(verifier),
            encoder,
            exempt_paths: Arc::new(ExemptPaths::standard()),
            session: config.session.clone(),
            security: config.security.clone(),
            static_dir: PathBuf::from(&config.server.static_dir),
        }
    }
}

/// The full application: routes behind trace, CORS, session and login layers
pub fn router(state: AppState) -> Router {
    with_gate(routes(&state), state)
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(employee_routes())
        .merge(category_routes())
        .merge(dish_routes())
        .nest_service("/backend", ServeDir::new(state.static_dir.join("backend")))
        .nest_service("/front", ServeDir::new(state.static_dir.join("front")))
}

/// Wrap `routes` in the request pipeline. The layers run in order
/// trace, CORS, session, login check, so CORS preflights are answered before
/// the gate and every handler sees a session.
pub fn with_gate(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.security))
                .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
                .layer(middleware::from_fn_with_state(state.clone(), login_check)),
        )
        .with_state(state)
}

fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employee/login", post(public::login))
        .route("/employee/logout", post(public::logout))
        .route("/employee", post(protected::employee::save).put(protected::employee::update))
        .route("/employee/page", get(protected::employee::page))
        .route("/employee/:id", get(protected::employee::get_by_id))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/category",
            post(protected::category::save)
                .put(protected::category::update)
                .delete(protected::category::delete),
        )
        .route("/category/page", get(protected::category::page))
        .route("/category/list", get(protected::category::list))
}

fn dish_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/dish",
            post(protected::dish::save)
                .put(protected::dish::update)
                .delete(protected::dish::delete),
        )
        .route("/dish/page", get(protected::dish::page))
        .route("/dish/:id", get(protected::dish::get_by_id))
        .route("/dish/status/:status", post(protected::dish::set_status))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ApiError::not_found("No such endpoint").to_json()))
}
