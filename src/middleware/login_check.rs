use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::auth::Identity;
use crate::context::IdentityContext;
use crate::middleware::response::ApiResponse;
use crate::session::Session;

/// Message of the rejection envelope; the admin front end redirects on it.
pub const NOT_LOGGED_IN: &str = "NOTLOGIN";

/// The login gate.
///
/// Exempt paths go straight through with no identity bound. Everything else
/// needs an employee bound to the session; when there is one, the downstream
/// handler runs inside [`IdentityContext::scope`], otherwise the request is
/// answered with the `NOTLOGIN` envelope and never reaches a handler. Store
/// failures and slow lookups are treated as "not logged in".
pub async fn login_check(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if state.exempt_paths.is_exempt(&path) {
        debug!("{} is exempt from the login check", path);
        return next.run(request).await;
    }

    let session = request.extensions().get::<Session>().cloned();
    match resolve_identity(&state, session).await {
        Some(identity) => {
            debug!("{} accessed by employee {}", path, identity);
            IdentityContext::scope(identity, next.run(request)).await
        }
        None => {
            debug!("Rejected unauthenticated request to {}", path);
            ApiResponse::<()>::error(NOT_LOGGED_IN).into_response()
        }
    }
}

async fn resolve_identity(state: &AppState, session: Option<Session>) -> Option<Identity> {
    let Some(session) = session else {
        warn!("No session attached to request; is the session layer installed?");
        return None;
    };

    match session.identity_within(state.session.lookup_timeout()).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Session lookup failed, treating request as unauthenticated: {}", e);
            None
        }
    }
}
