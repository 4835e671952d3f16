/// Authentication gate.
///
/// Runs once per request, before route dispatch, and NEVER rejects: its
/// only job is to attach an authenticated identity to the request when the
/// presented bearer token checks out. Authorization decisions belong to the
/// routes: a handler that needs authentication takes the [`CurrentUser`]
/// extractor, which answers 401 when the gate attached nothing.
///
/// Per-request state machine:
///
/// ```text
/// no header / no "Bearer " prefix ──────────────► unauthenticated
/// header ─► verify ─► malformed ────────────────► unauthenticated
///                  └► subject unknown ──────────► unauthenticated
///                  └► expired / subject mismatch► unauthenticated
///                  └► valid + match ────────────► CurrentUser attached
/// ```
///
/// All outcomes continue to the next stage.
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use notehub_shared::models::user::User;

use crate::{app::AppState, error::ApiError};

/// The authenticated user attached to a request by [`authenticate`].
///
/// Handlers extract it to demand authentication:
///
/// ```no_run
/// use axum::Json;
/// use notehub_api::middleware::auth::CurrentUser;
///
/// async fn whoami(CurrentUser(user): CurrentUser) -> Json<String> {
///     Json(user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// The gate itself, layered over the whole `/api/v1` tree with
/// `axum::middleware::from_fn_with_state`.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    // A request never arrives pre-authenticated in practice; the check
    // keeps the gate idempotent if it is ever layered twice.
    if req.extensions().get::<CurrentUser>().is_none() {
        // Read the Authorization header here (a `&str`, which is `Send`)
        // rather than passing `&Request` into the async resolver: an async fn
        // holds all of its parameters across every await, and `&Request` is
        // not `Send` because `Request<Body>` is not `Sync`.
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if let Some(user) = resolve_identity(&state, auth_header).await {
            req.extensions_mut().insert(CurrentUser(user));
        }
    }

    next.run(req).await
}

/// Token-to-user resolution. Every failure is a `None`: the gate leaves the
/// request unauthenticated and lets route policy decide.
async fn resolve_identity(state: &AppState, auth_header: Option<&str>) -> Option<User> {
    let header_value = auth_header?;

    let token = header_value.strip_prefix("Bearer ")?;

    let verified = match state.tokens.verify(token) {
        Ok(verified) => verified,
        Err(e) => {
            debug!(error = %e, "bearer token rejected");
            return None;
        }
    };

    let user = match state.users.load_by_username(&verified.subject).await {
        Ok(user) => user,
        Err(e) => {
            debug!(subject = %verified.subject, error = %e, "token subject not resolvable");
            return None;
        }
    };

    if !state.tokens.is_valid(token, &user.username) {
        debug!(subject = %user.username, "token invalid for resolved user");
        return None;
    }

    debug!(user_id = user.id, username = %user.username, "request authenticated");
    Some(user)
}
