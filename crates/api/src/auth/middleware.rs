//! Authentication middleware.
//!
//! Extracts the bearer session token, resolves it against the session
//! store, and attaches the authenticated user to the request extensions.
//! Role checks happen both here (admin-only sub-routers) and in handlers
//! that need finer rules (actors may only touch their own rows).

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use callboard_domain::CallboardError;

use crate::context::AppContext;
use crate::error::ApiError;
use super::sessions::SessionUser;

/// Request extension carrying the authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

/// Pull a bearer token out of an Authorization header value.
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Session gate: rejects requests without a valid session token.
pub async fn require_session(
    State(ctx): State<Arc<AppContext>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| CallboardError::Auth("missing bearer token".into()))?;

    let user = ctx
        .sessions
        .get(token)
        .ok_or_else(|| CallboardError::Auth("invalid or expired session".into()))?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
