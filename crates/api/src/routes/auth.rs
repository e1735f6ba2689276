//! Login endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use callboard_domain::{CallboardError, Role};
use tracing::info;

use crate::auth::passwords::verify_password;
use crate::auth::SessionUser;
use crate::context::AppContext;
use crate::dto::{LoginRequest, LoginResponse};
use crate::error::ApiResult;

/// POST /api/login
///
/// No email: the admin password grants an ADMIN session. With an email:
/// actor accounts authenticate against their stored password hash.
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = match request.email.as_deref().filter(|e| !e.trim().is_empty()) {
        None => {
            if request.password != ctx.config.auth.admin_password {
                return Err(CallboardError::Auth("wrong password".into()).into());
            }
            SessionUser {
                user_id: "admin".into(),
                name: Some("관리자".into()),
                role: Role::Admin,
                actor_id: None,
            }
        }
        Some(email) => {
            let user = ctx
                .users
                .find_by_email(email)
                .await?
                .ok_or_else(|| CallboardError::Auth("unknown account".into()))?;
            let valid = user
                .password_hash
                .as_deref()
                .map(|stored| verify_password(&request.password, stored))
                .unwrap_or(false);
            if !valid {
                return Err(CallboardError::Auth("wrong password".into()).into());
            }
            SessionUser {
                user_id: user.id,
                name: user.name,
                role: user.role,
                actor_id: user.actor_id,
            }
        }
    };

    info!(user_id = %user.user_id, role = %user.role, "login");
    let response = LoginResponse {
        role: user.role,
        name: user.name.clone(),
        actor_id: user.actor_id.clone(),
        token: ctx.sessions.issue(user),
    };
    Ok(Json(response))
}
