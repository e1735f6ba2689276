//! Manual calendar reconciliation endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use callboard_core::sync::SyncReport;

use crate::auth::CurrentUser;
use crate::context::AppContext;
use crate::error::ApiResult;

/// POST /api/calendar/sync - sweep every unsynced row (admin only).
pub async fn sync_all(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<SyncReport>> {
    user.ensure_admin()?;
    Ok(Json(ctx.sync_service.sync_all().await?))
}
