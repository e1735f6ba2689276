//! Cron-triggered maintenance endpoints.
//!
//! Protected by the cron bearer secret when one is configured; open
//! otherwise (local development). The in-process scheduler covers the
//! memo cleanup too, so these exist for external schedulers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use callboard_domain::CallboardError;
use serde_json::{json, Value};

use crate::auth::bearer_token;
use crate::context::AppContext;
use crate::error::ApiResult;

fn check_cron_secret(ctx: &AppContext, headers: &HeaderMap) -> Result<(), CallboardError> {
    let Some(expected) = ctx.config.cron.secret.as_deref() else {
        return Ok(());
    };
    match bearer_token(headers) {
        Some(provided) if provided == expected => Ok(()),
        _ => Err(CallboardError::Auth("invalid cron secret".into())),
    }
}

/// GET /api/cron/cleanup-memos - null out past reservation memos.
pub async fn cleanup_memos(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    check_cron_secret(&ctx, &headers)?;

    let report = ctx.reservation_service.cleanup_past_memos().await?;
    Ok(Json(json!({
        "success": true,
        "cleaned": report.cleaned,
        "calendarUpdated": report.calendar_updated,
    })))
}

/// GET /api/cron/cleanup-future-descriptions - blank future MALE_LEAD
/// event descriptions.
pub async fn cleanup_future_descriptions(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    check_cron_secret(&ctx, &headers)?;

    let report = ctx.sync_service.cleanup_future_descriptions().await?;
    Ok(Json(json!({
        "success": true,
        "total": report.total,
        "cleaned": report.cleaned,
        "failed": report.failed,
    })))
}
