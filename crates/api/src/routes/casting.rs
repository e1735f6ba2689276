//! Casting endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use callboard_domain::CastingChange;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::context::AppContext;
use crate::dto::{
    AssignRequest, AssignResponse, BatchAssignRequest, NotifyRequest, BatchAssignResponse,
};
use crate::error::ApiResult;

/// GET /api/casting - every assignment with actor info.
pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    let castings = ctx.castings.find_all().await?;
    let actor_ids: Vec<String> = castings.iter().map(|c| c.actor_id.clone()).collect();
    let actors = ctx.actors.find_by_ids(&actor_ids).await?;
    let actor_map: HashMap<&str, (&str, callboard_domain::RoleType)> =
        actors.iter().map(|a| (a.id.as_str(), (a.name.as_str(), a.role_type))).collect();

    let body: Vec<Value> = castings
        .iter()
        .map(|c| {
            let actor = actor_map.get(c.actor_id.as_str());
            json!({
                "id": c.id,
                "performanceDateId": c.performance_date_id,
                "roleType": c.role_type,
                "synced": c.synced,
                "actor": actor.map(|(name, role)| json!({
                    "id": c.actor_id,
                    "name": name,
                    "roleType": role,
                })),
            })
        })
        .collect();

    Ok(Json(json!(body)))
}

/// POST /api/casting - assign or unassign one slot (admin only).
pub async fn assign(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<AssignRequest>,
) -> ApiResult<Json<AssignResponse>> {
    user.ensure_admin()?;

    let casting = ctx
        .casting_service
        .assign(
            &request.performance_date_id,
            request.actor_id.as_deref(),
            request.role_type,
        )
        .await?;

    Ok(Json(match casting {
        Some(casting) => {
            AssignResponse { success: true, action: "assigned", casting: Some(casting) }
        }
        None => AssignResponse { success: true, action: "removed", casting: None },
    }))
}

/// POST /api/casting/batch - apply many changes at once (admin only).
pub async fn assign_batch(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<BatchAssignRequest>,
) -> ApiResult<Json<BatchAssignResponse>> {
    user.ensure_admin()?;

    let changes: Vec<CastingChange> = request
        .changes
        .into_iter()
        .map(|c| CastingChange {
            performance_date_id: c.performance_date_id,
            role_type: c.role_type,
            actor_id: c.actor_id,
            reservation_name: c.reservation_name,
            reservation_contact: c.reservation_contact,
        })
        .collect();

    let results = ctx.casting_service.assign_batch(&changes).await?;
    let success_count = results.iter().filter(|r| r.success).count();

    Ok(Json(BatchAssignResponse {
        success: true,
        success_count,
        fail_count: results.len() - success_count,
        results,
    }))
}

/// POST /api/casting/notify - re-send calendar invites (admin only).
pub async fn notify(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<NotifyRequest>,
) -> ApiResult<Json<Value>> {
    user.ensure_admin()?;

    let report = ctx.casting_service.resend_notifications(&request.casting_ids).await?;
    Ok(Json(json!({
        "sent": report.sent,
        "failed": report.failed,
    })))
}
