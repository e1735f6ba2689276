//! Unavailability endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::{Extension, Json};
use callboard_domain::CallboardError;

use crate::auth::CurrentUser;
use crate::context::AppContext;
use crate::dto::{SetUnavailableRequest, UnavailableQuery, UnavailableView};
use crate::error::ApiResult;

/// GET /api/unavailable?actorId= - list unavailability rows.
///
/// Actor sessions only see their own rows regardless of the query.
pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<UnavailableQuery>,
) -> ApiResult<Json<Vec<UnavailableView>>> {
    let actor_id = if user.is_admin() {
        query.actor_id
    } else {
        user.actor_id.clone()
    };

    let rows = match actor_id {
        Some(actor_id) => ctx.unavailability.find_by_actor(&actor_id).await?,
        None => {
            // Admin overview: every row, grouped client-side.
            let slots = ctx.performances.find_all().await?;
            let ids: Vec<String> = slots.iter().map(|p| p.id.clone()).collect();
            ctx.unavailability.find_by_performance_ids(&ids).await?
        }
    };

    Ok(Json(rows.iter().map(Into::into).collect()))
}

/// POST /api/unavailable - full-replace an actor's unavailable slots.
///
/// Actors may only write their own; admins may write anyone's.
pub async fn set_unavailable(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<SetUnavailableRequest>,
) -> ApiResult<Json<Vec<UnavailableView>>> {
    if !user.is_admin() && user.actor_id.as_deref() != Some(request.actor_id.as_str()) {
        return Err(
            CallboardError::Forbidden("cannot edit another actor's schedule".into()).into()
        );
    }

    let rows = ctx
        .availability_service
        .set_unavailable(&request.actor_id, &request.performance_date_ids)
        .await?;

    Ok(Json(rows.iter().map(Into::into).collect()))
}
