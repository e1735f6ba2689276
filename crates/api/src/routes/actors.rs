//! Actor management endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use callboard_domain::{Actor, ActorDetail, ActorUpdate, NewActor};

use crate::auth::CurrentUser;
use crate::context::AppContext;
use crate::dto::{
    CreateActorRequest, LinkActorRequest, OverrideRequest, OverrideResponse, SuccessResponse,
    UpdateActorRequest,
};
use crate::error::ApiResult;

/// GET /api/actors - roster with linked accounts and usage counts.
pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<ActorDetail>>> {
    Ok(Json(ctx.roster_service.list().await?))
}

/// POST /api/actors - create an actor (admin only).
pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<CreateActorRequest>,
) -> ApiResult<(StatusCode, Json<Actor>)> {
    user.ensure_admin()?;

    let actor = ctx
        .roster_service
        .create(NewActor {
            name: request.name,
            role_type: request.role_type,
            calendar_id: request.calendar_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(actor)))
}

/// PUT /api/actors/{id} - partial update (admin only).
pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateActorRequest>,
) -> ApiResult<Json<Actor>> {
    user.ensure_admin()?;

    let actor = ctx
        .roster_service
        .update(
            &id,
            ActorUpdate {
                name: request.name,
                role_type: request.role_type,
                calendar_id: request.calendar_id,
                user_email: request.user_email,
            },
        )
        .await?;

    Ok(Json(actor))
}

/// DELETE /api/actors/{id} - delete with cascade (admin only).
pub async fn remove(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    user.ensure_admin()?;
    ctx.roster_service.delete(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/actors/{id}/link - link a user account (admin only).
pub async fn link(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<LinkActorRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    user.ensure_admin()?;
    ctx.roster_service.link_user(&id, &request.user_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/actors/calendars - provision personal calendars (admin only).
pub async fn provision_calendars(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<callboard_core::roster::service::ProvisionReport>> {
    user.ensure_admin()?;
    Ok(Json(ctx.roster_service.provision_calendars().await?))
}

/// POST /api/actor-override - toggle a month-level override (admin only).
pub async fn toggle_override(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<OverrideRequest>,
) -> ApiResult<Json<OverrideResponse>> {
    user.ensure_admin()?;

    let overridden = ctx
        .roster_service
        .toggle_override(&request.actor_id, request.year, request.month)
        .await?;

    Ok(Json(OverrideResponse { overridden }))
}
