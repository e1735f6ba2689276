//! Reservation ingestion endpoints.
//!
//! These are machine endpoints: the crawler authenticates with a static
//! bearer API key, never a session. Only the manual trigger is an admin
//! session operation.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use callboard_core::reservation::service::BookingDetail;
use callboard_domain::CallboardError;
use serde_json::{json, Value};

use crate::auth::{bearer_token, CurrentUser};
use crate::context::AppContext;
use crate::dto::{RecordBookingsRequest, SyncReservationsRequest};
use crate::error::ApiResult;

fn check_api_key(ctx: &AppContext, headers: &HeaderMap) -> Result<(), CallboardError> {
    let expected = &ctx.config.reservation.api_key;
    if expected.is_empty() {
        return Err(CallboardError::Config("reservation API key not configured".into()));
    }
    match bearer_token(headers) {
        Some(provided) if provided == expected => Ok(()),
        _ => Err(CallboardError::Auth("invalid reservation API key".into())),
    }
}

/// POST /api/reservations/bookings - one day's bookings from the crawler.
pub async fn record_bookings(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(request): Json<RecordBookingsRequest>,
) -> ApiResult<Json<Value>> {
    check_api_key(&ctx, &headers)?;

    let outcomes =
        ctx.reservation_service.record_bookings(request.date, &request.bookings).await?;
    let success_count = outcomes.iter().filter(|o| o.success).count();
    let fail_count = outcomes.len() - success_count;

    Ok(Json(json!({
        "success": true,
        "date": request.date,
        "successCount": success_count,
        "failCount": fail_count,
        "results": outcomes,
    })))
}

/// POST /api/reservations/sync - full-month snapshot reconciliation.
pub async fn sync_reservations(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(request): Json<SyncReservationsRequest>,
) -> ApiResult<Json<Value>> {
    check_api_key(&ctx, &headers)?;

    let months: Vec<(i32, u32)> = request.months.iter().map(|m| (m.year, m.month)).collect();
    let details: HashMap<String, BookingDetail> = request
        .booking_details
        .into_iter()
        .map(|(key, detail)| {
            (
                key,
                BookingDetail {
                    reservation_name: detail.reservation_name,
                    reservation_contact: detail.reservation_contact,
                },
            )
        })
        .collect();

    let report = ctx
        .reservation_service
        .sync_reservations(&months, &request.reservations, &details)
        .await?;

    Ok(Json(json!({
        "success": true,
        "total": report.total,
        "reserved": report.reserved,
    })))
}

/// POST /api/reservations/trigger-sync - kick the crawler (admin only).
pub async fn trigger_sync(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    user.ensure_admin()?;

    let result = ctx.reservation_service.trigger_sync().await?;
    Ok(Json(json!({ "success": true, "result": result })))
}
