//! Schedule read endpoints.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::{Extension, Json};
use callboard_domain::utils::time::kst_today;
use callboard_domain::CallboardError;
use chrono::Datelike;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::context::AppContext;
use crate::dto::{memo_view, CastingView, ScheduleQuery, ScheduleResponse, SlotView};
use crate::error::ApiResult;

/// GET /api/schedule?year=&month=
///
/// Materializes the month on first read, then returns the grouped slots,
/// assignment map, unavailability map, and roster. Admin sessions also get
/// the month-override set and the reservation status/memo maps.
pub async fn get_schedule(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Json<ScheduleResponse>> {
    let today = kst_today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(CallboardError::InvalidInput(format!("invalid month: {}", month)).into());
    }

    let slots = ctx.schedule_service.ensure_month(year, month).await?;
    let slot_ids: Vec<String> = slots.iter().map(|p| p.id.clone()).collect();

    let (actors, castings, unavailable) = tokio::join!(
        ctx.actors.find_all(),
        ctx.castings.find_by_performance_ids(&slot_ids),
        ctx.unavailability.find_by_performance_ids(&slot_ids),
    );
    let actors = actors?;
    let actor_names: HashMap<&str, &str> =
        actors.iter().map(|a| (a.id.as_str(), a.name.as_str())).collect();

    let mut performances: BTreeMap<String, Vec<SlotView>> = BTreeMap::new();
    for slot in &slots {
        performances.entry(slot.date.to_string()).or_default().push(SlotView {
            id: slot.id.clone(),
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            label: slot.label.clone(),
        });
    }

    let mut casting_map = HashMap::new();
    for casting in castings? {
        let Some(name) = actor_names.get(casting.actor_id.as_str()) else {
            continue;
        };
        casting_map.insert(
            format!("{}_{}", casting.performance_date_id, casting.role_type),
            CastingView { actor_id: casting.actor_id.clone(), actor_name: (*name).to_string() },
        );
    }

    let mut unavailable_map: HashMap<String, Vec<String>> = HashMap::new();
    for row in unavailable? {
        unavailable_map.entry(row.actor_id).or_default().push(row.performance_date_id);
    }

    let (overridden_actors, reservations, memos) = if user.is_admin() {
        let (overridden, statuses) = tokio::join!(
            ctx.overrides.find_actor_ids(year, month),
            ctx.reservations.find_by_performance_ids(&slot_ids),
        );
        let statuses = statuses?;

        let reservation_map: HashMap<String, bool> = statuses
            .iter()
            .map(|s| (s.performance_date_id.clone(), s.has_reservation))
            .collect();
        let memo_map: HashMap<String, crate::dto::MemoView> = statuses
            .iter()
            .filter(|s| s.reservation_name.is_some() || s.reservation_contact.is_some())
            .map(|s| (s.performance_date_id.clone(), memo_view(s)))
            .collect();

        (Some(overridden?), Some(reservation_map), Some(memo_map))
    } else {
        (None, None, None)
    };

    Ok(Json(ScheduleResponse {
        performances,
        castings: casting_map,
        unavailable: unavailable_map,
        actors: actors.iter().map(Into::into).collect(),
        overridden_actors,
        reservations,
        memos,
    }))
}

/// GET /api/performances - every slot with its castings.
pub async fn list_performances(
    State(ctx): State<Arc<AppContext>>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    let slots = ctx.performances.find_all().await?;
    let slot_ids: Vec<String> = slots.iter().map(|p| p.id.clone()).collect();

    let (castings, actors) =
        tokio::join!(ctx.castings.find_by_performance_ids(&slot_ids), ctx.actors.find_all());
    let actors = actors?;
    let actor_names: HashMap<&str, &str> =
        actors.iter().map(|a| (a.id.as_str(), a.name.as_str())).collect();

    let mut castings_by_slot: HashMap<String, Vec<Value>> = HashMap::new();
    for casting in castings? {
        let name = actor_names.get(casting.actor_id.as_str()).copied().unwrap_or_default();
        castings_by_slot.entry(casting.performance_date_id.clone()).or_default().push(json!({
            "id": casting.id,
            "roleType": casting.role_type,
            "actor": { "id": casting.actor_id, "name": name },
        }));
    }

    let body: Vec<Value> = slots
        .iter()
        .map(|slot| {
            json!({
                "id": slot.id,
                "date": slot.date,
                "startTime": slot.start_time,
                "endTime": slot.end_time,
                "label": slot.label,
                "castings": castings_by_slot.remove(&slot.id).unwrap_or_default(),
            })
        })
        .collect();

    Ok(Json(json!(body)))
}
