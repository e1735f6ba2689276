//! Request/response schemas for the JSON API.
//!
//! Every endpoint exchanges an explicit typed shape; field names follow
//! the camelCase convention the admin frontend and crawler already speak.

use std::collections::{BTreeMap, HashMap};

use callboard_domain::{
    ActorSummary, Booking, Casting, CastingChangeResult, ReservationStatus, Role, RoleType,
    UnavailableDate,
};
use serde::{Deserialize, Serialize};

/* ------------------------------- auth ---------------------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Present for actor logins; omitted for the admin password login.
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub name: Option<String>,
    pub actor_id: Option<String>,
}

/* ----------------------------- schedule --------------------------------- */

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub id: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastingView {
    pub actor_id: String,
    pub actor_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoView {
    pub reservation_name: Option<String>,
    pub reservation_contact: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    /// "YYYY-MM-DD" → slots, in date order.
    pub performances: BTreeMap<String, Vec<SlotView>>,
    /// "{performanceDateId}_{roleType}" → assigned actor.
    pub castings: HashMap<String, CastingView>,
    /// actorId → performanceDateIds the actor is unavailable for.
    pub unavailable: HashMap<String, Vec<String>>,
    pub actors: Vec<ActorSummary>,
    /// Admin only: actors hidden for this month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overridden_actors: Option<Vec<String>>,
    /// Admin only: performanceDateId → has_reservation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservations: Option<HashMap<String, bool>>,
    /// Admin only: performanceDateId → reservation memo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memos: Option<HashMap<String, MemoView>>,
}

/* ------------------------------ casting --------------------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub performance_date_id: String,
    #[serde(default)]
    pub actor_id: Option<String>,
    pub role_type: RoleType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignResponse {
    pub success: bool,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub casting: Option<Casting>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAssignRequest {
    pub changes: Vec<BatchChange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchChange {
    pub performance_date_id: String,
    pub role_type: RoleType,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub reservation_name: Option<String>,
    #[serde(default)]
    pub reservation_contact: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAssignResponse {
    pub success: bool,
    pub success_count: usize,
    pub fail_count: usize,
    pub results: Vec<CastingChangeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    pub casting_ids: Vec<String>,
}

/* ---------------------------- unavailability ----------------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableQuery {
    #[serde(default)]
    pub actor_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUnavailableRequest {
    pub actor_id: String,
    pub performance_date_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableView {
    pub id: String,
    pub actor_id: String,
    pub performance_date_id: String,
    pub synced: bool,
}

impl From<&UnavailableDate> for UnavailableView {
    fn from(row: &UnavailableDate) -> Self {
        Self {
            id: row.id.clone(),
            actor_id: row.actor_id.clone(),
            performance_date_id: row.performance_date_id.clone(),
            synced: row.synced,
        }
    }
}

/* ------------------------------- actors ---------------------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActorRequest {
    pub name: String,
    pub role_type: RoleType,
    #[serde(default)]
    pub calendar_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role_type: Option<RoleType>,
    /// Absent = unchanged, null = clear, string = set.
    #[serde(default, with = "double_option")]
    pub calendar_id: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub user_email: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkActorRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    pub actor_id: String,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Serialize)]
pub struct OverrideResponse {
    pub overridden: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/* ----------------------------- reservations ------------------------------ */

#[derive(Debug, Deserialize)]
pub struct RecordBookingsRequest {
    /// "YYYY-MM-DD".
    pub date: chrono::NaiveDate,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReservationsRequest {
    pub months: Vec<MonthRef>,
    /// "YYYY-MM-DD" → reserved "HH:MM" times.
    pub reservations: HashMap<String, Vec<String>>,
    /// "YYYY-MM-DD_HH:MM" → memo detail.
    #[serde(default)]
    pub booking_details: HashMap<String, BookingDetailDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailDto {
    #[serde(default)]
    pub reservation_name: Option<String>,
    #[serde(default)]
    pub reservation_contact: Option<String>,
}

pub fn memo_view(status: &ReservationStatus) -> MemoView {
    MemoView {
        reservation_name: status.reservation_name.clone(),
        reservation_contact: status.reservation_contact.clone(),
    }
}

/// Serde helper distinguishing a missing field from an explicit null.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
