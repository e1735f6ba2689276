//! Casting model types

use serde::{Deserialize, Serialize};

use super::actor::RoleType;

/// Role assignment for one performance slot.
///
/// Unique on (performance_date_id, role_type). `synced` tracks whether the
/// current state has been propagated to the external calendars; the event
/// id columns hold the mirrored events on the personal and aggregate
/// calendars once it has.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Casting {
    pub id: String,
    pub performance_date_id: String,
    pub actor_id: String,
    pub role_type: RoleType,
    pub synced: bool,
    pub calendar_event_id: Option<String>,
    pub all_calendar_event_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One entry of a batch casting request.
///
/// `actor_id == None` unassigns the slot. The optional memo fields update
/// the slot's reservation status in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastingChange {
    pub performance_date_id: String,
    pub role_type: RoleType,
    pub actor_id: Option<String>,
    #[serde(default)]
    pub reservation_name: Option<String>,
    #[serde(default)]
    pub reservation_contact: Option<String>,
}

/// Per-change outcome of a batch casting request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastingChangeResult {
    /// `{performanceDateId}_{roleType}` of the attempted change.
    pub key: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CastingChangeResult {
    pub fn ok(key: impl Into<String>) -> Self {
        Self { key: key.into(), success: true, error: None }
    }

    pub fn failed(key: impl Into<String>, error: impl Into<String>) -> Self {
        Self { key: key.into(), success: false, error: Some(error.into()) }
    }
}
