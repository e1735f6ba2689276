//! Actor model types

use serde::{Deserialize, Serialize};

/// Which of the two lead roles an actor can be cast into.
///
/// A casting's role type always matches its actor's role type; the
/// assignment services reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleType {
    #[serde(rename = "MALE_LEAD")]
    MaleLead,
    #[serde(rename = "FEMALE_LEAD")]
    FemaleLead,
}

crate::impl_domain_enum_conversions!(RoleType {
    MaleLead => "MALE_LEAD",
    FemaleLead => "FEMALE_LEAD"
});

/// Actor record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role_type: RoleType,
    /// Personal Google calendar; role-default calendar is used when absent.
    pub calendar_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Roster entry exposed to schedule readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "roleType")]
    pub role_type: RoleType,
}

impl From<&Actor> for ActorSummary {
    fn from(actor: &Actor) -> Self {
        Self { id: actor.id.clone(), name: actor.name.clone(), role_type: actor.role_type }
    }
}

/// Fields required to create an actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActor {
    pub name: String,
    pub role_type: RoleType,
    pub calendar_id: Option<String>,
}

/// Partial actor update.
///
/// The double-`Option` fields distinguish "leave unchanged" (`None`) from
/// "set to this value, possibly clearing it" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorUpdate {
    pub name: Option<String>,
    pub role_type: Option<RoleType>,
    pub calendar_id: Option<Option<String>>,
    /// Email of the linked user account, when one exists.
    pub user_email: Option<Option<String>>,
}

/// Actor plus linked-account and usage info for the admin roster view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorDetail {
    #[serde(flatten)]
    pub actor: Actor,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub casting_count: i64,
    pub unavailable_count: i64,
}

/// Month-level unavailability override.
///
/// Hides an actor from the assignment candidate list for a whole
/// (year, month) without writing per-date rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorMonthOverride {
    pub id: String,
    pub actor_id: String,
    pub year: i32,
    pub month: u32,
    pub created_at: i64,
}
