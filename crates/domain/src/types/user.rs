//! User account types

use serde::{Deserialize, Serialize};

/// Access role carried by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "ACTOR")]
    Actor,
}

crate::impl_domain_enum_conversions!(Role {
    Admin => "ADMIN",
    Actor => "ACTOR"
});

/// User account, optionally linked to an actor.
///
/// Linking sets `role` to ACTOR; an actor session may only read its own
/// schedule and write its own unavailability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    pub actor_id: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: i64,
}
