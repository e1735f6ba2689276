//! Port interfaces for casting, actor, and user persistence

use async_trait::async_trait;
use callboard_domain::{Actor, ActorDetail, Casting, Result, RoleType, User};
use chrono::NaiveDate;

/// Trait for actor persistence
#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Actor>>;

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Actor>>;

    /// Full roster, ordered by role type then name.
    async fn find_all(&self) -> Result<Vec<Actor>>;

    /// Roster with linked-user and usage counts for the admin view.
    async fn list_detailed(&self) -> Result<Vec<ActorDetail>>;

    async fn create(&self, actor: &Actor) -> Result<()>;

    async fn update(&self, actor: &Actor) -> Result<()>;

    /// Delete the actor; castings, unavailability, and overrides cascade.
    async fn delete(&self, id: &str) -> Result<()>;

    async fn set_calendar_id(&self, id: &str, calendar_id: &str) -> Result<()>;
}

/// Trait for user-account persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// The user currently linked to the given actor, if any.
    async fn find_by_actor(&self, actor_id: &str) -> Result<Option<User>>;

    async fn update_email(&self, user_id: &str, email: Option<&str>) -> Result<()>;

    /// Link a user to an actor: detaches any previously linked user and
    /// sets the user's role to ACTOR, in one transaction.
    async fn link_actor(&self, user_id: &str, actor_id: &str) -> Result<()>;
}

/// One write of a batch casting transaction.
#[derive(Debug, Clone)]
pub enum CastingWrite {
    /// Upsert the slot's casting for the role; resets the sync flag and
    /// clears stored event ids.
    Assign { performance_date_id: String, actor_id: String, role_type: RoleType },
    /// Delete the slot's casting for the role.
    Unassign { performance_date_id: String, role_type: RoleType },
    /// Upsert the slot's reservation memo.
    Memo { performance_date_id: String, name: Option<String>, contact: Option<String> },
}

/// Trait for casting persistence
#[async_trait]
pub trait CastingRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Casting>>;

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Casting>>;

    /// Every casting, ordered by performance date.
    async fn find_all(&self) -> Result<Vec<Casting>>;

    async fn find_by_slot_and_role(
        &self,
        performance_date_id: &str,
        role_type: RoleType,
    ) -> Result<Option<Casting>>;

    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<Casting>>;

    async fn find_by_actor_and_performance_ids(
        &self,
        actor_id: &str,
        ids: &[String],
    ) -> Result<Vec<Casting>>;

    /// Create or update the slot's casting for the role. Updating sets the
    /// new actor, resets `synced`, and clears the stored event ids.
    async fn upsert(
        &self,
        performance_date_id: &str,
        actor_id: &str,
        role_type: RoleType,
    ) -> Result<Casting>;

    /// Delete and return the slot's casting rows for the role.
    async fn delete_by_slot_and_role(
        &self,
        performance_date_id: &str,
        role_type: RoleType,
    ) -> Result<Vec<Casting>>;

    /// Apply a batch of writes in one transaction. Partial application must
    /// not be observable.
    async fn apply_writes(&self, writes: &[CastingWrite]) -> Result<()>;

    /// Record a successful mirror: store event ids and set synced.
    async fn mark_synced(
        &self,
        id: &str,
        calendar_event_id: Option<&str>,
        all_calendar_event_id: Option<&str>,
    ) -> Result<()>;

    /// Rows not yet mirrored to the external calendars.
    async fn find_unsynced(&self) -> Result<Vec<Casting>>;

    /// MALE_LEAD castings on dates strictly after `date` that have a stored
    /// personal event id.
    async fn find_male_leads_with_events_after(&self, date: NaiveDate) -> Result<Vec<Casting>>;
}
