//! Port interfaces for schedule storage

use async_trait::async_trait;
use callboard_domain::{NewPerformanceSlot, PerformanceDate, Result, UnavailableDate};
use chrono::NaiveDate;

/// Trait for performance-slot persistence
#[async_trait]
pub trait PerformanceDateRepository: Send + Sync {
    /// All slots of a month, ordered by date then start time.
    async fn find_by_month(&self, year: i32, month: u32) -> Result<Vec<PerformanceDate>>;

    /// All slots on one calendar date.
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<PerformanceDate>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<PerformanceDate>>;

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<PerformanceDate>>;

    /// Every slot, ordered by date then start time.
    async fn find_all(&self) -> Result<Vec<PerformanceDate>>;

    /// Insert the given slots in one transaction. Implementations must not
    /// create a duplicate (date, start_time) pair.
    async fn insert_slots(&self, slots: &[NewPerformanceSlot]) -> Result<()>;
}

/// Trait for unavailability persistence
#[async_trait]
pub trait UnavailabilityRepository: Send + Sync {
    /// All rows for an actor, ordered by performance date.
    async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<UnavailableDate>>;

    async fn find_by_actor_and_performance(
        &self,
        actor_id: &str,
        performance_date_id: &str,
    ) -> Result<Option<UnavailableDate>>;

    /// All rows touching any of the given slots.
    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<UnavailableDate>>;

    /// Atomically apply a full-replace diff for one actor: create rows for
    /// `add`, delete the rows in `remove_ids`, and delete the conflicting
    /// castings in `casting_ids`, all in one transaction.
    async fn apply_replace(
        &self,
        actor_id: &str,
        add: &[String],
        remove_ids: &[String],
        casting_ids: &[String],
    ) -> Result<Vec<UnavailableDate>>;

    /// Rows not yet mirrored to the external calendars.
    async fn find_unsynced(&self) -> Result<Vec<UnavailableDate>>;

    /// Record a successful mirror: store event ids and set synced.
    async fn mark_synced(
        &self,
        id: &str,
        calendar_event_id: Option<&str>,
        all_calendar_event_id: Option<&str>,
    ) -> Result<()>;
}
