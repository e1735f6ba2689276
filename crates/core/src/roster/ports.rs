//! Port interfaces for month-override persistence

use async_trait::async_trait;
use callboard_domain::{ActorMonthOverride, Result};

/// Trait for month-level override persistence
#[async_trait]
pub trait MonthOverrideRepository: Send + Sync {
    async fn find(
        &self,
        actor_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<ActorMonthOverride>>;

    async fn create(&self, row: &ActorMonthOverride) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Ids of every actor overridden for the given month.
    async fn find_actor_ids(&self, year: i32, month: u32) -> Result<Vec<String>>;
}
