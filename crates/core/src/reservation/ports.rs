//! Port interfaces for reservation state and the crawler integration

use async_trait::async_trait;
use callboard_domain::{ReservationStatus, Result};
use chrono::NaiveDate;

/// One row of a bulk reservation reconciliation.
#[derive(Debug, Clone)]
pub struct ReservationUpsert {
    pub performance_date_id: String,
    pub has_reservation: bool,
    /// `None` clears any stored memo; bulk reconciliation always rewrites
    /// the memo fields.
    pub reservation_name: Option<String>,
    pub reservation_contact: Option<String>,
}

/// Trait for reservation-status persistence
#[async_trait]
pub trait ReservationStatusRepository: Send + Sync {
    async fn find_by_performance_id(
        &self,
        performance_date_id: &str,
    ) -> Result<Option<ReservationStatus>>;

    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<ReservationStatus>>;

    /// Upsert one slot's status, refreshing `checked_at`. `None` memo
    /// fields are left unchanged on an existing row.
    async fn upsert(
        &self,
        performance_date_id: &str,
        has_reservation: bool,
        reservation_name: Option<&str>,
        reservation_contact: Option<&str>,
    ) -> Result<ReservationStatus>;

    /// Apply a bulk reconciliation in one transaction, rewriting flag and
    /// memo for every entry.
    async fn bulk_upsert(&self, entries: &[ReservationUpsert]) -> Result<()>;

    /// Rows for performances strictly before `date` that still carry a
    /// memo (name or contact non-null).
    async fn find_past_with_memo(&self, date: NaiveDate) -> Result<Vec<ReservationStatus>>;

    /// Null out a row's memo fields.
    async fn clear_memo(&self, id: &str) -> Result<()>;
}

/// Trait for kicking the external reservation crawler.
#[async_trait]
pub trait CrawlerTrigger: Send + Sync {
    /// Ask the crawler service to run a sync now. Returns the upstream
    /// response payload.
    async fn trigger(&self) -> Result<serde_json::Value>;
}
