//! Scheduled job adapters.

use std::sync::Arc;

use async_trait::async_trait;
use callboard_core::ReservationService;
use callboard_infra::{CleanupJob, InfraError};
use tracing::info;

/// Bridges the cron scheduler to the reservation memo cleanup.
pub struct MemoCleanupJob {
    reservation_service: Arc<ReservationService>,
}

impl MemoCleanupJob {
    pub fn new(reservation_service: Arc<ReservationService>) -> Self {
        Self { reservation_service }
    }
}

#[async_trait]
impl CleanupJob for MemoCleanupJob {
    async fn run(&self) -> Result<(), InfraError> {
        let report =
            self.reservation_service.cleanup_past_memos().await.map_err(InfraError::from)?;
        info!(
            cleaned = report.cleaned,
            calendar_updated = report.calendar_updated,
            "scheduled memo cleanup finished"
        );
        Ok(())
    }
}
