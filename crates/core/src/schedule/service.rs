//! Month-slot generation - core business logic

use std::collections::HashSet;
use std::sync::Arc;

use callboard_domain::constants::SHOW_TIMES;
use callboard_domain::utils::time::{days_in_month, month_days};
use callboard_domain::{CallboardError, NewPerformanceSlot, PerformanceDate, Result};
use tracing::debug;

use super::ports::PerformanceDateRepository;

/// Lazily materializes the fixed day × show-time grid for a month.
pub struct ScheduleService {
    performances: Arc<dyn PerformanceDateRepository>,
}

impl ScheduleService {
    pub fn new(performances: Arc<dyn PerformanceDateRepository>) -> Self {
        Self { performances }
    }

    /// Ensure every (day, show-time) slot of the month exists, then return
    /// the month's slots ordered by date and start time.
    ///
    /// The common case, an already complete month, costs a single
    /// read. Otherwise only the missing pairs are inserted, in one
    /// transaction, and the month is re-read for ordering. Partial prior
    /// generation is completed, never reset; the (date, start_time) unique
    /// constraint keeps concurrent callers from duplicating a slot.
    pub async fn ensure_month(&self, year: i32, month: u32) -> Result<Vec<PerformanceDate>> {
        let days = days_in_month(year, month).ok_or_else(|| {
            CallboardError::InvalidInput(format!("invalid year/month: {}-{}", year, month))
        })?;
        let expected = days as usize * SHOW_TIMES.len();

        let existing = self.performances.find_by_month(year, month).await?;
        if existing.len() >= expected {
            return Ok(existing);
        }

        let existing_keys: HashSet<String> =
            existing.iter().map(PerformanceDate::slot_key).collect();

        let mut missing = Vec::new();
        for day in month_days(year, month) {
            for time in SHOW_TIMES {
                if !existing_keys.contains(&format!("{}_{}", day, time)) {
                    missing.push(NewPerformanceSlot { date: day, start_time: time.to_string() });
                }
            }
        }

        if missing.is_empty() {
            return Ok(existing);
        }

        debug!(year, month, created = missing.len(), "completing month slots");
        self.performances.insert_slots(&missing).await?;

        self.performances.find_by_month(year, month).await
    }
}
