//! Performance schedule model types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One performance slot: a calendar date plus one of the fixed show times.
///
/// Rows are generated lazily the first time a month is queried and are
/// unique on (date, start_time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceDate {
    pub id: String,
    pub date: NaiveDate,
    /// "HH:MM", one of [`crate::constants::SHOW_TIMES`].
    pub start_time: String,
    pub end_time: Option<String>,
    pub label: Option<String>,
    pub created_at: i64,
}

impl PerformanceDate {
    /// Key used to match slots against externally supplied (date, time)
    /// pairs, e.g. reservation feeds.
    pub fn slot_key(&self) -> String {
        format!("{}_{}", self.date, self.start_time)
    }
}

/// Parameters for a slot row created during month generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerformanceSlot {
    pub date: NaiveDate,
    pub start_time: String,
}

/// Unavailability declaration: the actor cannot perform at this slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableDate {
    pub id: String,
    pub actor_id: String,
    pub performance_date_id: String,
    pub synced: bool,
    pub calendar_event_id: Option<String>,
    pub all_calendar_event_id: Option<String>,
    pub created_at: i64,
}
