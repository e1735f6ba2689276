//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Fixed daily show times. Every calendar day gets one performance slot per
/// entry, generated lazily when a month is first queried.
pub const SHOW_TIMES: [&str; 5] = ["10:45", "13:00", "15:15", "17:30", "19:45"];

/// Default performance duration when a slot has no explicit end time.
pub const DEFAULT_PERFORMANCE_HOURS: u32 = 2;

/// Calendar timezone for all mirrored events.
pub const CALENDAR_TIMEZONE: &str = "Asia/Seoul";

/// KST offset from UTC in hours, used for "today" decisions.
pub const KST_OFFSET_HOURS: i32 = 9;

// Google Calendar color ids
pub const COLOR_MALE_LEAD: &str = "9"; // blue
pub const COLOR_FEMALE_LEAD: &str = "6"; // tangerine
pub const COLOR_UNAVAILABLE: &str = "11"; // red

/// Summary prefix for unavailable-date events.
pub const UNAVAILABLE_SUMMARY_PREFIX: &str = "[불가]";

/// Summary prefix for per-actor calendars created by provisioning.
pub const ACTOR_CALENDAR_PREFIX: &str = "공연 스케줄";

/// Timeout for the reservation-crawler webhook call.
pub const CRAWLER_WEBHOOK_TIMEOUT_SECS: u64 = 60;
