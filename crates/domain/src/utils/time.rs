//! Time helpers shared across services.
//!
//! Performance dates are stored as plain calendar dates and the theater
//! operates in KST, so "today" is always evaluated against a fixed UTC+9
//! offset rather than the server's local timezone.

use chrono::{Duration, FixedOffset, NaiveDate, Utc};

use crate::constants::KST_OFFSET_HOURS;

/// Today's calendar date in KST.
pub fn kst_today() -> NaiveDate {
    kst_offset()
        .map(|offset| Utc::now().with_timezone(&offset).date_naive())
        .unwrap_or_else(|| Utc::now().date_naive())
}

fn kst_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(KST_OFFSET_HOURS * 3600)
}

/// Add whole hours to an "HH:MM" string, wrapping at midnight.
///
/// Used for the default event end time when a slot has no explicit one.
pub fn add_hours(time: &str, hours: u32) -> Option<String> {
    let (hour_str, minute_str) = time.split_once(':')?;
    let hour: u32 = hour_str.parse().ok()?;
    let minute: u32 = minute_str.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(format!("{:02}:{:02}", (hour + hours) % 24, minute))
}

/// First day of the given month.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First day of the following month (exclusive upper bound for month
/// queries).
pub fn month_end_exclusive(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> Option<i64> {
    let start = month_start(year, month)?;
    let end = month_end_exclusive(year, month)?;
    Some((end - start).num_days())
}

/// Iterate every date of the given month.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(start) = month_start(year, month) else {
        return Vec::new();
    };
    let Some(end) = month_end_exclusive(year, month) else {
        return Vec::new();
    };
    let mut days = Vec::new();
    let mut day = start;
    while day < end {
        days.push(day);
        day += Duration::days(1);
    }
    days
}
