//! Wire types for the Google Calendar v3 API.

use serde::{Deserialize, Serialize};

/// Either an all-day date or a zoned date-time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn zoned(date_time: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self { date_time: Some(date_time.into()), date: None, time_zone: Some(time_zone.into()) }
    }

    pub fn all_day(date: impl Into<String>) -> Self {
        Self { date_time: None, date: Some(date.into()), time_zone: None }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventAttendee {
    pub email: String,
}

/// Event insert payload.
#[derive(Debug, Clone, Serialize)]
pub struct EventRequest {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(rename = "colorId", skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<EventAttendee>>,
}

/// Description-only patch. `None` serializes as an explicit null so the
/// provider clears the field instead of leaving it untouched.
#[derive(Debug, Clone, Serialize)]
pub struct EventPatch {
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventResponse {
    pub id: String,
}

/// Calendar insert payload (actor personal calendars).
#[derive(Debug, Clone, Serialize)]
pub struct CalendarRequest {
    pub summary: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

#[derive(Debug, Deserialize)]
pub struct CalendarResponse {
    pub id: String,
}

/// ACL insert payload for calendar sharing.
#[derive(Debug, Clone, Serialize)]
pub struct AclRequest {
    pub role: String,
    pub scope: AclScope,
}

#[derive(Debug, Clone, Serialize)]
pub struct AclScope {
    #[serde(rename = "type")]
    pub scope_type: String,
    pub value: String,
}
