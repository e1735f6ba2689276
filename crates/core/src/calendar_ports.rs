//! Calendar integration port interfaces.
//!
//! The mirror keeps two external calendars in step with casting and
//! unavailability state: the actor's personal calendar (falling back to a
//! role-default calendar) and an aggregate calendar carrying every actor's
//! events. Callers treat every operation as best-effort: a failure leaves
//! the row's `synced` flag false for a later sweep and never fails the
//! admin request.

use async_trait::async_trait;
use callboard_domain::{Result, RoleType};
use chrono::NaiveDate;

/// Inputs for a mirrored casting event.
#[derive(Debug, Clone)]
pub struct CastingEventParams {
    pub role_type: RoleType,
    pub actor_name: String,
    pub date: NaiveDate,
    /// "HH:MM" show time.
    pub start_time: String,
    /// Optional explicit end; defaults to start + 2h.
    pub end_time: Option<String>,
    pub label: Option<String>,
    /// Personal calendar of the actor; role-default calendar when absent.
    pub actor_calendar_id: Option<String>,
    /// Linked account email; when present the personal event invites it.
    pub attendee_email: Option<String>,
    /// Description text (MALE_LEAD only: partner + reservation memo).
    pub description: Option<String>,
}

/// Trait for external calendar operations.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Insert a casting event on the actor's personal (or role-default)
    /// calendar. Returns the created event id.
    async fn create_casting_event(&self, params: &CastingEventParams) -> Result<String>;

    /// Insert the same casting event on the aggregate calendar, without
    /// attendees or invite semantics. Returns the created event id.
    async fn mirror_casting_event(&self, params: &CastingEventParams) -> Result<String>;

    /// Insert an all-day unavailability event on the given calendar.
    async fn create_unavailable_event(
        &self,
        calendar_id: &str,
        actor_name: &str,
        date: NaiveDate,
    ) -> Result<String>;

    /// Insert the all-day unavailability event on the aggregate calendar.
    async fn mirror_unavailable_event(&self, actor_name: &str, date: NaiveDate) -> Result<String>;

    /// Delete a casting event from the actor's personal (or role-default)
    /// calendar. `notify` requests attendee cancellation notifications.
    async fn delete_casting_event(
        &self,
        role_type: RoleType,
        actor_calendar_id: Option<&str>,
        event_id: &str,
        notify: bool,
    ) -> Result<()>;

    /// Delete an event from an explicit calendar.
    async fn delete_event(&self, calendar_id: &str, event_id: &str, notify: bool) -> Result<()>;

    /// Delete an event from the aggregate calendar. Never notifies.
    async fn delete_mirrored_event(&self, event_id: &str) -> Result<()>;

    /// Patch only the description of an existing casting event, leaving
    /// times and summary untouched. `None` clears the description.
    async fn update_event_description(
        &self,
        role_type: RoleType,
        actor_calendar_id: Option<&str>,
        event_id: &str,
        description: Option<&str>,
    ) -> Result<()>;

    /// Patch only the description of an aggregate-calendar event.
    async fn update_mirrored_description(
        &self,
        event_id: &str,
        description: Option<&str>,
    ) -> Result<()>;

    /// Create a dedicated calendar for an actor. Returns the calendar id.
    async fn create_actor_calendar(&self, actor_name: &str) -> Result<String>;

    /// Share a calendar with an email address (reader access).
    async fn share_calendar(&self, calendar_id: &str, email: &str) -> Result<()>;
}
