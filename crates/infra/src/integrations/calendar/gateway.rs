//! Adapter implementing the core calendar port over the REST client.

use async_trait::async_trait;
use callboard_core::calendar_ports::{CalendarGateway, CastingEventParams};
use callboard_domain::constants::{
    ACTOR_CALENDAR_PREFIX, CALENDAR_TIMEZONE, COLOR_FEMALE_LEAD, COLOR_MALE_LEAD,
    COLOR_UNAVAILABLE, DEFAULT_PERFORMANCE_HOURS, UNAVAILABLE_SUMMARY_PREFIX,
};
use callboard_domain::utils::time::add_hours;
use callboard_domain::{CalendarConfig, CallboardError, Result, RoleType};
use chrono::NaiveDate;

use super::client::GoogleCalendarClient;
use super::types::{EventAttendee, EventDateTime, EventRequest};

/// Google-backed implementation of the calendar port.
pub struct GoogleCalendarGateway {
    client: GoogleCalendarClient,
    config: CalendarConfig,
}

impl GoogleCalendarGateway {
    pub fn new(client: GoogleCalendarClient, config: CalendarConfig) -> Self {
        Self { client, config }
    }

    /// Personal calendar when the actor has one, role default otherwise.
    fn casting_calendar<'a>(
        &'a self,
        role_type: RoleType,
        actor_calendar_id: Option<&'a str>,
    ) -> &'a str {
        actor_calendar_id.unwrap_or(match role_type {
            RoleType::MaleLead => self.config.male_lead_calendar_id.as_str(),
            RoleType::FemaleLead => self.config.female_lead_calendar_id.as_str(),
        })
    }

    fn casting_request(
        &self,
        params: &CastingEventParams,
        with_attendee: bool,
    ) -> Result<EventRequest> {
        let summary = event_summary(&params.actor_name, params.label.as_deref());
        let (start, end) = event_times(params.date, &params.start_time, params.end_time.as_deref())?;

        let attendees = if with_attendee {
            params
                .attendee_email
                .as_ref()
                .map(|email| vec![EventAttendee { email: email.clone() }])
        } else {
            None
        };

        Ok(EventRequest {
            summary,
            description: params.description.clone(),
            start: EventDateTime::zoned(start, CALENDAR_TIMEZONE),
            end: EventDateTime::zoned(end, CALENDAR_TIMEZONE),
            color_id: Some(
                match params.role_type {
                    RoleType::MaleLead => COLOR_MALE_LEAD,
                    RoleType::FemaleLead => COLOR_FEMALE_LEAD,
                }
                .to_string(),
            ),
            attendees,
        })
    }

    fn unavailable_request(actor_name: &str, date: NaiveDate) -> EventRequest {
        EventRequest {
            summary: format!("{} {}", UNAVAILABLE_SUMMARY_PREFIX, actor_name),
            description: None,
            start: EventDateTime::all_day(date.to_string()),
            end: EventDateTime::all_day(date.to_string()),
            color_id: Some(COLOR_UNAVAILABLE.to_string()),
            attendees: None,
        }
    }
}

fn event_summary(actor_name: &str, label: Option<&str>) -> String {
    match label.filter(|l| !l.trim().is_empty()) {
        Some(label) => format!("{} ({})", actor_name, label),
        None => actor_name.to_string(),
    }
}

fn event_times(
    date: NaiveDate,
    start_time: &str,
    end_time: Option<&str>,
) -> Result<(String, String)> {
    let end = match end_time.filter(|t| !t.is_empty()) {
        Some(end) => end.to_string(),
        None => add_hours(start_time, DEFAULT_PERFORMANCE_HOURS).ok_or_else(|| {
            CallboardError::InvalidInput(format!("invalid start time: {}", start_time))
        })?,
    };
    Ok((format!("{}T{}:00", date, start_time), format!("{}T{}:00", date, end)))
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    async fn create_casting_event(&self, params: &CastingEventParams) -> Result<String> {
        let calendar_id =
            self.casting_calendar(params.role_type, params.actor_calendar_id.as_deref());
        let request = self.casting_request(params, true)?;
        let notify = request.attendees.is_some();
        self.client.insert_event(calendar_id, notify, &request).await
    }

    async fn mirror_casting_event(&self, params: &CastingEventParams) -> Result<String> {
        let request = self.casting_request(params, false)?;
        self.client
            .insert_event(&self.config.all_actors_calendar_id, false, &request)
            .await
    }

    async fn create_unavailable_event(
        &self,
        calendar_id: &str,
        actor_name: &str,
        date: NaiveDate,
    ) -> Result<String> {
        let request = Self::unavailable_request(actor_name, date);
        self.client.insert_event(calendar_id, false, &request).await
    }

    async fn mirror_unavailable_event(&self, actor_name: &str, date: NaiveDate) -> Result<String> {
        let request = Self::unavailable_request(actor_name, date);
        self.client
            .insert_event(&self.config.all_actors_calendar_id, false, &request)
            .await
    }

    async fn delete_casting_event(
        &self,
        role_type: RoleType,
        actor_calendar_id: Option<&str>,
        event_id: &str,
        notify: bool,
    ) -> Result<()> {
        let calendar_id = self.casting_calendar(role_type, actor_calendar_id);
        self.client.delete_event(calendar_id, event_id, notify).await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str, notify: bool) -> Result<()> {
        self.client.delete_event(calendar_id, event_id, notify).await
    }

    async fn delete_mirrored_event(&self, event_id: &str) -> Result<()> {
        self.client
            .delete_event(&self.config.all_actors_calendar_id, event_id, false)
            .await
    }

    async fn update_event_description(
        &self,
        role_type: RoleType,
        actor_calendar_id: Option<&str>,
        event_id: &str,
        description: Option<&str>,
    ) -> Result<()> {
        let calendar_id = self.casting_calendar(role_type, actor_calendar_id);
        self.client.patch_event_description(calendar_id, event_id, description).await
    }

    async fn update_mirrored_description(
        &self,
        event_id: &str,
        description: Option<&str>,
    ) -> Result<()> {
        self.client
            .patch_event_description(&self.config.all_actors_calendar_id, event_id, description)
            .await
    }

    async fn create_actor_calendar(&self, actor_name: &str) -> Result<String> {
        self.client
            .insert_calendar(
                &format!("{} - {}", ACTOR_CALENDAR_PREFIX, actor_name),
                CALENDAR_TIMEZONE,
            )
            .await
    }

    async fn share_calendar(&self, calendar_id: &str, email: &str) -> Result<()> {
        self.client.insert_acl(calendar_id, email, "reader").await
    }
}

/// Gateway used when the calendar integration is turned off. Every call
/// fails with a config error, which the services absorb, so rows simply
/// accumulate unsynced.
pub struct DisabledCalendarGateway;

#[async_trait]
impl CalendarGateway for DisabledCalendarGateway {
    async fn create_casting_event(&self, _params: &CastingEventParams) -> Result<String> {
        Err(disabled())
    }

    async fn mirror_casting_event(&self, _params: &CastingEventParams) -> Result<String> {
        Err(disabled())
    }

    async fn create_unavailable_event(
        &self,
        _calendar_id: &str,
        _actor_name: &str,
        _date: NaiveDate,
    ) -> Result<String> {
        Err(disabled())
    }

    async fn mirror_unavailable_event(
        &self,
        _actor_name: &str,
        _date: NaiveDate,
    ) -> Result<String> {
        Err(disabled())
    }

    async fn delete_casting_event(
        &self,
        _role_type: RoleType,
        _actor_calendar_id: Option<&str>,
        _event_id: &str,
        _notify: bool,
    ) -> Result<()> {
        Err(disabled())
    }

    async fn delete_event(&self, _calendar_id: &str, _event_id: &str, _notify: bool) -> Result<()> {
        Err(disabled())
    }

    async fn delete_mirrored_event(&self, _event_id: &str) -> Result<()> {
        Err(disabled())
    }

    async fn update_event_description(
        &self,
        _role_type: RoleType,
        _actor_calendar_id: Option<&str>,
        _event_id: &str,
        _description: Option<&str>,
    ) -> Result<()> {
        Err(disabled())
    }

    async fn update_mirrored_description(
        &self,
        _event_id: &str,
        _description: Option<&str>,
    ) -> Result<()> {
        Err(disabled())
    }

    async fn create_actor_calendar(&self, _actor_name: &str) -> Result<String> {
        Err(disabled())
    }

    async fn share_calendar(&self, _calendar_id: &str, _email: &str) -> Result<()> {
        Err(disabled())
    }
}

fn disabled() -> CallboardError {
    CallboardError::Config("calendar integration disabled".into())
}
