//! Thin REST client for the Google Calendar v3 API.

use std::sync::Arc;

use callboard_domain::{CallboardError, Result};
use reqwest::Client;
use tracing::debug;

use super::auth::CalendarTokenProvider;
use super::types::{
    AclRequest, AclScope, CalendarRequest, CalendarResponse, EventPatch, EventRequest,
    EventResponse,
};
use crate::errors::InfraError;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar API client with token management
pub struct GoogleCalendarClient {
    http: Client,
    api_base: String,
    tokens: Arc<CalendarTokenProvider>,
}

impl GoogleCalendarClient {
    pub fn new(http: Client, tokens: Arc<CalendarTokenProvider>) -> Self {
        Self { http, api_base: GOOGLE_CALENDAR_API_BASE.to_string(), tokens }
    }

    #[cfg(test)]
    pub(crate) fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Insert an event. `send_updates` controls attendee notifications.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        send_updates: bool,
        event: &EventRequest,
    ) -> Result<String> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/calendars/{}/events", self.api_base, calendar_id);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&[("sendUpdates", if send_updates { "all" } else { "none" })])
            .json(event)
            .send()
            .await
            .map_err(InfraError::from)?;

        let response = check_status(response).await?;
        let body: EventResponse = response.json().await.map_err(|e| {
            InfraError(CallboardError::ExternalService(format!(
                "failed to parse event response: {}",
                e
            )))
        })?;

        debug!(calendar_id, event_id = %body.id, "inserted calendar event");
        Ok(body.id)
    }

    /// Delete an event. `send_updates` requests cancellation notifications.
    pub async fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        send_updates: bool,
    ) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/calendars/{}/events/{}", self.api_base, calendar_id, event_id);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .query(&[("sendUpdates", if send_updates { "all" } else { "none" })])
            .send()
            .await
            .map_err(InfraError::from)?;

        check_status(response).await?;
        debug!(calendar_id, event_id, "deleted calendar event");
        Ok(())
    }

    /// Patch only the description of an event.
    pub async fn patch_event_description(
        &self,
        calendar_id: &str,
        event_id: &str,
        description: Option<&str>,
    ) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/calendars/{}/events/{}", self.api_base, calendar_id, event_id);

        let response = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .json(&EventPatch { description: description.map(str::to_string) })
            .send()
            .await
            .map_err(InfraError::from)?;

        check_status(response).await?;
        debug!(calendar_id, event_id, "patched event description");
        Ok(())
    }

    /// Create a new calendar.
    pub async fn insert_calendar(&self, summary: &str, time_zone: &str) -> Result<String> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/calendars", self.api_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&CalendarRequest { summary: summary.to_string(), time_zone: time_zone.to_string() })
            .send()
            .await
            .map_err(InfraError::from)?;

        let response = check_status(response).await?;
        let body: CalendarResponse = response.json().await.map_err(|e| {
            InfraError(CallboardError::ExternalService(format!(
                "failed to parse calendar response: {}",
                e
            )))
        })?;

        debug!(calendar_id = %body.id, "created calendar");
        Ok(body.id)
    }

    /// Grant an email address access to a calendar.
    pub async fn insert_acl(&self, calendar_id: &str, email: &str, role: &str) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/calendars/{}/acl", self.api_base, calendar_id);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&AclRequest {
                role: role.to_string(),
                scope: AclScope { scope_type: "user".to_string(), value: email.to_string() },
            })
            .send()
            .await
            .map_err(InfraError::from)?;

        check_status(response).await?;
        debug!(calendar_id, email, "shared calendar");
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
    let message = format!("calendar API error ({}): {}", status, error_text);
    Err(match status.as_u16() {
        401 | 403 => InfraError(CallboardError::Auth(message)),
        404 => InfraError(CallboardError::NotFound(message)),
        _ => InfraError(CallboardError::ExternalService(message)),
    }
    .into())
}
