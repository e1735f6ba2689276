//! Actor roster service - core business logic

use std::sync::Arc;

use callboard_domain::{
    Actor, ActorDetail, ActorMonthOverride, ActorUpdate, CallboardError, NewActor, Result,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::ports::MonthOverrideRepository;
use crate::calendar_ports::CalendarGateway;
use crate::casting::ports::{ActorRepository, UserRepository};

/// Outcome of a calendar provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionReport {
    pub created: usize,
    pub shared: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Actor roster service
pub struct RosterService {
    actors: Arc<dyn ActorRepository>,
    users: Arc<dyn UserRepository>,
    overrides: Arc<dyn MonthOverrideRepository>,
    calendar: Arc<dyn CalendarGateway>,
}

impl RosterService {
    pub fn new(
        actors: Arc<dyn ActorRepository>,
        users: Arc<dyn UserRepository>,
        overrides: Arc<dyn MonthOverrideRepository>,
        calendar: Arc<dyn CalendarGateway>,
    ) -> Self {
        Self { actors, users, overrides, calendar }
    }

    /// Roster with linked-account and usage info.
    pub async fn list(&self) -> Result<Vec<ActorDetail>> {
        self.actors.list_detailed().await
    }

    pub async fn create(&self, new_actor: NewActor) -> Result<Actor> {
        if new_actor.name.trim().is_empty() {
            return Err(CallboardError::InvalidInput("name must not be empty".into()));
        }

        let now = Utc::now().timestamp();
        let actor = Actor {
            id: Uuid::now_v7().to_string(),
            name: new_actor.name,
            role_type: new_actor.role_type,
            calendar_id: new_actor.calendar_id.filter(|c| !c.is_empty()),
            created_at: now,
            updated_at: now,
        };
        self.actors.create(&actor).await?;
        Ok(actor)
    }

    pub async fn update(&self, id: &str, update: ActorUpdate) -> Result<Actor> {
        let mut actor = self
            .actors
            .find_by_id(id)
            .await?
            .ok_or_else(|| CallboardError::NotFound(format!("actor not found: {}", id)))?;

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(CallboardError::InvalidInput("name must not be empty".into()));
            }
            actor.name = name;
        }
        if let Some(role_type) = update.role_type {
            actor.role_type = role_type;
        }
        if let Some(calendar_id) = update.calendar_id {
            actor.calendar_id = calendar_id.filter(|c| !c.is_empty());
        }
        actor.updated_at = Utc::now().timestamp();
        self.actors.update(&actor).await?;

        if let Some(user_email) = update.user_email {
            self.update_linked_email(id, user_email).await?;
        }

        Ok(actor)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if self.actors.find_by_id(id).await?.is_none() {
            return Err(CallboardError::NotFound(format!("actor not found: {}", id)));
        }
        self.actors.delete(id).await
    }

    /// Link a user account to an actor. Any previously linked user is
    /// detached; the user's role becomes ACTOR.
    pub async fn link_user(&self, actor_id: &str, user_id: &str) -> Result<()> {
        if self.actors.find_by_id(actor_id).await?.is_none() {
            return Err(CallboardError::NotFound(format!("actor not found: {}", actor_id)));
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(CallboardError::NotFound(format!("user not found: {}", user_id)));
        }
        self.users.link_actor(user_id, actor_id).await
    }

    /// Create personal calendars for every actor that lacks one and share
    /// them with the linked account. Existing calendars only get the share
    /// retried.
    pub async fn provision_calendars(&self) -> Result<ProvisionReport> {
        let actors = self.actors.find_all().await?;

        let mut report = ProvisionReport { created: 0, shared: 0, skipped: 0, errors: Vec::new() };

        for actor in actors {
            let email = self.users.find_by_actor(&actor.id).await?.and_then(|u| u.email);

            if let Some(calendar_id) = &actor.calendar_id {
                if let Some(email) = &email {
                    match self.calendar.share_calendar(calendar_id, email).await {
                        Ok(()) => report.shared += 1,
                        Err(err) => {
                            warn!(error = %err, actor = %actor.name, "calendar share failed");
                        }
                    }
                }
                report.skipped += 1;
                continue;
            }

            let calendar_id = match self.calendar.create_actor_calendar(&actor.name).await {
                Ok(id) => id,
                Err(err) => {
                    report.errors.push(format!("{}: calendar creation failed ({})", actor.name, err));
                    continue;
                }
            };

            self.actors.set_calendar_id(&actor.id, &calendar_id).await?;
            report.created += 1;

            if let Some(email) = &email {
                match self.calendar.share_calendar(&calendar_id, email).await {
                    Ok(()) => report.shared += 1,
                    Err(err) => {
                        report.errors.push(format!("{}: share failed ({})", actor.name, err));
                    }
                }
            }
        }

        Ok(report)
    }

    /// Toggle an actor's month-level override. Returns the new state.
    pub async fn toggle_override(&self, actor_id: &str, year: i32, month: u32) -> Result<bool> {
        if self.actors.find_by_id(actor_id).await?.is_none() {
            return Err(CallboardError::NotFound(format!("actor not found: {}", actor_id)));
        }

        if let Some(existing) = self.overrides.find(actor_id, year, month).await? {
            self.overrides.delete(&existing.id).await?;
            return Ok(false);
        }

        let row = ActorMonthOverride {
            id: Uuid::now_v7().to_string(),
            actor_id: actor_id.to_string(),
            year,
            month,
            created_at: Utc::now().timestamp(),
        };
        self.overrides.create(&row).await?;
        Ok(true)
    }

    /// Ids of every actor hidden for the given month.
    pub async fn overridden_actors(&self, year: i32, month: u32) -> Result<Vec<String>> {
        self.overrides.find_actor_ids(year, month).await
    }

    async fn update_linked_email(&self, actor_id: &str, email: Option<String>) -> Result<()> {
        let Some(linked) = self.users.find_by_actor(actor_id).await? else {
            return Ok(());
        };

        let email = email.filter(|e| !e.trim().is_empty());
        if let Some(email) = &email {
            if let Some(other) = self.users.find_by_email(email).await? {
                if other.id != linked.id {
                    return Err(CallboardError::InvalidInput(format!(
                        "email already in use: {}",
                        email
                    )));
                }
            }
        }

        self.users.update_email(&linked.id, email.as_deref()).await
    }
}
