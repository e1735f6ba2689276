//! Availability guard service - core business logic
//!
//! Unavailability uses full-replace semantics: the caller sends the actor's
//! complete set of blocked slots and the service diffs it against the
//! stored rows. A newly blocked slot the actor is currently cast into gets
//! that casting removed in the same transaction; the calendar cleanup runs
//! afterwards, best-effort.

use std::collections::HashSet;
use std::sync::Arc;

use callboard_domain::{CallboardError, Result, RoleType, UnavailableDate};
use tracing::{debug, warn};

use crate::calendar_ports::CalendarGateway;
use crate::casting::ports::{ActorRepository, CastingRepository};
use crate::casting::service::CastingService;
use crate::schedule::ports::{PerformanceDateRepository, UnavailabilityRepository};

/// Availability guard service
pub struct AvailabilityService {
    actors: Arc<dyn ActorRepository>,
    castings: Arc<dyn CastingRepository>,
    performances: Arc<dyn PerformanceDateRepository>,
    unavailability: Arc<dyn UnavailabilityRepository>,
    calendar: Arc<dyn CalendarGateway>,
    casting: Arc<CastingService>,
}

impl AvailabilityService {
    pub fn new(
        actors: Arc<dyn ActorRepository>,
        castings: Arc<dyn CastingRepository>,
        performances: Arc<dyn PerformanceDateRepository>,
        unavailability: Arc<dyn UnavailabilityRepository>,
        calendar: Arc<dyn CalendarGateway>,
        casting: Arc<CastingService>,
    ) -> Self {
        Self { actors, castings, performances, unavailability, calendar, casting }
    }

    /// Replace an actor's unavailable slots with the given set.
    ///
    /// Returns the actor's unavailability rows after the replacement.
    pub async fn set_unavailable(
        &self,
        actor_id: &str,
        performance_date_ids: &[String],
    ) -> Result<Vec<UnavailableDate>> {
        let actor = self
            .actors
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| CallboardError::NotFound(format!("actor not found: {}", actor_id)))?;

        let existing = self.unavailability.find_by_actor(actor_id).await?;
        let existing_ids: HashSet<&str> =
            existing.iter().map(|u| u.performance_date_id.as_str()).collect();
        let requested: HashSet<&str> = performance_date_ids.iter().map(String::as_str).collect();

        let to_add: Vec<String> = performance_date_ids
            .iter()
            .filter(|id| !existing_ids.contains(id.as_str()))
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let to_remove: Vec<&UnavailableDate> = existing
            .iter()
            .filter(|u| !requested.contains(u.performance_date_id.as_str()))
            .collect();
        let remove_ids: Vec<String> = to_remove.iter().map(|u| u.id.clone()).collect();

        // Castings colliding with newly blocked slots are removed inside
        // the same transaction; their events are cleaned up afterwards.
        let displaced = if to_add.is_empty() {
            Vec::new()
        } else {
            self.castings.find_by_actor_and_performance_ids(actor_id, &to_add).await?
        };
        let displaced_ids: Vec<String> = displaced.iter().map(|c| c.id.clone()).collect();

        debug!(
            actor_id,
            added = to_add.len(),
            removed = remove_ids.len(),
            displaced = displaced_ids.len(),
            "replacing unavailability"
        );

        let created = self
            .unavailability
            .apply_replace(actor_id, &to_add, &remove_ids, &displaced_ids)
            .await?;

        for casting in &displaced {
            self.casting.remove_casting_events(casting).await;
            if casting.role_type == RoleType::FemaleLead {
                self.casting.try_refresh_partner_description(&casting.performance_date_id).await;
            }
        }

        for revoked in &to_remove {
            self.remove_unavailable_events(&actor, revoked).await;
        }

        for row in &created {
            self.try_sync_unavailable(&actor, row).await;
        }

        self.unavailability.find_by_actor(actor_id).await
    }

    /// Mirror a fresh unavailability row; failure leaves it unsynced for
    /// the next sweep. Actors without a personal calendar are skipped.
    async fn try_sync_unavailable(
        &self,
        actor: &callboard_domain::Actor,
        row: &UnavailableDate,
    ) {
        let Some(calendar_id) = actor.calendar_id.as_deref() else {
            return;
        };
        let Ok(Some(performance)) =
            self.performances.find_by_id(&row.performance_date_id).await
        else {
            return;
        };

        let event_id = match self
            .calendar
            .create_unavailable_event(calendar_id, &actor.name, performance.date)
            .await
        {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, unavailable_id = %row.id, "unavailable event create failed");
                return;
            }
        };

        let all_event_id = match self
            .calendar
            .mirror_unavailable_event(&actor.name, performance.date)
            .await
        {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, unavailable_id = %row.id, "aggregate mirror failed");
                None
            }
        };

        if let Err(err) = self
            .unavailability
            .mark_synced(&row.id, Some(&event_id), all_event_id.as_deref())
            .await
        {
            warn!(error = %err, unavailable_id = %row.id, "sync flag update failed");
        }
    }

    async fn remove_unavailable_events(
        &self,
        actor: &callboard_domain::Actor,
        row: &UnavailableDate,
    ) {
        if let (Some(calendar_id), Some(event_id)) =
            (actor.calendar_id.as_deref(), row.calendar_event_id.as_deref())
        {
            if let Err(err) = self.calendar.delete_event(calendar_id, event_id, false).await {
                warn!(error = %err, unavailable_id = %row.id, "unavailable event delete failed");
            }
        }
        if let Some(all_event_id) = row.all_calendar_event_id.as_deref() {
            if let Err(err) = self.calendar.delete_mirrored_event(all_event_id).await {
                warn!(error = %err, unavailable_id = %row.id, "aggregate event delete failed");
            }
        }
    }
}
