//! Calendar reconciliation service - core business logic
//!
//! The mirror is eventually consistent: primary operations leave rows
//! unsynced whenever the calendar provider misbehaves, and this sweep
//! retries them. Sweeping recreates events from scratch, so any stored
//! event ids are deleted first.

use std::sync::Arc;

use callboard_domain::utils::time::kst_today;
use callboard_domain::{Result, RoleType};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calendar_ports::{CalendarGateway, CastingEventParams};
use crate::casting::ports::{ActorRepository, CastingRepository};
use crate::casting::service::CastingService;
use crate::schedule::ports::{PerformanceDateRepository, UnavailabilityRepository};

/// Synced/failed counters for one row category.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CategoryReport {
    pub synced: usize,
    pub failed: usize,
}

/// Outcome of a full reconciliation sweep.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub unavailable: CategoryReport,
    pub casting: CategoryReport,
}

/// Outcome of a future-description scrub.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FutureCleanupReport {
    pub total: usize,
    pub cleaned: usize,
    pub failed: usize,
}

/// Calendar reconciliation service
pub struct CalendarSyncService {
    actors: Arc<dyn ActorRepository>,
    castings: Arc<dyn CastingRepository>,
    performances: Arc<dyn PerformanceDateRepository>,
    unavailability: Arc<dyn UnavailabilityRepository>,
    calendar: Arc<dyn CalendarGateway>,
    casting: Arc<CastingService>,
}

impl CalendarSyncService {
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

    /// Retry every unsynced unavailability row and casting.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for row in self.unavailability.find_unsynced().await? {
            match self.sync_unavailable(&row).await {
                Ok(true) => report.unavailable.synced += 1,
                Ok(false) => {} // actor has no calendar; nothing to mirror
                Err(err) => {
                    warn!(error = %err, unavailable_id = %row.id, "unavailable sync failed");
                    report.unavailable.failed += 1;
                }
            }
        }

        for row in self.castings.find_unsynced().await? {
            match self.sync_casting(&row).await {
                Ok(()) => report.casting.synced += 1,
                Err(err) => {
                    warn!(error = %err, casting_id = %row.id, "casting sync failed");
                    report.casting.failed += 1;
                }
            }
        }

        info!(
            unavailable_synced = report.unavailable.synced,
            unavailable_failed = report.unavailable.failed,
            casting_synced = report.casting.synced,
            casting_failed = report.casting.failed,
            "calendar sweep finished"
        );

        Ok(report)
    }

    /// Clear reservation leakage from future MALE_LEAD events by blanking
    /// their descriptions on both calendars.
    pub async fn cleanup_future_descriptions(&self) -> Result<FutureCleanupReport> {
        let today = kst_today();
        let rows = self.castings.find_male_leads_with_events_after(today).await?;

        let mut report = FutureCleanupReport { total: rows.len(), cleaned: 0, failed: 0 };

        for casting in rows {
            let Some(event_id) = casting.calendar_event_id.as_deref() else {
                continue;
            };
            let actor_calendar_id = self
                .actors
                .find_by_id(&casting.actor_id)
                .await?
                .and_then(|a| a.calendar_id);

            match self
                .calendar
                .update_event_description(
                    RoleType::MaleLead,
                    actor_calendar_id.as_deref(),
                    event_id,
                    None,
                )
                .await
            {
                Ok(()) => report.cleaned += 1,
                Err(err) => {
                    warn!(error = %err, casting_id = %casting.id, "description clear failed");
                    report.failed += 1;
                }
            }

            if let Some(all_event_id) = casting.all_calendar_event_id.as_deref() {
                if let Err(err) =
                    self.calendar.update_mirrored_description(all_event_id, None).await
                {
                    warn!(error = %err, casting_id = %casting.id, "aggregate clear failed");
                }
            }
        }

        Ok(report)
    }

    /// Returns Ok(false) when the actor has no personal calendar (the row
    /// is left as-is, it cannot be mirrored yet).
    async fn sync_unavailable(&self, row: &callboard_domain::UnavailableDate) -> Result<bool> {
        let Some(actor) = self.actors.find_by_id(&row.actor_id).await? else {
            return Ok(false);
        };
        let Some(calendar_id) = actor.calendar_id.as_deref() else {
            return Ok(false);
        };
        let Some(performance) = self.performances.find_by_id(&row.performance_date_id).await?
        else {
            return Ok(false);
        };

        let event_id =
            self.calendar.create_unavailable_event(calendar_id, &actor.name, performance.date).await?;

        let all_event_id =
            match self.calendar.mirror_unavailable_event(&actor.name, performance.date).await {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(error = %err, unavailable_id = %row.id, "aggregate mirror failed");
                    None
                }
            };

        self.unavailability
            .mark_synced(&row.id, Some(&event_id), all_event_id.as_deref())
            .await?;
        Ok(true)
    }

    async fn sync_casting(&self, casting: &callboard_domain::Casting) -> Result<()> {
        let actor = self
            .actors
            .find_by_id(&casting.actor_id)
            .await?
            .ok_or_else(|| callboard_domain::CallboardError::NotFound("actor vanished".into()))?;
        let performance = self
            .performances
            .find_by_id(&casting.performance_date_id)
            .await?
            .ok_or_else(|| {
                callboard_domain::CallboardError::NotFound("performance vanished".into())
            })?;

        // Stored ids point at events from a previous state; replace them.
        if let Some(event_id) = casting.calendar_event_id.as_deref() {
            if let Err(err) = self
                .calendar
                .delete_casting_event(
                    casting.role_type,
                    actor.calendar_id.as_deref(),
                    event_id,
                    true,
                )
                .await
            {
                warn!(error = %err, casting_id = %casting.id, "stale event delete failed");
            }
        }
        if let Some(all_event_id) = casting.all_calendar_event_id.as_deref() {
            if let Err(err) = self.calendar.delete_mirrored_event(all_event_id).await {
                warn!(error = %err, casting_id = %casting.id, "stale aggregate delete failed");
            }
        }

        let description = self.casting.description_for(casting, &performance).await?;

        let params = CastingEventParams {
            role_type: casting.role_type,
            actor_name: actor.name.clone(),
            date: performance.date,
            start_time: performance.start_time.clone(),
            end_time: performance.end_time.clone(),
            label: performance.label.clone(),
            actor_calendar_id: actor.calendar_id.clone(),
            attendee_email: None,
            description,
        };

        let event_id = self.calendar.create_casting_event(&params).await?;

        let all_event_id = match self.calendar.mirror_casting_event(&params).await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, casting_id = %casting.id, "aggregate mirror failed");
                None
            }
        };

        self.castings.mark_synced(&casting.id, Some(&event_id), all_event_id.as_deref()).await
    }
}
