//! Casting assignment service - core business logic
//!
//! Validates role assignments against actor roles and declared
//! unavailability, persists them, and propagates the result to the external
//! calendars. Calendar propagation is strictly best-effort: the database
//! write is the system of record and a failed mirror only leaves the row
//! unsynced for the next sweep.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use callboard_domain::utils::description::{build_casting_description, CastingDescription};
use callboard_domain::utils::time::kst_today;
use callboard_domain::{
    Actor, CallboardError, Casting, CastingChange, CastingChangeResult, PerformanceDate, Result,
    RoleType,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ports::{ActorRepository, CastingRepository, CastingWrite, UserRepository};
use crate::calendar_ports::{CalendarGateway, CastingEventParams};
use crate::reservation::ports::ReservationStatusRepository;
use crate::schedule::ports::UnavailabilityRepository;

/// Outcome of a notification resend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyReport {
    pub sent: usize,
    pub failed: usize,
}

/// Casting assignment service
pub struct CastingService {
    actors: Arc<dyn ActorRepository>,
    castings: Arc<dyn CastingRepository>,
    performances: Arc<dyn crate::schedule::ports::PerformanceDateRepository>,
    unavailability: Arc<dyn UnavailabilityRepository>,
    reservations: Arc<dyn ReservationStatusRepository>,
    users: Arc<dyn UserRepository>,
    calendar: Arc<dyn CalendarGateway>,
}

impl CastingService {
    pub fn new(
        actors: Arc<dyn ActorRepository>,
        castings: Arc<dyn CastingRepository>,
        performances: Arc<dyn crate::schedule::ports::PerformanceDateRepository>,
        unavailability: Arc<dyn UnavailabilityRepository>,
        reservations: Arc<dyn ReservationStatusRepository>,
        users: Arc<dyn UserRepository>,
        calendar: Arc<dyn CalendarGateway>,
    ) -> Self {
        Self { actors, castings, performances, unavailability, reservations, users, calendar }
    }

    /// Assign (or unassign, when `actor_id` is `None`) a role for one slot.
    ///
    /// Returns the resulting casting, or `None` after an unassignment.
    pub async fn assign(
        &self,
        performance_date_id: &str,
        actor_id: Option<&str>,
        role_type: RoleType,
    ) -> Result<Option<Casting>> {
        let Some(actor_id) = actor_id.filter(|id| !id.is_empty()) else {
            self.unassign(performance_date_id, role_type).await?;
            return Ok(None);
        };

        let (actor, performance, conflict) = tokio::join!(
            self.actors.find_by_id(actor_id),
            self.performances.find_by_id(performance_date_id),
            self.unavailability.find_by_actor_and_performance(actor_id, performance_date_id),
        );

        let actor = actor?
            .ok_or_else(|| CallboardError::NotFound(format!("actor not found: {}", actor_id)))?;
        let performance = performance?.ok_or_else(|| {
            CallboardError::NotFound(format!("performance date not found: {}", performance_date_id))
        })?;
        if actor.role_type != role_type {
            return Err(CallboardError::InvalidInput(format!(
                "actor {} is a {}, not a {}",
                actor.name, actor.role_type, role_type
            )));
        }
        if conflict?.is_some() {
            return Err(CallboardError::InvalidInput(format!(
                "actor {} is unavailable for this slot",
                actor.name
            )));
        }

        // A previous holder's events are stale the moment the slot changes
        // hands; remove them before the upsert clears the stored ids.
        if let Some(previous) =
            self.castings.find_by_slot_and_role(performance_date_id, role_type).await?
        {
            self.remove_casting_events(&previous).await;
        }

        let casting = self.castings.upsert(performance_date_id, actor_id, role_type).await?;

        let casting = self.try_sync_casting(&casting, &actor, &performance).await;

        if role_type == RoleType::FemaleLead {
            self.try_refresh_partner_description(performance_date_id).await;
        }

        Ok(Some(casting))
    }

    /// Apply a batch of casting changes: validate each, run all database
    /// writes in one transaction, then mirror best-effort. Individual
    /// calendar failures never roll back committed writes.
    pub async fn assign_batch(
        &self,
        changes: &[CastingChange],
    ) -> Result<Vec<CastingChangeResult>> {
        if changes.is_empty() {
            return Err(CallboardError::InvalidInput("changes must not be empty".into()));
        }

        let actor_ids: Vec<String> = changes
            .iter()
            .filter_map(|c| c.actor_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let performance_ids: Vec<String> = changes
            .iter()
            .map(|c| c.performance_date_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let (actors, performances, unavailables, existing) = tokio::join!(
            self.actors.find_by_ids(&actor_ids),
            self.performances.find_by_ids(&performance_ids),
            self.unavailability.find_by_performance_ids(&performance_ids),
            self.castings.find_by_performance_ids(&performance_ids),
        );

        let actor_map: HashMap<String, Actor> =
            actors?.into_iter().map(|a| (a.id.clone(), a)).collect();
        let performance_map: HashMap<String, PerformanceDate> =
            performances?.into_iter().map(|p| (p.id.clone(), p)).collect();
        let unavailable_keys: HashSet<String> = unavailables?
            .into_iter()
            .map(|u| format!("{}_{}", u.actor_id, u.performance_date_id))
            .collect();
        let existing_map: HashMap<String, Casting> = existing?
            .into_iter()
            .map(|c| (format!("{}_{}", c.performance_date_id, c.role_type), c))
            .collect();

        let mut results = Vec::with_capacity(changes.len());
        let mut writes = Vec::new();
        // Castings whose mirrored events become stale once the transaction
        // commits (unassigned or replaced holders).
        let mut stale: Vec<Casting> = Vec::new();
        // Slots to re-mirror after the transaction.
        let mut to_sync: Vec<(String, RoleType)> = Vec::new();
        // Slots whose MALE_LEAD description must be refreshed.
        let mut partner_dirty: HashSet<String> = HashSet::new();

        for change in changes {
            let key = format!("{}_{}", change.performance_date_id, change.role_type);

            if !performance_map.contains_key(&change.performance_date_id) {
                results.push(CastingChangeResult::failed(&key, "performance date not found"));
                continue;
            }

            if let Some(name) = change.reservation_name.clone() {
                writes.push(CastingWrite::Memo {
                    performance_date_id: change.performance_date_id.clone(),
                    name: Some(name),
                    contact: change.reservation_contact.clone(),
                });
            }

            let Some(actor_id) = change.actor_id.as_deref().filter(|id| !id.is_empty()) else {
                if let Some(previous) = existing_map.get(&key) {
                    stale.push(previous.clone());
                }
                writes.push(CastingWrite::Unassign {
                    performance_date_id: change.performance_date_id.clone(),
                    role_type: change.role_type,
                });
                if change.role_type == RoleType::FemaleLead {
                    partner_dirty.insert(change.performance_date_id.clone());
                }
                results.push(CastingChangeResult::ok(&key));
                continue;
            };

            let Some(actor) = actor_map.get(actor_id) else {
                results.push(CastingChangeResult::failed(&key, "actor not found"));
                continue;
            };
            if actor.role_type != change.role_type {
                results.push(CastingChangeResult::failed(&key, "actor role type mismatch"));
                continue;
            }
            if unavailable_keys.contains(&format!("{}_{}", actor_id, change.performance_date_id)) {
                results.push(CastingChangeResult::failed(&key, "actor unavailable for this slot"));
                continue;
            }

            if let Some(previous) = existing_map.get(&key) {
                stale.push(previous.clone());
            }
            writes.push(CastingWrite::Assign {
                performance_date_id: change.performance_date_id.clone(),
                actor_id: actor_id.to_string(),
                role_type: change.role_type,
            });
            to_sync.push((change.performance_date_id.clone(), change.role_type));
            if change.role_type == RoleType::FemaleLead {
                partner_dirty.insert(change.performance_date_id.clone());
            }
            results.push(CastingChangeResult::ok(&key));
        }

        if !writes.is_empty() {
            self.castings.apply_writes(&writes).await?;
        }

        for casting in &stale {
            self.remove_casting_events(casting).await;
        }

        for (performance_date_id, role_type) in &to_sync {
            let Some(casting) =
                self.castings.find_by_slot_and_role(performance_date_id, *role_type).await?
            else {
                continue;
            };
            let Some(actor) = self.actors.find_by_id(&casting.actor_id).await? else {
                continue;
            };
            let Some(performance) = performance_map.get(performance_date_id) else {
                continue;
            };
            self.try_sync_casting(&casting, &actor, performance).await;
        }

        for performance_date_id in &partner_dirty {
            self.try_refresh_partner_description(performance_date_id).await;
        }

        Ok(results)
    }

    /// Re-send calendar invites for the given castings by recreating their
    /// personal events with the linked account as attendee.
    pub async fn resend_notifications(&self, casting_ids: &[String]) -> Result<NotifyReport> {
        if casting_ids.is_empty() {
            return Err(CallboardError::InvalidInput("casting_ids must not be empty".into()));
        }

        let castings = self.castings.find_by_ids(casting_ids).await?;
        if castings.is_empty() {
            return Err(CallboardError::NotFound("no castings matched the given ids".into()));
        }

        let mut sent = 0;
        let mut failed = 0;

        for casting in castings {
            let Some(actor) = self.actors.find_by_id(&casting.actor_id).await? else {
                failed += 1;
                continue;
            };
            let Some(performance) =
                self.performances.find_by_id(&casting.performance_date_id).await?
            else {
                failed += 1;
                continue;
            };
            let email = self.users.find_by_actor(&actor.id).await?.and_then(|u| u.email);
            let Some(email) = email else {
                failed += 1;
                continue;
            };

            if let Some(event_id) = &casting.calendar_event_id {
                if let Err(err) = self
                    .calendar
                    .delete_casting_event(
                        casting.role_type,
                        actor.calendar_id.as_deref(),
                        event_id,
                        false,
                    )
                    .await
                {
                    warn!(error = %err, casting_id = %casting.id, "stale event delete failed");
                }
            }

            let description = self.description_for(&casting, &performance).await?;
            let params = CastingEventParams {
                role_type: casting.role_type,
                actor_name: actor.name.clone(),
                date: performance.date,
                start_time: performance.start_time.clone(),
                end_time: performance.end_time.clone(),
                label: performance.label.clone(),
                actor_calendar_id: actor.calendar_id.clone(),
                attendee_email: Some(email),
                description,
            };

            match self.calendar.create_casting_event(&params).await {
                Ok(event_id) => {
                    self.castings
                        .mark_synced(
                            &casting.id,
                            Some(&event_id),
                            casting.all_calendar_event_id.as_deref(),
                        )
                        .await?;
                    sent += 1;
                }
                Err(err) => {
                    warn!(error = %err, casting_id = %casting.id, "invite resend failed");
                    failed += 1;
                }
            }
        }

        Ok(NotifyReport { sent, failed })
    }

    /// Rebuild and push the MALE_LEAD description for a slot. Errors are
    /// absorbed; a stale description is repaired by the next sweep.
    pub async fn try_refresh_partner_description(&self, performance_date_id: &str) {
        if let Err(err) = self.refresh_partner_description(performance_date_id).await {
            warn!(
                error = %err,
                performance_date_id,
                "partner description refresh failed"
            );
        }
    }

    pub(crate) async fn refresh_partner_description(
        &self,
        performance_date_id: &str,
    ) -> Result<()> {
        let Some(male) =
            self.castings.find_by_slot_and_role(performance_date_id, RoleType::MaleLead).await?
        else {
            return Ok(());
        };
        let Some(event_id) = male.calendar_event_id.clone() else {
            return Ok(());
        };
        let Some(performance) = self.performances.find_by_id(performance_date_id).await? else {
            return Ok(());
        };
        let Some(actor) = self.actors.find_by_id(&male.actor_id).await? else {
            return Ok(());
        };

        let description = self.description_for(&male, &performance).await?;

        self.calendar
            .update_event_description(
                RoleType::MaleLead,
                actor.calendar_id.as_deref(),
                &event_id,
                description.as_deref(),
            )
            .await?;

        if let Some(all_event_id) = &male.all_calendar_event_id {
            if let Err(err) =
                self.calendar.update_mirrored_description(all_event_id, description.as_deref()).await
            {
                warn!(error = %err, casting_id = %male.id, "aggregate description patch failed");
            }
        }

        Ok(())
    }

    /// Build the description for a casting: MALE_LEAD events carry the
    /// partner's name and, on the day of the performance (KST), the
    /// reservation memo. FEMALE_LEAD events carry nothing.
    pub(crate) async fn description_for(
        &self,
        casting: &Casting,
        performance: &PerformanceDate,
    ) -> Result<Option<String>> {
        if casting.role_type != RoleType::MaleLead {
            return Ok(None);
        }

        let partner_name = match self
            .castings
            .find_by_slot_and_role(&casting.performance_date_id, RoleType::FemaleLead)
            .await?
        {
            Some(partner) => {
                self.actors.find_by_id(&partner.actor_id).await?.map(|a| a.name)
            }
            None => None,
        };

        let (reservation_name, reservation_contact) = if performance.date == kst_today() {
            self.reservations
                .find_by_performance_id(&casting.performance_date_id)
                .await?
                .map(|r| (r.reservation_name, r.reservation_contact))
                .unwrap_or((None, None))
        } else {
            (None, None)
        };

        Ok(build_casting_description(&CastingDescription {
            partner_name,
            reservation_name,
            reservation_contact,
        }))
    }

    /// Mirror a fresh casting to the calendars; on failure the row simply
    /// stays unsynced. Returns the casting with whatever sync state stuck.
    async fn try_sync_casting(
        &self,
        casting: &Casting,
        actor: &Actor,
        performance: &PerformanceDate,
    ) -> Casting {
        match self.sync_casting(casting, actor, performance).await {
            Ok(updated) => updated,
            Err(err) => {
                warn!(
                    error = %err,
                    casting_id = %casting.id,
                    "calendar sync failed; casting left unsynced"
                );
                casting.clone()
            }
        }
    }

    async fn sync_casting(
        &self,
        casting: &Casting,
        actor: &Actor,
        performance: &PerformanceDate,
    ) -> Result<Casting> {
        let description = self.description_for(casting, performance).await?;
        let attendee_email = self.users.find_by_actor(&actor.id).await?.and_then(|u| u.email);

        let params = CastingEventParams {
            role_type: casting.role_type,
            actor_name: actor.name.clone(),
            date: performance.date,
            start_time: performance.start_time.clone(),
            end_time: performance.end_time.clone(),
            label: performance.label.clone(),
            actor_calendar_id: actor.calendar_id.clone(),
            attendee_email,
            description,
        };

        let event_id = self.calendar.create_casting_event(&params).await?;

        // The aggregate mirror is secondary; losing it does not make the
        // casting unsynced.
        let all_event_id = match self.calendar.mirror_casting_event(&params).await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, casting_id = %casting.id, "aggregate mirror failed");
                None
            }
        };

        self.castings
            .mark_synced(&casting.id, Some(&event_id), all_event_id.as_deref())
            .await?;

        let mut updated = casting.clone();
        updated.synced = true;
        updated.calendar_event_id = Some(event_id);
        updated.all_calendar_event_id = all_event_id;
        Ok(updated)
    }

    async fn unassign(&self, performance_date_id: &str, role_type: RoleType) -> Result<()> {
        let removed = self.castings.delete_by_slot_and_role(performance_date_id, role_type).await?;

        for casting in &removed {
            self.remove_casting_events(casting).await;
        }

        if role_type == RoleType::FemaleLead && !removed.is_empty() {
            self.try_refresh_partner_description(performance_date_id).await;
        }

        Ok(())
    }

    /// Delete a casting's mirrored events, notifying attendees on the
    /// personal calendar. Failures are logged and swallowed.
    pub(crate) async fn remove_casting_events(&self, casting: &Casting) {
        let actor_calendar_id = match self.actors.find_by_id(&casting.actor_id).await {
            Ok(actor) => actor.and_then(|a| a.calendar_id),
            Err(err) => {
                warn!(error = %err, casting_id = %casting.id, "actor lookup failed during cleanup");
                None
            }
        };

        if let Some(event_id) = &casting.calendar_event_id {
            if let Err(err) = self
                .calendar
                .delete_casting_event(
                    casting.role_type,
                    actor_calendar_id.as_deref(),
                    event_id,
                    true,
                )
                .await
            {
                warn!(error = %err, casting_id = %casting.id, "personal event delete failed");
            }
        }

        if let Some(all_event_id) = &casting.all_calendar_event_id {
            if let Err(err) = self.calendar.delete_mirrored_event(all_event_id).await {
                warn!(error = %err, casting_id = %casting.id, "aggregate event delete failed");
            }
        }
    }
}
