//! Shared in-memory fixtures for core service tests.
//!
//! `MemoryStore` implements every persistence port over one shared state so
//! cross-table behavior (e.g. unavailability deleting castings) is
//! observable exactly as it would be against the real database.
//! `RecordingGateway` captures calendar calls and can be told to fail.

// Not every integration binary uses every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use callboard_core::calendar_ports::{CalendarGateway, CastingEventParams};
use callboard_core::casting::ports::{
    ActorRepository, CastingRepository, CastingWrite, UserRepository,
};
use callboard_core::reservation::ports::{ReservationStatusRepository, ReservationUpsert};
use callboard_core::roster::ports::MonthOverrideRepository;
use callboard_core::schedule::ports::{PerformanceDateRepository, UnavailabilityRepository};
use callboard_domain::{
    Actor, ActorDetail, ActorMonthOverride, CallboardError, Casting, NewPerformanceSlot,
    PerformanceDate, ReservationStatus, Result, Role, RoleType, UnavailableDate, User,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

#[derive(Default)]
pub struct State {
    pub actors: Vec<Actor>,
    pub users: Vec<User>,
    pub performances: Vec<PerformanceDate>,
    pub castings: Vec<Casting>,
    pub unavailability: Vec<UnavailableDate>,
    pub reservations: Vec<ReservationStatus>,
    pub overrides: Vec<ActorMonthOverride>,
}

/// In-memory implementation of every persistence port.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn add_actor(&self, name: &str, role_type: RoleType) -> Actor {
        let now = Utc::now().timestamp();
        let actor = Actor {
            id: Uuid::now_v7().to_string(),
            name: name.to_string(),
            role_type,
            calendar_id: None,
            created_at: now,
            updated_at: now,
        };
        self.with(|s| s.actors.push(actor.clone()));
        actor
    }

    pub fn add_actor_with_calendar(&self, name: &str, role_type: RoleType, cal: &str) -> Actor {
        let mut actor = self.add_actor(name, role_type);
        actor.calendar_id = Some(cal.to_string());
        let id = actor.id.clone();
        let cal = cal.to_string();
        self.with(|s| {
            if let Some(a) = s.actors.iter_mut().find(|a| a.id == id) {
                a.calendar_id = Some(cal);
            }
        });
        actor
    }

    pub fn add_performance(&self, date: NaiveDate, start_time: &str) -> PerformanceDate {
        let performance = PerformanceDate {
            id: Uuid::now_v7().to_string(),
            date,
            start_time: start_time.to_string(),
            end_time: None,
            label: None,
            created_at: Utc::now().timestamp(),
        };
        self.with(|s| s.performances.push(performance.clone()));
        performance
    }

    pub fn add_user(&self, email: &str, actor_id: Option<&str>) -> User {
        let user = User {
            id: Uuid::now_v7().to_string(),
            email: Some(email.to_string()),
            name: None,
            role: if actor_id.is_some() { Role::Actor } else { Role::Admin },
            actor_id: actor_id.map(str::to_string),
            password_hash: None,
            created_at: Utc::now().timestamp(),
        };
        self.with(|s| s.users.push(user.clone()));
        user
    }

    pub fn add_unavailable(&self, actor_id: &str, performance_date_id: &str) -> UnavailableDate {
        let row = UnavailableDate {
            id: Uuid::now_v7().to_string(),
            actor_id: actor_id.to_string(),
            performance_date_id: performance_date_id.to_string(),
            synced: false,
            calendar_event_id: None,
            all_calendar_event_id: None,
            created_at: Utc::now().timestamp(),
        };
        self.with(|s| s.unavailability.push(row.clone()));
        row
    }

    pub fn casting_for(&self, performance_date_id: &str, role_type: RoleType) -> Option<Casting> {
        self.with(|s| {
            s.castings
                .iter()
                .find(|c| c.performance_date_id == performance_date_id && c.role_type == role_type)
                .cloned()
        })
    }

    pub fn reservation_for(&self, performance_date_id: &str) -> Option<ReservationStatus> {
        self.with(|s| {
            s.reservations
                .iter()
                .find(|r| r.performance_date_id == performance_date_id)
                .cloned()
        })
    }

    fn upsert_reservation(
        state: &mut State,
        performance_date_id: &str,
        has_reservation: bool,
        name: Option<&str>,
        contact: Option<&str>,
        rewrite_memo: bool,
    ) -> ReservationStatus {
        let now = Utc::now().timestamp();
        if let Some(row) = state
            .reservations
            .iter_mut()
            .find(|r| r.performance_date_id == performance_date_id)
        {
            row.has_reservation = has_reservation;
            row.checked_at = now;
            if rewrite_memo {
                row.reservation_name = name.map(str::to_string);
                row.reservation_contact = contact.map(str::to_string);
            } else {
                if let Some(name) = name {
                    row.reservation_name = Some(name.to_string());
                }
                if let Some(contact) = contact {
                    row.reservation_contact = Some(contact.to_string());
                }
            }
            return row.clone();
        }
        let row = ReservationStatus {
            id: Uuid::now_v7().to_string(),
            performance_date_id: performance_date_id.to_string(),
            has_reservation,
            reservation_name: name.map(str::to_string),
            reservation_contact: contact.map(str::to_string),
            checked_at: now,
        };
        state.reservations.push(row.clone());
        row
    }

    fn upsert_casting(
        state: &mut State,
        performance_date_id: &str,
        actor_id: &str,
        role_type: RoleType,
    ) -> Casting {
        let now = Utc::now().timestamp();
        if let Some(row) = state
            .castings
            .iter_mut()
            .find(|c| c.performance_date_id == performance_date_id && c.role_type == role_type)
        {
            row.actor_id = actor_id.to_string();
            row.synced = false;
            row.calendar_event_id = None;
            row.all_calendar_event_id = None;
            row.updated_at = now;
            return row.clone();
        }
        let row = Casting {
            id: Uuid::now_v7().to_string(),
            performance_date_id: performance_date_id.to_string(),
            actor_id: actor_id.to_string(),
            role_type,
            synced: false,
            calendar_event_id: None,
            all_calendar_event_id: None,
            created_at: now,
            updated_at: now,
        };
        state.castings.push(row.clone());
        row
    }
}

#[async_trait]
impl PerformanceDateRepository for MemoryStore {
    async fn find_by_month(&self, year: i32, month: u32) -> Result<Vec<PerformanceDate>> {
        self.with(|s| {
            let mut rows: Vec<_> = s
                .performances
                .iter()
                .filter(|p| {
                    use chrono::Datelike;
                    p.date.year() == year && p.date.month() == month
                })
                .cloned()
                .collect();
            rows.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
            Ok(rows)
        })
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<PerformanceDate>> {
        self.with(|s| Ok(s.performances.iter().filter(|p| p.date == date).cloned().collect()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PerformanceDate>> {
        self.with(|s| Ok(s.performances.iter().find(|p| p.id == id).cloned()))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<PerformanceDate>> {
        self.with(|s| {
            Ok(s.performances.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
        })
    }

    async fn find_all(&self) -> Result<Vec<PerformanceDate>> {
        self.with(|s| {
            let mut rows = s.performances.clone();
            rows.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
            Ok(rows)
        })
    }

    async fn insert_slots(&self, slots: &[NewPerformanceSlot]) -> Result<()> {
        self.with(|s| {
            for slot in slots {
                let duplicate = s
                    .performances
                    .iter()
                    .any(|p| p.date == slot.date && p.start_time == slot.start_time);
                if duplicate {
                    return Err(CallboardError::Database("unique constraint violation".into()));
                }
                s.performances.push(PerformanceDate {
                    id: Uuid::now_v7().to_string(),
                    date: slot.date,
                    start_time: slot.start_time.clone(),
                    end_time: None,
                    label: None,
                    created_at: Utc::now().timestamp(),
                });
            }
            Ok(())
        })
    }
}

#[async_trait]
impl ActorRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Actor>> {
        self.with(|s| Ok(s.actors.iter().find(|a| a.id == id).cloned()))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Actor>> {
        self.with(|s| Ok(s.actors.iter().filter(|a| ids.contains(&a.id)).cloned().collect()))
    }

    async fn find_all(&self) -> Result<Vec<Actor>> {
        self.with(|s| Ok(s.actors.clone()))
    }

    async fn list_detailed(&self) -> Result<Vec<ActorDetail>> {
        self.with(|s| {
            Ok(s.actors
                .iter()
                .map(|a| ActorDetail {
                    actor: a.clone(),
                    user_email: s
                        .users
                        .iter()
                        .find(|u| u.actor_id.as_deref() == Some(a.id.as_str()))
                        .and_then(|u| u.email.clone()),
                    user_name: None,
                    casting_count: s.castings.iter().filter(|c| c.actor_id == a.id).count() as i64,
                    unavailable_count: s
                        .unavailability
                        .iter()
                        .filter(|u| u.actor_id == a.id)
                        .count() as i64,
                })
                .collect())
        })
    }

    async fn create(&self, actor: &Actor) -> Result<()> {
        self.with(|s| {
            s.actors.push(actor.clone());
            Ok(())
        })
    }

    async fn update(&self, actor: &Actor) -> Result<()> {
        self.with(|s| {
            if let Some(existing) = s.actors.iter_mut().find(|a| a.id == actor.id) {
                *existing = actor.clone();
            }
            Ok(())
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.with(|s| {
            s.actors.retain(|a| a.id != id);
            s.castings.retain(|c| c.actor_id != id);
            s.unavailability.retain(|u| u.actor_id != id);
            s.overrides.retain(|o| o.actor_id != id);
            for user in s.users.iter_mut() {
                if user.actor_id.as_deref() == Some(id) {
                    user.actor_id = None;
                }
            }
            Ok(())
        })
    }

    async fn set_calendar_id(&self, id: &str, calendar_id: &str) -> Result<()> {
        self.with(|s| {
            if let Some(actor) = s.actors.iter_mut().find(|a| a.id == id) {
                actor.calendar_id = Some(calendar_id.to_string());
            }
            Ok(())
        })
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.with(|s| Ok(s.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.with(|s| Ok(s.users.iter().find(|u| u.email.as_deref() == Some(email)).cloned()))
    }

    async fn find_by_actor(&self, actor_id: &str) -> Result<Option<User>> {
        self.with(|s| {
            Ok(s.users.iter().find(|u| u.actor_id.as_deref() == Some(actor_id)).cloned())
        })
    }

    async fn update_email(&self, user_id: &str, email: Option<&str>) -> Result<()> {
        self.with(|s| {
            if let Some(user) = s.users.iter_mut().find(|u| u.id == user_id) {
                user.email = email.map(str::to_string);
            }
            Ok(())
        })
    }

    async fn link_actor(&self, user_id: &str, actor_id: &str) -> Result<()> {
        self.with(|s| {
            for user in s.users.iter_mut() {
                if user.actor_id.as_deref() == Some(actor_id) {
                    user.actor_id = None;
                }
            }
            if let Some(user) = s.users.iter_mut().find(|u| u.id == user_id) {
                user.actor_id = Some(actor_id.to_string());
                user.role = Role::Actor;
            }
            Ok(())
        })
    }
}

#[async_trait]
impl CastingRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Casting>> {
        self.with(|s| Ok(s.castings.iter().find(|c| c.id == id).cloned()))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Casting>> {
        self.with(|s| Ok(s.castings.iter().filter(|c| ids.contains(&c.id)).cloned().collect()))
    }

    async fn find_all(&self) -> Result<Vec<Casting>> {
        self.with(|s| Ok(s.castings.clone()))
    }

    async fn find_by_slot_and_role(
        &self,
        performance_date_id: &str,
        role_type: RoleType,
    ) -> Result<Option<Casting>> {
        Ok(self.casting_for(performance_date_id, role_type))
    }

    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<Casting>> {
        self.with(|s| {
            Ok(s.castings
                .iter()
                .filter(|c| ids.contains(&c.performance_date_id))
                .cloned()
                .collect())
        })
    }

    async fn find_by_actor_and_performance_ids(
        &self,
        actor_id: &str,
        ids: &[String],
    ) -> Result<Vec<Casting>> {
        self.with(|s| {
            Ok(s.castings
                .iter()
                .filter(|c| c.actor_id == actor_id && ids.contains(&c.performance_date_id))
                .cloned()
                .collect())
        })
    }

    async fn upsert(
        &self,
        performance_date_id: &str,
        actor_id: &str,
        role_type: RoleType,
    ) -> Result<Casting> {
        self.with(|s| Ok(Self::upsert_casting(s, performance_date_id, actor_id, role_type)))
    }

    async fn delete_by_slot_and_role(
        &self,
        performance_date_id: &str,
        role_type: RoleType,
    ) -> Result<Vec<Casting>> {
        self.with(|s| {
            let (removed, kept): (Vec<Casting>, Vec<Casting>) =
                s.castings.drain(..).partition(|c| {
                    c.performance_date_id == performance_date_id && c.role_type == role_type
                });
            s.castings = kept;
            Ok(removed)
        })
    }

    async fn apply_writes(&self, writes: &[CastingWrite]) -> Result<()> {
        self.with(|s| {
            for write in writes {
                match write {
                    CastingWrite::Assign { performance_date_id, actor_id, role_type } => {
                        Self::upsert_casting(s, performance_date_id, actor_id, *role_type);
                    }
                    CastingWrite::Unassign { performance_date_id, role_type } => {
                        s.castings.retain(|c| {
                            !(c.performance_date_id == *performance_date_id
                                && c.role_type == *role_type)
                        });
                    }
                    CastingWrite::Memo { performance_date_id, name, contact } => {
                        Self::upsert_reservation(
                            s,
                            performance_date_id,
                            true,
                            name.as_deref(),
                            contact.as_deref(),
                            false,
                        );
                    }
                }
            }
            Ok(())
        })
    }

    async fn mark_synced(
        &self,
        id: &str,
        calendar_event_id: Option<&str>,
        all_calendar_event_id: Option<&str>,
    ) -> Result<()> {
        self.with(|s| {
            if let Some(casting) = s.castings.iter_mut().find(|c| c.id == id) {
                casting.synced = true;
                casting.calendar_event_id = calendar_event_id.map(str::to_string);
                casting.all_calendar_event_id = all_calendar_event_id.map(str::to_string);
            }
            Ok(())
        })
    }

    async fn find_unsynced(&self) -> Result<Vec<Casting>> {
        self.with(|s| Ok(s.castings.iter().filter(|c| !c.synced).cloned().collect()))
    }

    async fn find_male_leads_with_events_after(&self, date: NaiveDate) -> Result<Vec<Casting>> {
        self.with(|s| {
            Ok(s.castings
                .iter()
                .filter(|c| {
                    c.role_type == RoleType::MaleLead
                        && c.calendar_event_id.is_some()
                        && s.performances
                            .iter()
                            .any(|p| p.id == c.performance_date_id && p.date > date)
                })
                .cloned()
                .collect())
        })
    }
}

#[async_trait]
impl UnavailabilityRepository for MemoryStore {
    async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<UnavailableDate>> {
        self.with(|s| {
            Ok(s.unavailability.iter().filter(|u| u.actor_id == actor_id).cloned().collect())
        })
    }

    async fn find_by_actor_and_performance(
        &self,
        actor_id: &str,
        performance_date_id: &str,
    ) -> Result<Option<UnavailableDate>> {
        self.with(|s| {
            Ok(s.unavailability
                .iter()
                .find(|u| u.actor_id == actor_id && u.performance_date_id == performance_date_id)
                .cloned())
        })
    }

    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<UnavailableDate>> {
        self.with(|s| {
            Ok(s.unavailability
                .iter()
                .filter(|u| ids.contains(&u.performance_date_id))
                .cloned()
                .collect())
        })
    }

    async fn apply_replace(
        &self,
        actor_id: &str,
        add: &[String],
        remove_ids: &[String],
        casting_ids: &[String],
    ) -> Result<Vec<UnavailableDate>> {
        self.with(|s| {
            s.unavailability.retain(|u| !remove_ids.contains(&u.id));
            s.castings.retain(|c| !casting_ids.contains(&c.id));
            let mut created = Vec::new();
            for performance_date_id in add {
                let row = UnavailableDate {
                    id: Uuid::now_v7().to_string(),
                    actor_id: actor_id.to_string(),
                    performance_date_id: performance_date_id.clone(),
                    synced: false,
                    calendar_event_id: None,
                    all_calendar_event_id: None,
                    created_at: Utc::now().timestamp(),
                };
                s.unavailability.push(row.clone());
                created.push(row);
            }
            Ok(created)
        })
    }

    async fn find_unsynced(&self) -> Result<Vec<UnavailableDate>> {
        self.with(|s| Ok(s.unavailability.iter().filter(|u| !u.synced).cloned().collect()))
    }

    async fn mark_synced(
        &self,
        id: &str,
        calendar_event_id: Option<&str>,
        all_calendar_event_id: Option<&str>,
    ) -> Result<()> {
        self.with(|s| {
            if let Some(row) = s.unavailability.iter_mut().find(|u| u.id == id) {
                row.synced = true;
                row.calendar_event_id = calendar_event_id.map(str::to_string);
                row.all_calendar_event_id = all_calendar_event_id.map(str::to_string);
            }
            Ok(())
        })
    }
}

#[async_trait]
impl ReservationStatusRepository for MemoryStore {
    async fn find_by_performance_id(
        &self,
        performance_date_id: &str,
    ) -> Result<Option<ReservationStatus>> {
        Ok(self.reservation_for(performance_date_id))
    }

    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<ReservationStatus>> {
        self.with(|s| {
            Ok(s.reservations
                .iter()
                .filter(|r| ids.contains(&r.performance_date_id))
                .cloned()
                .collect())
        })
    }

    async fn upsert(
        &self,
        performance_date_id: &str,
        has_reservation: bool,
        reservation_name: Option<&str>,
        reservation_contact: Option<&str>,
    ) -> Result<ReservationStatus> {
        self.with(|s| {
            Ok(Self::upsert_reservation(
                s,
                performance_date_id,
                has_reservation,
                reservation_name,
                reservation_contact,
                false,
            ))
        })
    }

    async fn bulk_upsert(&self, entries: &[ReservationUpsert]) -> Result<()> {
        self.with(|s| {
            for entry in entries {
                Self::upsert_reservation(
                    s,
                    &entry.performance_date_id,
                    entry.has_reservation,
                    entry.reservation_name.as_deref(),
                    entry.reservation_contact.as_deref(),
                    true,
                );
            }
            Ok(())
        })
    }

    async fn find_past_with_memo(&self, date: NaiveDate) -> Result<Vec<ReservationStatus>> {
        self.with(|s| {
            Ok(s.reservations
                .iter()
                .filter(|r| {
                    (r.reservation_name.is_some() || r.reservation_contact.is_some())
                        && s.performances
                            .iter()
                            .any(|p| p.id == r.performance_date_id && p.date < date)
                })
                .cloned()
                .collect())
        })
    }

    async fn clear_memo(&self, id: &str) -> Result<()> {
        self.with(|s| {
            if let Some(row) = s.reservations.iter_mut().find(|r| r.id == id) {
                row.reservation_name = None;
                row.reservation_contact = None;
            }
            Ok(())
        })
    }
}

#[async_trait]
impl MonthOverrideRepository for MemoryStore {
    async fn find(
        &self,
        actor_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<ActorMonthOverride>> {
        self.with(|s| {
            Ok(s.overrides
                .iter()
                .find(|o| o.actor_id == actor_id && o.year == year && o.month == month)
                .cloned())
        })
    }

    async fn create(&self, row: &ActorMonthOverride) -> Result<()> {
        self.with(|s| {
            s.overrides.push(row.clone());
            Ok(())
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.with(|s| {
            s.overrides.retain(|o| o.id != id);
            Ok(())
        })
    }

    async fn find_actor_ids(&self, year: i32, month: u32) -> Result<Vec<String>> {
        self.with(|s| {
            Ok(s.overrides
                .iter()
                .filter(|o| o.year == year && o.month == month)
                .map(|o| o.actor_id.clone())
                .collect())
        })
    }
}

/// A calendar call captured by [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCall {
    CreateCasting { summary: String, description: Option<String> },
    MirrorCasting { summary: String },
    CreateUnavailable { calendar_id: String },
    MirrorUnavailable,
    DeleteCasting { event_id: String, notify: bool },
    DeleteEvent { calendar_id: String, event_id: String },
    DeleteMirrored { event_id: String },
    UpdateDescription { event_id: String, description: Option<String> },
    UpdateMirroredDescription { event_id: String },
    CreateActorCalendar { actor_name: String },
    ShareCalendar { calendar_id: String, email: String },
}

/// Recording mock for `CalendarGateway`.
#[derive(Default)]
pub struct RecordingGateway {
    pub calls: Mutex<Vec<CalendarCall>>,
    counter: AtomicUsize,
    fail_all: AtomicBool,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call fail with a network error.
    pub fn fail_from_now(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    /// Let calls succeed again.
    pub fn heal(&self) {
        self.fail_all.store(false, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_deletes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CalendarCall::DeleteCasting { .. } | CalendarCall::DeleteEvent { .. }))
            .count()
    }

    fn record(&self, call: CalendarCall) -> Result<String> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(CallboardError::Network("calendar provider unavailable".into()));
        }
        self.calls.lock().unwrap().push(call);
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("evt-{}", n))
    }
}

#[async_trait]
impl CalendarGateway for RecordingGateway {
    async fn create_casting_event(&self, params: &CastingEventParams) -> Result<String> {
        self.record(CalendarCall::CreateCasting {
            summary: params.actor_name.clone(),
            description: params.description.clone(),
        })
    }

    async fn mirror_casting_event(&self, params: &CastingEventParams) -> Result<String> {
        self.record(CalendarCall::MirrorCasting { summary: params.actor_name.clone() })
    }

    async fn create_unavailable_event(
        &self,
        calendar_id: &str,
        _actor_name: &str,
        _date: NaiveDate,
    ) -> Result<String> {
        self.record(CalendarCall::CreateUnavailable { calendar_id: calendar_id.to_string() })
    }

    async fn mirror_unavailable_event(&self, _actor_name: &str, _date: NaiveDate) -> Result<String> {
        self.record(CalendarCall::MirrorUnavailable)
    }

    async fn delete_casting_event(
        &self,
        _role_type: RoleType,
        _actor_calendar_id: Option<&str>,
        event_id: &str,
        notify: bool,
    ) -> Result<()> {
        self.record(CalendarCall::DeleteCasting { event_id: event_id.to_string(), notify })?;
        Ok(())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str, _notify: bool) -> Result<()> {
        self.record(CalendarCall::DeleteEvent {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })?;
        Ok(())
    }

    async fn delete_mirrored_event(&self, event_id: &str) -> Result<()> {
        self.record(CalendarCall::DeleteMirrored { event_id: event_id.to_string() })?;
        Ok(())
    }

    async fn update_event_description(
        &self,
        _role_type: RoleType,
        _actor_calendar_id: Option<&str>,
        event_id: &str,
        description: Option<&str>,
    ) -> Result<()> {
        self.record(CalendarCall::UpdateDescription {
            event_id: event_id.to_string(),
            description: description.map(str::to_string),
        })?;
        Ok(())
    }

    async fn update_mirrored_description(
        &self,
        event_id: &str,
        _description: Option<&str>,
    ) -> Result<()> {
        self.record(CalendarCall::UpdateMirroredDescription { event_id: event_id.to_string() })?;
        Ok(())
    }

    async fn create_actor_calendar(&self, actor_name: &str) -> Result<String> {
        self.record(CalendarCall::CreateActorCalendar { actor_name: actor_name.to_string() })
    }

    async fn share_calendar(&self, calendar_id: &str, email: &str) -> Result<()> {
        self.record(CalendarCall::ShareCalendar {
            calendar_id: calendar_id.to_string(),
            email: email.to_string(),
        })?;
        Ok(())
    }
}

/// Wire a full service graph over one store and gateway.
pub struct Services {
    pub store: MemoryStore,
    pub gateway: Arc<RecordingGateway>,
    pub schedule: Arc<callboard_core::ScheduleService>,
    pub casting: Arc<callboard_core::CastingService>,
    pub availability: callboard_core::AvailabilityService,
    pub reservation: callboard_core::ReservationService,
    pub sync: callboard_core::CalendarSyncService,
}

pub fn build_services() -> Services {
    let store = MemoryStore::new();
    let gateway = RecordingGateway::new();

    let actors: Arc<dyn ActorRepository> = Arc::new(store.clone());
    let castings: Arc<dyn CastingRepository> = Arc::new(store.clone());
    let performances: Arc<dyn PerformanceDateRepository> = Arc::new(store.clone());
    let unavailability: Arc<dyn UnavailabilityRepository> = Arc::new(store.clone());
    let reservations: Arc<dyn ReservationStatusRepository> = Arc::new(store.clone());
    let users: Arc<dyn UserRepository> = Arc::new(store.clone());
    let calendar: Arc<dyn CalendarGateway> = gateway.clone();

    let schedule = Arc::new(callboard_core::ScheduleService::new(performances.clone()));
    let casting = Arc::new(callboard_core::CastingService::new(
        actors.clone(),
        castings.clone(),
        performances.clone(),
        unavailability.clone(),
        reservations.clone(),
        users.clone(),
        calendar.clone(),
    ));
    let availability = callboard_core::AvailabilityService::new(
        actors.clone(),
        castings.clone(),
        performances.clone(),
        unavailability.clone(),
        calendar.clone(),
        casting.clone(),
    );
    let reservation = callboard_core::ReservationService::new(
        performances.clone(),
        castings.clone(),
        reservations.clone(),
        schedule.clone(),
        casting.clone(),
        None,
    );
    let sync = callboard_core::CalendarSyncService::new(
        actors,
        castings,
        performances,
        unavailability,
        calendar,
        casting.clone(),
    );

    Services { store, gateway, schedule, casting, availability, reservation, sync }
}
