//! Reservation ingestion service - core business logic
//!
//! Accepts booking data pushed by the third-party crawler, maps booking
//! times onto performance slots, and keeps the per-slot reservation state
//! (and the MALE_LEAD calendar descriptions derived from it) current.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use callboard_domain::utils::time::kst_today;
use callboard_domain::{Booking, CallboardError, Result, RoleType};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ports::{CrawlerTrigger, ReservationStatusRepository, ReservationUpsert};
use crate::casting::service::CastingService;
use crate::casting::ports::CastingRepository;
use crate::schedule::ports::PerformanceDateRepository;
use crate::schedule::ScheduleService;

/// Memo detail for one slot of a bulk sync, keyed `date_time` upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDetail {
    #[serde(default)]
    pub reservation_name: Option<String>,
    #[serde(default)]
    pub reservation_contact: Option<String>,
}

/// Per-booking outcome of an ingestion batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub booking_time: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a bulk reservation sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationSyncReport {
    pub total: usize,
    pub reserved: usize,
}

/// Outcome of a past-memo cleanup pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub cleaned: usize,
    pub calendar_updated: usize,
}

/// Reservation ingestion service
pub struct ReservationService {
    performances: Arc<dyn PerformanceDateRepository>,
    castings: Arc<dyn CastingRepository>,
    reservations: Arc<dyn ReservationStatusRepository>,
    schedule: Arc<ScheduleService>,
    casting: Arc<CastingService>,
    crawler: Option<Arc<dyn CrawlerTrigger>>,
}

impl ReservationService {
    pub fn new(
        performances: Arc<dyn PerformanceDateRepository>,
        castings: Arc<dyn CastingRepository>,
        reservations: Arc<dyn ReservationStatusRepository>,
        schedule: Arc<ScheduleService>,
        casting: Arc<CastingService>,
        crawler: Option<Arc<dyn CrawlerTrigger>>,
    ) -> Self {
        Self { performances, castings, reservations, schedule, casting, crawler }
    }

    /// Record a day's bookings. Each booking fails or succeeds on its own;
    /// a bad time label or unknown slot never aborts the batch.
    pub async fn record_bookings(
        &self,
        date: chrono::NaiveDate,
        bookings: &[Booking],
    ) -> Result<Vec<BookingOutcome>> {
        let slots = self.performances.find_by_date(date).await?;
        if slots.is_empty() {
            return Err(CallboardError::NotFound(format!(
                "no performance slots registered on {}",
                date
            )));
        }
        let by_time: HashMap<&str, &callboard_domain::PerformanceDate> =
            slots.iter().map(|p| (p.start_time.as_str(), p)).collect();

        let mut outcomes = Vec::with_capacity(bookings.len());

        for booking in bookings {
            let Some(time) = callboard_domain::parse_korean_time(&booking.booking_time) else {
                outcomes.push(BookingOutcome {
                    booking_time: booking.booking_time.clone(),
                    success: false,
                    error: Some(format!("unparseable booking time: {}", booking.booking_time)),
                });
                continue;
            };

            let Some(slot) = by_time.get(time.as_str()) else {
                outcomes.push(BookingOutcome {
                    booking_time: booking.booking_time.clone(),
                    success: false,
                    error: Some(format!("no {} slot on {}", time, date)),
                });
                continue;
            };

            let contact = booking.resolved_contact();
            self.reservations
                .upsert(&slot.id, true, Some(&contact.name), Some(&contact.phone))
                .await?;

            // Surface the memo on the MALE_LEAD event, partner line intact.
            self.casting.try_refresh_partner_description(&slot.id).await;

            outcomes.push(BookingOutcome {
                booking_time: booking.booking_time.clone(),
                success: true,
                error: None,
            });
        }

        Ok(outcomes)
    }

    /// Reconcile whole months against the crawler's full snapshot.
    ///
    /// `reservations` maps "YYYY-MM-DD" to reserved "HH:MM" times;
    /// `details` carries memo fields keyed "YYYY-MM-DD_HH:MM". Every slot of
    /// every listed month is rewritten: slots absent from the snapshot get
    /// `has_reservation = false` and their stale memo cleared.
    pub async fn sync_reservations(
        &self,
        months: &[(i32, u32)],
        reservations: &HashMap<String, Vec<String>>,
        details: &HashMap<String, BookingDetail>,
    ) -> Result<ReservationSyncReport> {
        if months.is_empty() {
            return Err(CallboardError::InvalidInput("months must not be empty".into()));
        }

        let mut reserved_keys = HashSet::new();
        for (date, times) in reservations {
            for time in times {
                reserved_keys.insert(format!("{}_{}", date, time));
            }
        }

        let mut total = 0;
        let mut reserved = 0;

        for (year, month) in months {
            let slots = self.schedule.ensure_month(*year, *month).await?;
            total += slots.len();

            let entries: Vec<ReservationUpsert> = slots
                .iter()
                .map(|slot| {
                    let key = slot.slot_key();
                    let has_reservation = reserved_keys.contains(&key);
                    if has_reservation {
                        reserved += 1;
                    }
                    let detail = has_reservation
                        .then(|| details.get(&key).cloned())
                        .flatten()
                        .unwrap_or_default();
                    ReservationUpsert {
                        performance_date_id: slot.id.clone(),
                        has_reservation,
                        reservation_name: detail.reservation_name,
                        reservation_contact: detail.reservation_contact,
                    }
                })
                .collect();

            self.reservations.bulk_upsert(&entries).await?;
            debug!(year, month, slots = entries.len(), "reconciled month reservations");
        }

        Ok(ReservationSyncReport { total, reserved })
    }

    /// Null out memos of past performances and strip the reservation
    /// portion from the matching MALE_LEAD event descriptions.
    pub async fn cleanup_past_memos(&self) -> Result<CleanupReport> {
        let today = kst_today();
        let stale = self.reservations.find_past_with_memo(today).await?;

        let mut cleaned = 0;
        let mut calendar_updated = 0;

        for status in stale {
            self.reservations.clear_memo(&status.id).await?;
            cleaned += 1;

            let male = self
                .castings
                .find_by_slot_and_role(&status.performance_date_id, RoleType::MaleLead)
                .await?;
            if let Some(casting) = male {
                if casting.calendar_event_id.is_some() {
                    if self.refresh_description(&casting).await {
                        calendar_updated += 1;
                    }
                }
            }
        }

        Ok(CleanupReport { cleaned, calendar_updated })
    }

    /// Kick the external crawler to push a fresh snapshot.
    pub async fn trigger_sync(&self) -> Result<serde_json::Value> {
        let crawler = self.crawler.as_ref().ok_or_else(|| {
            CallboardError::Config("reservation crawler webhook not configured".into())
        })?;
        crawler.trigger().await
    }

    async fn refresh_description(&self, casting: &callboard_domain::Casting) -> bool {
        // Full rebuild from database state; the memo was just cleared, so
        // only the partner line survives.
        match self.casting.refresh_partner_description(&casting.performance_date_id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, casting_id = %casting.id, "description cleanup failed");
                false
            }
        }
    }
}
