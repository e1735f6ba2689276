//! Reconciliation sweep over unsynced rows.

mod support;

use callboard_domain::RoleType;
use chrono::{Duration, NaiveDate};
use callboard_domain::utils::time::kst_today;
use support::{build_services, CalendarCall};

#[tokio::test]
async fn sweep_retries_unsynced_castings() {
    let services = build_services();
    let actor = services.store.add_actor("남배우1", RoleType::MaleLead);
    let slot =
        services.store.add_performance(NaiveDate::from_ymd_opt(2027, 6, 5).unwrap(), "15:15");

    // Provider down at assignment time: the casting commits unsynced.
    services.gateway.fail_from_now();
    services.casting.assign(&slot.id, Some(&actor.id), RoleType::MaleLead).await.unwrap();
    assert!(!services.store.casting_for(&slot.id, RoleType::MaleLead).unwrap().synced);

    // Provider back up: the sweep repairs the mirror.
    services.gateway.heal();
    let report = services.sync.sync_all().await.unwrap();

    assert_eq!(report.casting.synced, 1);
    assert_eq!(report.casting.failed, 0);

    let casting = services.store.casting_for(&slot.id, RoleType::MaleLead).unwrap();
    assert!(casting.synced);
    assert!(casting.calendar_event_id.is_some());
    assert!(casting.all_calendar_event_id.is_some());
}

#[tokio::test]
async fn sweep_counts_failures_without_aborting() {
    let services = build_services();
    let actor = services.store.add_actor("남배우1", RoleType::MaleLead);
    let slot =
        services.store.add_performance(NaiveDate::from_ymd_opt(2027, 6, 5).unwrap(), "15:15");

    services.gateway.fail_from_now();
    services.casting.assign(&slot.id, Some(&actor.id), RoleType::MaleLead).await.unwrap();

    let report = services.sync.sync_all().await.unwrap();

    assert_eq!(report.casting.synced, 0);
    assert_eq!(report.casting.failed, 1);
    assert!(!services.store.casting_for(&slot.id, RoleType::MaleLead).unwrap().synced);
}

#[tokio::test]
async fn sweep_mirrors_unsynced_unavailability() {
    let services = build_services();
    let actor =
        services.store.add_actor_with_calendar("남배우1", RoleType::MaleLead, "cal-personal");
    let slot =
        services.store.add_performance(NaiveDate::from_ymd_opt(2027, 6, 5).unwrap(), "15:15");
    services.store.add_unavailable(&actor.id, &slot.id);

    let report = services.sync.sync_all().await.unwrap();

    assert_eq!(report.unavailable.synced, 1);
    let row = services.store.with(|s| s.unavailability[0].clone());
    assert!(row.synced);
    assert!(row.calendar_event_id.is_some());
}

#[tokio::test]
async fn unavailability_without_calendar_is_skipped_not_failed() {
    let services = build_services();
    let actor = services.store.add_actor("남배우1", RoleType::MaleLead);
    let slot =
        services.store.add_performance(NaiveDate::from_ymd_opt(2027, 6, 5).unwrap(), "15:15");
    services.store.add_unavailable(&actor.id, &slot.id);

    let report = services.sync.sync_all().await.unwrap();

    assert_eq!(report.unavailable.synced, 0);
    assert_eq!(report.unavailable.failed, 0);
    assert!(!services.store.with(|s| s.unavailability[0].synced));
}

#[tokio::test]
async fn resync_replaces_existing_events() {
    let services = build_services();
    let actor = services.store.add_actor("남배우1", RoleType::MaleLead);
    let slot =
        services.store.add_performance(NaiveDate::from_ymd_opt(2027, 6, 5).unwrap(), "15:15");

    let casting = services
        .casting
        .assign(&slot.id, Some(&actor.id), RoleType::MaleLead)
        .await
        .unwrap()
        .unwrap();
    let old_event = casting.calendar_event_id.clone().unwrap();

    // Force a resync of the already-mirrored row.
    services.store.with(|s| {
        if let Some(c) = s.castings.iter_mut().find(|c| c.id == casting.id) {
            c.synced = false;
        }
    });

    services.sync.sync_all().await.unwrap();

    let calls = services.gateway.calls();
    assert!(calls.iter().any(|c| matches!(
        c,
        CalendarCall::DeleteCasting { event_id, notify: true } if *event_id == old_event
    )));

    let refreshed = services.store.casting_for(&slot.id, RoleType::MaleLead).unwrap();
    assert!(refreshed.synced);
    assert_ne!(refreshed.calendar_event_id.as_deref(), Some(old_event.as_str()));
}

#[tokio::test]
async fn future_description_scrub_blanks_male_lead_events() {
    let services = build_services();
    let actor = services.store.add_actor("남배우1", RoleType::MaleLead);
    let future = kst_today() + Duration::days(7);
    let slot = services.store.add_performance(future, "15:15");

    let casting = services
        .casting
        .assign(&slot.id, Some(&actor.id), RoleType::MaleLead)
        .await
        .unwrap()
        .unwrap();
    let event_id = casting.calendar_event_id.clone().unwrap();

    let report = services.sync.cleanup_future_descriptions().await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.cleaned, 1);
    assert_eq!(report.failed, 0);

    let calls = services.gateway.calls();
    assert!(calls.iter().any(|c| matches!(
        c,
        CalendarCall::UpdateDescription { event_id: e, description: None } if *e == event_id
    )));
}
