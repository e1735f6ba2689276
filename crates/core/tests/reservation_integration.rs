//! Reservation ingestion, reconciliation, and memo cleanup.

mod support;

use std::collections::HashMap;

use callboard_core::reservation::service::BookingDetail;
use callboard_domain::utils::time::kst_today;
use callboard_domain::{Booking, RoleType};
use chrono::{Duration, NaiveDate};
use support::{build_services, CalendarCall};

fn booking(time: &str) -> Booking {
    Booking {
        customer_name: "김철수".into(),
        phone_number: "010-1234-5678".into(),
        booking_time: time.into(),
        has_visitor: false,
        visitor_name: None,
        visitor_phone: None,
    }
}

#[tokio::test]
async fn records_bookings_per_item() {
    let services = build_services();
    let date = NaiveDate::from_ymd_opt(2027, 6, 5).unwrap();
    let slot = services.store.add_performance(date, "15:15");
    services.store.add_performance(date, "13:00");

    let outcomes = services
        .reservation
        .record_bookings(
            date,
            &[
                booking("오후 3:15"),  // matches the 15:15 slot
                booking("whenever"),   // unparseable
                booking("오후 9:00"),  // parses to 21:00, no such slot
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].success);
    assert!(!outcomes[1].success);
    assert!(!outcomes[2].success);

    let status = services.store.reservation_for(&slot.id).unwrap();
    assert!(status.has_reservation);
    assert_eq!(status.reservation_name.as_deref(), Some("김철수"));
    assert_eq!(status.reservation_contact.as_deref(), Some("010-1234-5678"));
}

#[tokio::test]
async fn no_slots_on_date_is_not_found() {
    let services = build_services();
    let date = NaiveDate::from_ymd_opt(2027, 6, 5).unwrap();

    let err = services.reservation.record_bookings(date, &[booking("오후 3:15")]).await.unwrap_err();
    assert!(matches!(err, callboard_domain::CallboardError::NotFound(_)));
}

#[tokio::test]
async fn visitor_identity_wins_on_memo() {
    let services = build_services();
    let date = NaiveDate::from_ymd_opt(2027, 6, 5).unwrap();
    let slot = services.store.add_performance(date, "15:15");

    let mut b = booking("오후 3:15");
    b.has_visitor = true;
    b.visitor_name = Some("이영희".into());
    b.visitor_phone = Some("010-9999-0000".into());

    services.reservation.record_bookings(date, &[b]).await.unwrap();

    let status = services.store.reservation_for(&slot.id).unwrap();
    assert_eq!(status.reservation_name.as_deref(), Some("이영희"));
    assert_eq!(status.reservation_contact.as_deref(), Some("010-9999-0000"));
}

#[tokio::test]
async fn todays_booking_patches_male_lead_description() {
    let services = build_services();
    let today = kst_today();
    let slot = services.store.add_performance(today, "15:15");
    let actor = services.store.add_actor("남배우1", RoleType::MaleLead);

    let casting = services
        .casting
        .assign(&slot.id, Some(&actor.id), RoleType::MaleLead)
        .await
        .unwrap()
        .unwrap();
    let event_id = casting.calendar_event_id.clone().unwrap();

    services.reservation.record_bookings(today, &[booking("오후 3:15")]).await.unwrap();

    let calls = services.gateway.calls();
    assert!(calls.iter().any(|c| matches!(
        c,
        CalendarCall::UpdateDescription { event_id: e, description: Some(d) }
            if *e == event_id && d.contains("예약자: 김철수")
    )));
}

#[tokio::test]
async fn sync_reconciles_whole_month_and_clears_stale_memos() {
    let services = build_services();

    // Pre-populate the month and leave a stale memo on one slot.
    let slots = services.schedule.ensure_month(2027, 6).await.unwrap();
    let stale_slot = slots[0].clone();
    services.store.with(|s| {
        s.reservations.push(callboard_domain::ReservationStatus {
            id: "stale".into(),
            performance_date_id: stale_slot.id.clone(),
            has_reservation: true,
            reservation_name: Some("남아있는 손님".into()),
            reservation_contact: Some("010-0000-0000".into()),
            checked_at: 0,
        });
    });

    let reserved_slot = slots.iter().find(|p| p.start_time == "17:30").unwrap().clone();
    let mut reservations = HashMap::new();
    reservations.insert(
        reserved_slot.date.to_string(),
        vec![reserved_slot.start_time.clone()],
    );
    let mut details = HashMap::new();
    details.insert(
        format!("{}_{}", reserved_slot.date, reserved_slot.start_time),
        BookingDetail {
            reservation_name: Some("김철수".into()),
            reservation_contact: Some("010-1234-5678".into()),
        },
    );

    let report = services
        .reservation
        .sync_reservations(&[(2027, 6)], &reservations, &details)
        .await
        .unwrap();

    assert_eq!(report.total, slots.len());
    assert_eq!(report.reserved, 1);

    let stale = services.store.reservation_for(&stale_slot.id).unwrap();
    assert!(!stale.has_reservation);
    assert!(stale.reservation_name.is_none());

    let reserved = services.store.reservation_for(&reserved_slot.id).unwrap();
    assert!(reserved.has_reservation);
    assert_eq!(reserved.reservation_name.as_deref(), Some("김철수"));
}

#[tokio::test]
async fn cleanup_nulls_past_memos_and_patches_descriptions() {
    let services = build_services();
    let yesterday = kst_today() - Duration::days(1);
    let slot = services.store.add_performance(yesterday, "15:15");
    let actor = services.store.add_actor("남배우1", RoleType::MaleLead);

    let casting = services
        .casting
        .assign(&slot.id, Some(&actor.id), RoleType::MaleLead)
        .await
        .unwrap()
        .unwrap();
    let event_id = casting.calendar_event_id.clone().unwrap();

    services
        .store
        .with(|s| {
            s.reservations.push(callboard_domain::ReservationStatus {
                id: "memo".into(),
                performance_date_id: slot.id.clone(),
                has_reservation: true,
                reservation_name: Some("김철수".into()),
                reservation_contact: Some("010-1234-5678".into()),
                checked_at: 0,
            });
        });

    let report = services.reservation.cleanup_past_memos().await.unwrap();

    assert_eq!(report.cleaned, 1);
    assert_eq!(report.calendar_updated, 1);

    let status = services.store.reservation_for(&slot.id).unwrap();
    assert!(status.reservation_name.is_none());
    assert!(status.reservation_contact.is_none());

    // Partner line (none here) survives; the memo is gone entirely.
    let calls = services.gateway.calls();
    assert!(calls.iter().any(|c| matches!(
        c,
        CalendarCall::UpdateDescription { event_id: e, description: None } if *e == event_id
    )));
}

#[tokio::test]
async fn future_memos_are_left_alone() {
    let services = build_services();
    let tomorrow = kst_today() + Duration::days(1);
    let slot = services.store.add_performance(tomorrow, "15:15");

    services.store.with(|s| {
        s.reservations.push(callboard_domain::ReservationStatus {
            id: "memo".into(),
            performance_date_id: slot.id.clone(),
            has_reservation: true,
            reservation_name: Some("김철수".into()),
            reservation_contact: None,
            checked_at: 0,
        });
    });

    let report = services.reservation.cleanup_past_memos().await.unwrap();

    assert_eq!(report.cleaned, 0);
    assert!(services.store.reservation_for(&slot.id).unwrap().reservation_name.is_some());
}

#[tokio::test]
async fn trigger_sync_requires_configured_webhook() {
    let services = build_services();

    let err = services.reservation.trigger_sync().await.unwrap_err();
    assert!(matches!(err, callboard_domain::CallboardError::Config(_)));
}
