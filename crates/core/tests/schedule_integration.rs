//! Month-slot generation behavior.

mod support;

use callboard_domain::constants::SHOW_TIMES;
use chrono::NaiveDate;
use support::build_services;

#[tokio::test]
async fn generates_full_grid_for_empty_month() {
    let services = build_services();

    let slots = services.schedule.ensure_month(2027, 3).await.unwrap();

    assert_eq!(slots.len(), 31 * SHOW_TIMES.len());
    assert_eq!(slots[0].date, NaiveDate::from_ymd_opt(2027, 3, 1).unwrap());
    assert_eq!(slots[0].start_time, "10:45");
    assert_eq!(slots[4].start_time, "19:45");
}

#[tokio::test]
async fn second_call_creates_zero_rows() {
    let services = build_services();

    let first = services.schedule.ensure_month(2027, 3).await.unwrap();
    let count_after_first = services.store.with(|s| s.performances.len());

    let second = services.schedule.ensure_month(2027, 3).await.unwrap();
    let count_after_second = services.store.with(|s| s.performances.len());

    assert_eq!(first.len(), second.len());
    assert_eq!(count_after_first, count_after_second);
}

#[tokio::test]
async fn completes_partial_month_without_resetting() {
    let services = build_services();

    // Seed one pre-existing slot; generation must keep it and only fill
    // the gaps.
    let seeded = services
        .store
        .add_performance(NaiveDate::from_ymd_opt(2027, 4, 10).unwrap(), "13:00");

    let slots = services.schedule.ensure_month(2027, 4).await.unwrap();

    assert_eq!(slots.len(), 30 * SHOW_TIMES.len());
    assert!(slots.iter().any(|p| p.id == seeded.id));
    let dupes = slots
        .iter()
        .filter(|p| p.date == seeded.date && p.start_time == seeded.start_time)
        .count();
    assert_eq!(dupes, 1);
}

#[tokio::test]
async fn rejects_invalid_month() {
    let services = build_services();

    let err = services.schedule.ensure_month(2027, 13).await.unwrap_err();
    assert!(matches!(err, callboard_domain::CallboardError::InvalidInput(_)));
}

#[tokio::test]
async fn sorted_by_date_then_start_time() {
    let services = build_services();

    let slots = services.schedule.ensure_month(2027, 5).await.unwrap();

    let mut expected = slots.clone();
    expected.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
    let ids: Vec<&str> = slots.iter().map(|p| p.id.as_str()).collect();
    let expected_ids: Vec<&str> = expected.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, expected_ids);
}
