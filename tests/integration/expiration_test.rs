//! Integration tests for the expiration tick: scan, classify, dedup, deliver.

mod helpers;

use tokio::sync::watch;

use keeper_core::traits::channel::DeliveryError;
use keeper_core::traits::gate::NotificationGate;
use keeper_core::types::preference::ChannelPreference;

use helpers::{TestApp, day, plus_days};

#[tokio::test]
async fn test_one_notification_per_day() {
    let app = TestApp::new();
    let today = day(2026, 7, 10);
    let user = app.add_user(ChannelPreference::EmailOnly, 7, false);
    app.add_warranty(user, "Robot Vacuum", plus_days(today, 5));

    let first = app.tick(today).await;
    assert_eq!(first.scanned, 1);
    assert_eq!(first.notified, 1);
    assert_eq!(app.email.sent().len(), 1);
    assert_eq!(
        app.email.sent()[0].subject,
        "Warranty expires in 5 days: Robot Vacuum"
    );

    let rerun = app.tick(today).await;
    assert_eq!(rerun.scanned, 1);
    assert_eq!(rerun.suppressed, 1);
    assert_eq!(rerun.notified, 0);
    assert_eq!(app.email.sent().len(), 1);

    let tomorrow = app.tick(plus_days(today, 1)).await;
    assert_eq!(tomorrow.notified, 1);
    assert_eq!(app.email.sent().len(), 2);
}

#[tokio::test]
async fn test_record_beyond_threshold_is_not_scanned() {
    let app = TestApp::new();
    let today = day(2026, 7, 10);
    let user = app.add_user(ChannelPreference::EmailOnly, 30, false);
    app.add_warranty(user, "Projector", plus_days(today, 40));

    let report = app.tick(today).await;

    assert_eq!(report.scanned, 0);
    assert!(app.email.sent().is_empty());
}

#[tokio::test]
async fn test_all_channels_failing_retries_next_tick() {
    let app = TestApp::new();
    let today = day(2026, 7, 10);
    let user = app.add_user(ChannelPreference::EmailOnly, 7, false);
    let record = app.add_warranty(user, "Router", plus_days(today, 2));
    app.email
        .fail_with(DeliveryError::Transient("relay unavailable".into()));

    let failed = app.tick(today).await;
    assert_eq!(failed.failed, 1);
    assert_eq!(failed.notified, 0);
    assert!(app.gate.should_notify(&user, &record, today).await.unwrap());

    app.email.recover();
    let retried = app.tick(today).await;
    assert_eq!(retried.notified, 1);
    assert!(!app.gate.should_notify(&user, &record, today).await.unwrap());
    assert_eq!(app.email.attempts(), 2);
}

#[tokio::test]
async fn test_expired_warranties_are_reported_first() {
    let app = TestApp::new();
    let today = day(2026, 7, 10);
    let user = app.add_user(ChannelPreference::EmailOnly, 30, false);
    app.add_warranty(user, "Camera", today.pred_opt().unwrap());
    app.add_warranty(user, "Speaker", plus_days(today, 12));

    let previews = app.engine.expiration_job().preview(today).await.unwrap();

    assert_eq!(previews.len(), 2);
    assert_eq!(previews[0].candidate.record.product_name, "Camera");
    assert_eq!(previews[0].candidate.days_left, -1);
    assert!(previews.iter().all(|p| p.would_notify));
    assert!(app.email.sent().is_empty());
}

#[tokio::test]
async fn test_cancelled_tick_starts_no_candidates() {
    let app = TestApp::new();
    let today = day(2026, 7, 10);
    let user = app.add_user(ChannelPreference::EmailOnly, 7, false);
    app.add_warranty(user, "Monitor", plus_days(today, 3));
    app.add_warranty(user, "Keyboard", plus_days(today, 4));

    let (_tx, rx) = watch::channel(true);
    let report = app
        .engine
        .expiration_job()
        .run_for_day(today, rx)
        .await
        .unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.cancelled, 2);
    assert_eq!(app.email.attempts(), 0);
}

#[tokio::test]
async fn test_many_users_each_notified_once() {
    let app = TestApp::new();
    let today = day(2026, 7, 10);
    for i in 0..25u64 {
        let user = app.add_user(ChannelPreference::EmailOnly, 7, false);
        app.add_warranty(user, "Headphones", plus_days(today, i % 8));
    }

    let report = app.tick(today).await;
    assert_eq!(report.scanned, 25);
    assert_eq!(report.notified, 25);

    let again = app.tick(today).await;
    assert_eq!(again.suppressed, 25);
    assert_eq!(app.email.sent().len(), 25);
    assert_eq!(app.gate.len(), 25);
}
