//! Integration tests for per-channel fan-out through the expiration tick.

mod helpers;

use std::time::Duration;

use keeper_core::config::NotifierConfig;
use keeper_core::traits::channel::DeliveryError;
use keeper_core::traits::gate::NotificationGate;
use keeper_core::types::preference::{ChannelPreference, NotificationPreference};

use helpers::{TestApp, day, plus_days};

#[tokio::test]
async fn test_sms_failure_still_marks_gate_when_email_delivers() {
    let app = TestApp::new();
    let today = day(2026, 8, 3);
    let user = app.add_user(ChannelPreference::Both, 7, true);
    let record = app.add_warranty(user, "Smart Watch", plus_days(today, 6));
    app.sms
        .fail_with(DeliveryError::Permanent("number blocked".into()));

    let report = app.tick(today).await;

    assert_eq!(report.notified, 1);
    assert_eq!(app.email.sent().len(), 1);
    assert_eq!(app.sms.attempts(), 1);
    assert!(app.sms.sent().is_empty());
    assert!(!app.gate.should_notify(&user, &record, today).await.unwrap());
}

#[tokio::test]
async fn test_unverified_phone_only_gets_email() {
    let app = TestApp::new();
    let today = day(2026, 8, 3);
    let user = app.add_user(ChannelPreference::Both, 7, false);
    app.add_warranty(user, "Tablet", plus_days(today, 1));

    let report = app.tick(today).await;

    assert_eq!(report.notified, 1);
    assert_eq!(app.email.sent().len(), 1);
    assert_eq!(app.sms.attempts(), 0);
}

#[tokio::test]
async fn test_both_channels_delivered_to_verified_user() {
    let app = TestApp::new();
    let today = day(2026, 8, 3);
    let user = app.add_user(ChannelPreference::Both, 7, true);
    app.add_warranty(user, "E-Bike", today);

    app.tick(today).await;

    assert_eq!(app.email.sent().len(), 1);
    assert_eq!(app.sms.sent().len(), 1);
    assert_eq!(app.sms.sent()[0].recipient, "+15550142");
    assert_eq!(app.email.sent()[0].subject, "Warranty expires today: E-Bike");
}

#[tokio::test]
async fn test_sms_only_with_unverified_phone_is_skipped_not_marked() {
    let app = TestApp::new();
    let today = day(2026, 8, 3);
    let user = app.add_user(ChannelPreference::SmsOnly, 7, false);
    let record = app.add_warranty(user, "Drone", plus_days(today, 4));

    let report = app.tick(today).await;

    assert_eq!(report.skipped, 1);
    assert_eq!(report.notified, 0);
    assert_eq!(app.email.attempts() + app.sms.attempts(), 0);
    assert!(app.gate.should_notify(&user, &record, today).await.unwrap());
}

#[tokio::test]
async fn test_opted_out_user_never_contacted() {
    let app = TestApp::new();
    let today = day(2026, 8, 3);
    let user = app.add_user(ChannelPreference::Both, 7, true);
    app.preferences.insert(NotificationPreference {
        user_id: user,
        channels: ChannelPreference::Both,
        lookahead_days: 7,
        opted_out: true,
    });
    app.add_warranty(user, "Console", plus_days(today, 2));

    let report = app.tick(today).await;

    assert_eq!(report.scanned, 0);
    assert_eq!(app.email.attempts() + app.sms.attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_channels_follow_preference_seen_by_scan() {
    let app = TestApp::with_config(NotifierConfig {
        dispatch_concurrency: 1,
        ..Default::default()
    });
    let today = day(2026, 8, 3);
    let user = app.add_user(ChannelPreference::Both, 7, true);
    app.add_warranty(user, "Router", plus_days(today, 2));
    app.add_warranty(user, "Modem", plus_days(today, 3));
    app.email.stall_for(Duration::from_secs(10));

    // The second candidate is dispatched after this edit lands.
    let edit = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        app.preferences.insert(NotificationPreference {
            user_id: user,
            channels: ChannelPreference::SmsOnly,
            lookahead_days: 7,
            opted_out: false,
        });
    };
    let (report, ()) = tokio::join!(app.tick(today), edit);

    assert_eq!(report.notified, 2);
    assert_eq!(app.email.sent().len(), 2);
    assert_eq!(app.sms.sent().len(), 2);
}
