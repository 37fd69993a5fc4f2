//! Integration tests for the engine lifecycle on a real scheduler.

mod helpers;

use std::time::Duration;

use chrono::Utc;

use keeper_core::config::NotifierConfig;
use keeper_core::traits::gate::NotificationGate;
use keeper_core::types::preference::ChannelPreference;

use helpers::{TestApp, plus_days};

fn fast_config() -> NotifierConfig {
    NotifierConfig {
        scan_interval_seconds: 60,
        shutdown_timeout_seconds: 30,
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_repeated_ticks_notify_once_per_day() {
    let app = TestApp::with_config(fast_config());
    let today = Utc::now().date_naive();
    let user = app.add_user(ChannelPreference::EmailOnly, 7, false);
    app.add_warranty(user, "Printer", plus_days(today, 3));

    app.engine.start().await.unwrap();
    tokio::time::sleep(Duration::from_secs(300)).await;
    app.engine.stop().await;

    assert_eq!(app.email.sent().len(), 1);
    assert!(!app.engine.is_running().await);
}

#[tokio::test(start_paused = true)]
async fn test_stop_waits_for_in_flight_delivery() {
    let app = TestApp::with_config(fast_config());
    let today = Utc::now().date_naive();
    let user = app.add_user(ChannelPreference::EmailOnly, 7, false);
    let record = app.add_warranty(user, "Scanner", plus_days(today, 1));
    app.email.stall_for(Duration::from_secs(10));

    app.engine.start().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(app.email.attempts(), 1);

    app.engine.stop().await;

    assert_eq!(app.email.sent().len(), 1);
    assert!(!app.gate.should_notify(&user, &record, today).await.unwrap());
}

#[tokio::test]
async fn test_disabled_engine_does_not_start() {
    let app = TestApp::with_config(NotifierConfig {
        enabled: false,
        ..Default::default()
    });

    app.engine.start().await.unwrap();

    assert!(!app.engine.is_running().await);
    app.engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_engine_cannot_start_twice() {
    let app = TestApp::with_config(fast_config());

    app.engine.start().await.unwrap();
    assert!(app.engine.start().await.is_err());
    app.engine.stop().await;
}
