//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tokio::sync::watch;

use keeper_core::config::NotifierConfig;
use keeper_core::traits::channel::{ChannelKind, DeliveryChannel, DeliveryError};
use keeper_core::types::contact::UserContact;
use keeper_core::types::id::{RecordId, UserId};
use keeper_core::types::preference::{ChannelPreference, NotificationPreference};
use keeper_core::types::warranty::WarrantyRecord;
use keeper_database::memory::{MemoryContactStore, MemoryPreferenceStore, MemoryRecordStore};
use keeper_notify::gate::MemoryGate;
use keeper_worker::jobs::TickReport;
use keeper_worker::{EngineParts, NotifierEngine};

/// A delivered message as seen by a recording channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub recipient: String,
    pub subject: String,
}

/// Channel that records deliveries and can be told to fail or stall.
pub struct RecordingChannel {
    kind: ChannelKind,
    failure: Mutex<Option<DeliveryError>>,
    delay: Mutex<Duration>,
    sent: Mutex<Vec<Sent>>,
    attempts: Mutex<usize>,
}

impl RecordingChannel {
    pub fn new(kind: ChannelKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            failure: Mutex::new(None),
            delay: Mutex::new(Duration::ZERO),
            sent: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
        })
    }

    pub fn fail_with(&self, err: DeliveryError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn stall_for(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn deliver(&self, recipient: &str, subject: &str, _body: &str) -> Result<(), DeliveryError> {
        *self.attempts.lock().unwrap() += 1;

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        self.sent.lock().unwrap().push(Sent {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
        });
        Ok(())
    }
}

/// Test application context: an engine over in-memory backends.
pub struct TestApp {
    pub records: MemoryRecordStore,
    pub preferences: MemoryPreferenceStore,
    pub contacts: MemoryContactStore,
    pub gate: Arc<MemoryGate>,
    pub email: Arc<RecordingChannel>,
    pub sms: Arc<RecordingChannel>,
    pub engine: NotifierEngine,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(NotifierConfig::default())
    }

    pub fn with_config(config: NotifierConfig) -> Self {
        let records = MemoryRecordStore::new();
        let preferences = MemoryPreferenceStore::new();
        let contacts = MemoryContactStore::new();
        let gate = Arc::new(MemoryGate::new());
        let email = RecordingChannel::new(ChannelKind::Email);
        let sms = RecordingChannel::new(ChannelKind::Sms);

        let engine = NotifierEngine::from_parts(
            config,
            EngineParts {
                records: Arc::new(records.clone()),
                preferences: Arc::new(preferences.clone()),
                contacts: Arc::new(contacts.clone()),
                gate: gate.clone(),
                email: email.clone(),
                sms: sms.clone(),
            },
        );

        Self {
            records,
            preferences,
            contacts,
            gate,
            email,
            sms,
            engine,
        }
    }

    /// Register a user with full contact details and the given settings.
    pub fn add_user(
        &self,
        channels: ChannelPreference,
        lookahead_days: u32,
        phone_verified: bool,
    ) -> UserId {
        let user = UserId::new();
        self.preferences.insert(NotificationPreference {
            user_id: user,
            channels,
            lookahead_days,
            opted_out: false,
        });
        self.contacts.insert(
            user,
            UserContact {
                email: Some(format!("{}@example.com", &user.to_string()[..8])),
                phone: Some("+15550142".to_string()),
                phone_verified,
            },
        );
        user
    }

    /// Add a warranty for `user` that ends on `expires_on`.
    pub fn add_warranty(&self, user: UserId, product: &str, expires_on: NaiveDate) -> RecordId {
        // A one-year warranty bought a year earlier, or a same-day zero-month
        // warranty where month clamping would shift the date (Feb 29).
        let one_year = expires_on
            .checked_sub_months(chrono::Months::new(12))
            .map(|purchased| {
                WarrantyRecord::new(RecordId::new(), user, product, None, purchased, Some(12))
            })
            .filter(|record| record.expiration_date == Some(expires_on));
        let record = one_year.unwrap_or_else(|| {
            WarrantyRecord::new(RecordId::new(), user, product, None, expires_on, Some(0))
        });
        let id = record.id;
        self.records.insert(record);
        id
    }

    /// Run one expiration tick for `day`.
    pub async fn tick(&self, day: NaiveDate) -> TickReport {
        let (_tx, rx) = watch::channel(false);
        self.engine
            .expiration_job()
            .run_for_day(day, rx)
            .await
            .expect("tick should succeed")
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn plus_days(date: NaiveDate, days: u64) -> NaiveDate {
    date + Days::new(days)
}
