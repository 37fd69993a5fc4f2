//! Assembles the notifier from configuration and drives its schedulers.

use std::sync::Arc;
use std::time::Duration;

use keeper_core::config::{AppConfig, NotifierConfig};
use keeper_core::result::AppResult;
use keeper_core::traits::channel::DeliveryChannel;
use keeper_core::traits::gate::NotificationGate;
use keeper_core::traits::store::{ContactStore, PreferenceStore, RecordStore};
use keeper_database::DatabasePool;
use keeper_database::repositories::{ContactRepository, PreferenceRepository, WarrantyRepository};
use keeper_notify::NotificationDispatcher;
use keeper_notify::channels::{build_email_channel, build_sms_channel};
use keeper_notify::gate::build_gate;

use crate::jobs::{ExpirationJob, GateCleanupJob};
use crate::scanner::ExpirationScanner;
use crate::scheduler::PeriodicScheduler;

/// The backends an engine runs against.
pub struct EngineParts {
    /// Warranty records.
    pub records: Arc<dyn RecordStore>,
    /// Notification preferences.
    pub preferences: Arc<dyn PreferenceStore>,
    /// Contact details.
    pub contacts: Arc<dyn ContactStore>,
    /// Dedup gate.
    pub gate: Arc<dyn NotificationGate>,
    /// Email channel.
    pub email: Arc<dyn DeliveryChannel>,
    /// SMS channel.
    pub sms: Arc<dyn DeliveryChannel>,
}

/// The warranty expiration notifier: two jobs on two schedulers.
pub struct NotifierEngine {
    config: NotifierConfig,
    expiration_job: Arc<ExpirationJob>,
    cleanup_job: Arc<GateCleanupJob>,
    expiration_scheduler: PeriodicScheduler,
    cleanup_scheduler: PeriodicScheduler,
}

impl std::fmt::Debug for NotifierEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NotifierEngine {
    /// Build the engine on PostgreSQL stores and the configured gate and
    /// channel transports.
    pub fn from_config(config: &AppConfig, db: &DatabasePool) -> AppResult<Self> {
        let pool = db.pool().clone();
        let parts = EngineParts {
            records: Arc::new(WarrantyRepository::new(pool.clone())),
            preferences: Arc::new(PreferenceRepository::new(pool.clone())),
            contacts: Arc::new(ContactRepository::new(pool)),
            gate: build_gate(&config.notifier.gate, db),
            email: build_email_channel(&config.channels.email)?,
            sms: build_sms_channel(&config.channels.sms)?,
        };
        Ok(Self::from_parts(config.notifier.clone(), parts))
    }

    /// Build the engine on explicit backends.
    pub fn from_parts(config: NotifierConfig, parts: EngineParts) -> Self {
        let scanner = ExpirationScanner::new(parts.records, parts.preferences, &config);
        let dispatcher = NotificationDispatcher::new(parts.contacts, parts.email, parts.sms);
        let expiration_job = Arc::new(ExpirationJob::new(
            scanner,
            Arc::clone(&parts.gate),
            dispatcher,
            config.dispatch_concurrency,
        ));
        let cleanup_job = Arc::new(GateCleanupJob::new(parts.gate, config.gate.retention_days));

        let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_seconds);
        Self {
            expiration_scheduler: PeriodicScheduler::new("warranty_expiration", shutdown_timeout),
            cleanup_scheduler: PeriodicScheduler::new("gate_cleanup", shutdown_timeout),
            expiration_job,
            cleanup_job,
            config,
        }
    }

    /// The expiration job, for one-shot runs and previews.
    pub fn expiration_job(&self) -> &Arc<ExpirationJob> {
        &self.expiration_job
    }

    /// The gate cleanup job.
    pub fn cleanup_job(&self) -> &Arc<GateCleanupJob> {
        &self.cleanup_job
    }

    /// Start both schedulers. Does nothing when the notifier is disabled.
    pub async fn start(&self) -> AppResult<()> {
        if !self.config.enabled {
            tracing::info!("Expiration notifier disabled by configuration");
            return Ok(());
        }

        self.expiration_scheduler
            .start(
                Duration::from_secs(self.config.scan_interval_seconds),
                self.expiration_job.clone(),
            )
            .await?;

        if let Err(e) = self
            .cleanup_scheduler
            .start(
                Duration::from_secs(self.config.gate.cleanup_interval_seconds),
                self.cleanup_job.clone(),
            )
            .await
        {
            self.expiration_scheduler.stop().await;
            return Err(e);
        }

        tracing::info!(
            scan_interval_secs = self.config.scan_interval_seconds,
            cleanup_interval_secs = self.config.gate.cleanup_interval_seconds,
            "Expiration notifier started"
        );
        Ok(())
    }

    /// Stop both schedulers, waiting for in-flight ticks.
    pub async fn stop(&self) {
        tokio::join!(self.expiration_scheduler.stop(), self.cleanup_scheduler.stop());
        tracing::info!("Expiration notifier stopped");
    }

    /// Whether the expiration scheduler is running.
    pub async fn is_running(&self) -> bool {
        self.expiration_scheduler.is_running().await
    }
}
