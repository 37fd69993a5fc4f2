//! Purges old dedup entries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use tokio::sync::watch;

use keeper_core::traits::gate::NotificationGate;

use crate::executor::{JobExecutionError, ScheduledJob};

/// Deletes gate entries older than the retention window.
pub struct GateCleanupJob {
    gate: Arc<dyn NotificationGate>,
    retention_days: u32,
}

impl GateCleanupJob {
    /// Create the job.
    pub fn new(gate: Arc<dyn NotificationGate>, retention_days: u32) -> Self {
        Self {
            gate,
            retention_days,
        }
    }

    /// Purge entries for days before `today - retention_days`.
    pub async fn run_for_day(&self, today: NaiveDate) -> Result<u64, JobExecutionError> {
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(self.retention_days)))
            .unwrap_or(NaiveDate::MIN);

        let removed = self
            .gate
            .purge_before(cutoff)
            .await
            .map_err(JobExecutionError::from_app_error)?;

        if removed > 0 {
            tracing::info!(%cutoff, removed, "Purged old notification gate entries");
        }
        Ok(removed)
    }
}

#[async_trait]
impl ScheduledJob for GateCleanupJob {
    fn name(&self) -> &str {
        "gate_cleanup"
    }

    async fn run(&self, _cancel: watch::Receiver<bool>) -> Result<(), JobExecutionError> {
        self.run_for_day(Utc::now().date_naive()).await.map(|_| ())
    }
}
