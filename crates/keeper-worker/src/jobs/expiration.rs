//! The expiration notification tick.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use keeper_core::result::AppResult;
use keeper_core::traits::gate::NotificationGate;
use keeper_core::types::warranty::ExpiringWarranty;
use keeper_notify::{MessageFormatter, NotificationDispatcher};

use crate::executor::{JobExecutionError, ScheduledJob};
use crate::scanner::ExpirationScanner;

/// Counters for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Candidates returned by the scan.
    pub scanned: usize,
    /// Candidates the gate had already seen today.
    pub suppressed: usize,
    /// Candidates delivered on at least one channel.
    pub notified: usize,
    /// Candidates where every attempted channel failed.
    pub failed: usize,
    /// Candidates where nothing was attempted.
    pub skipped: usize,
    /// Candidates not started because of shutdown.
    pub cancelled: usize,
}

/// A scan candidate and whether the gate would let it through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanPreview {
    /// The candidate.
    pub candidate: ExpiringWarranty,
    /// `false` if already notified that day.
    pub would_notify: bool,
}

#[derive(Debug, Clone, Copy)]
enum CandidateOutcome {
    Suppressed,
    Notified,
    Failed,
    Skipped,
    Cancelled,
}

impl TickReport {
    fn record(&mut self, outcome: CandidateOutcome) {
        match outcome {
            CandidateOutcome::Suppressed => self.suppressed += 1,
            CandidateOutcome::Notified => self.notified += 1,
            CandidateOutcome::Failed => self.failed += 1,
            CandidateOutcome::Skipped => self.skipped += 1,
            CandidateOutcome::Cancelled => self.cancelled += 1,
        }
    }
}

/// Scanner → classifier → gate → formatter → dispatcher → gate.
pub struct ExpirationJob {
    scanner: ExpirationScanner,
    gate: Arc<dyn NotificationGate>,
    dispatcher: NotificationDispatcher,
    concurrency: usize,
}

impl std::fmt::Debug for ExpirationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpirationJob")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl ExpirationJob {
    /// Create the job. `concurrency` bounds in-flight dispatches per tick.
    pub fn new(
        scanner: ExpirationScanner,
        gate: Arc<dyn NotificationGate>,
        dispatcher: NotificationDispatcher,
        concurrency: usize,
    ) -> Self {
        Self {
            scanner,
            gate,
            dispatcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Run the tick for a specific calendar day.
    pub async fn run_for_day(
        &self,
        day: NaiveDate,
        cancel: watch::Receiver<bool>,
    ) -> Result<TickReport, JobExecutionError> {
        let candidates = self
            .scanner
            .scan(day)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Expiration scan failed: {e}")))?;

        let mut report = TickReport {
            scanned: candidates.len(),
            ..Default::default()
        };

        let outcomes: Vec<CandidateOutcome> = futures::stream::iter(candidates)
            .map(|candidate| self.process_unless_cancelled(candidate, day, cancel.clone()))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            report.record(outcome);
        }

        if report.cancelled > 0 {
            tracing::info!(
                %day,
                cancelled = report.cancelled,
                "Expiration tick interrupted by shutdown"
            );
        }
        Ok(report)
    }

    /// Scan `day` and report what the gate would do, without delivering.
    pub async fn preview(&self, day: NaiveDate) -> AppResult<Vec<ScanPreview>> {
        let candidates = self.scanner.scan(day).await?;
        let mut previews = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let would_notify = self
                .gate
                .should_notify(&candidate.user_id(), &candidate.record_id(), day)
                .await?;
            previews.push(ScanPreview {
                candidate,
                would_notify,
            });
        }
        Ok(previews)
    }

    async fn process_unless_cancelled(
        &self,
        candidate: ExpiringWarranty,
        day: NaiveDate,
        cancel: watch::Receiver<bool>,
    ) -> CandidateOutcome {
        if *cancel.borrow() {
            return CandidateOutcome::Cancelled;
        }
        self.process(&candidate, day).await
    }

    async fn process(&self, candidate: &ExpiringWarranty, day: NaiveDate) -> CandidateOutcome {
        let user_id = candidate.user_id();
        let record_id = candidate.record_id();

        match self.gate.should_notify(&user_id, &record_id, day).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::trace!(user_id = %user_id, record_id = %record_id, "Already notified today");
                return CandidateOutcome::Suppressed;
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    record_id = %record_id,
                    error = %e,
                    "Gate check failed; skipping candidate"
                );
                return CandidateOutcome::Skipped;
            }
        }

        let message = MessageFormatter::format(candidate);
        let result = self.dispatcher.dispatch(&candidate.preference, &message).await;

        if result.any_delivered() {
            if let Err(e) = self.gate.mark_notified(&user_id, &record_id, day).await {
                tracing::error!(
                    user_id = %user_id,
                    record_id = %record_id,
                    error = %e,
                    "Failed to record notification; it may be repeated"
                );
            }
            CandidateOutcome::Notified
        } else if result.any_failed() {
            CandidateOutcome::Failed
        } else {
            CandidateOutcome::Skipped
        }
    }
}

#[async_trait]
impl ScheduledJob for ExpirationJob {
    fn name(&self) -> &str {
        "warranty_expiration"
    }

    async fn run(&self, cancel: watch::Receiver<bool>) -> Result<(), JobExecutionError> {
        let day = Utc::now().date_naive();
        let report = self.run_for_day(day, cancel).await?;

        tracing::info!(
            %day,
            scanned = report.scanned,
            suppressed = report.suppressed,
            notified = report.notified,
            failed = report.failed,
            skipped = report.skipped,
            cancelled = report.cancelled,
            "Expiration tick complete"
        );
        Ok(())
    }
}
