//! Fixed-interval scheduler with cooperative cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use keeper_core::error::AppError;

use crate::executor::{ScheduledJob, execute_tick};

struct Running {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Runs one job on a fixed interval, one tick at a time.
///
/// The first tick fires immediately on `start`. A tick that comes due while
/// the previous one is still running is skipped.
pub struct PeriodicScheduler {
    name: String,
    shutdown_timeout: Duration,
    running: Mutex<Option<Running>>,
}

impl std::fmt::Debug for PeriodicScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicScheduler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PeriodicScheduler {
    /// Create a stopped scheduler.
    pub fn new(name: impl Into<String>, shutdown_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            shutdown_timeout,
            running: Mutex::new(None),
        }
    }

    /// Whether the scheduler has been started and not stopped.
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Start invoking `job` every `interval`.
    ///
    /// Fails if the scheduler is already running or the interval is zero.
    pub async fn start(&self, interval: Duration, job: Arc<dyn ScheduledJob>) -> Result<(), AppError> {
        if interval.is_zero() {
            return Err(AppError::configuration(format!(
                "Scheduler '{}' needs a non-zero interval",
                self.name
            )));
        }

        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(AppError::configuration(format!(
                "Scheduler '{}' is already running",
                self.name
            )));
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let name = self.name.clone();
        let handle = tokio::spawn(run_loop(name, interval, job, cancel_rx));

        tracing::info!(
            scheduler = %self.name,
            interval_secs = interval.as_secs(),
            "Scheduler started"
        );
        *running = Some(Running { cancel_tx, handle });
        Ok(())
    }

    /// Signal cancellation and wait for the in-flight tick to return.
    ///
    /// Waits at most the shutdown timeout, then aborts the loop together with
    /// the in-flight tick. Stopping a stopped scheduler does nothing.
    pub async fn stop(&self) {
        let Some(Running { cancel_tx, mut handle }) = self.running.lock().await.take() else {
            return;
        };

        let _ = cancel_tx.send(true);

        match time::timeout(self.shutdown_timeout, &mut handle).await {
            Ok(_) => tracing::info!(scheduler = %self.name, "Scheduler stopped"),
            Err(_) => {
                tracing::warn!(
                    scheduler = %self.name,
                    timeout_secs = self.shutdown_timeout.as_secs(),
                    "Scheduler did not stop in time; aborting"
                );
                handle.abort();
            }
        }
    }
}

async fn run_loop(
    name: String,
    interval: Duration,
    job: Arc<dyn ScheduledJob>,
    mut cancel: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    tracing::debug!(scheduler = %name, "Scheduler received shutdown signal");
                    break;
                }
            }
            _ = ticker.tick() => {
                if *cancel.borrow() {
                    break;
                }
                execute_tick(Arc::clone(&job), cancel.clone()).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::executor::JobExecutionError;

    #[derive(Default)]
    struct Counting {
        ticks: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ScheduledJob for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self, _cancel: watch::Receiver<bool>) -> Result<(), JobExecutionError> {
            self.ticks.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(JobExecutionError::Transient("store offline".into()));
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_interval() {
        let job = Arc::new(Counting::default());
        let scheduler = PeriodicScheduler::new("test", Duration::from_secs(5));

        scheduler.start(Duration::from_secs(60), job.clone()).await.unwrap();
        time::sleep(Duration::from_secs(150)).await;
        scheduler.stop().await;

        assert_eq!(job.ticks.load(Ordering::SeqCst), 3);
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_tick_does_not_stop_schedule() {
        let job = Arc::new(Counting {
            fail: true,
            ..Default::default()
        });
        let scheduler = PeriodicScheduler::new("test", Duration::from_secs(5));

        scheduler.start(Duration::from_secs(10), job.clone()).await.unwrap();
        time::sleep(Duration::from_secs(35)).await;
        scheduler.stop().await;

        assert_eq!(job.ticks.load(Ordering::SeqCst), 4);
    }

    /// Sleeps through every tick, ignoring cancellation.
    #[derive(Default)]
    struct Sluggish {
        started: AtomicUsize,
        finished: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    #[async_trait]
    impl ScheduledJob for Sluggish {
        fn name(&self) -> &str {
            "sluggish"
        }

        async fn run(&self, _cancel: watch::Receiver<bool>) -> Result<(), JobExecutionError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            time::sleep(Duration::from_secs(25)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_due_during_long_run_is_skipped() {
        let job = Arc::new(Sluggish::default());
        let scheduler = PeriodicScheduler::new("test", Duration::from_secs(60));

        // Six ticks come due before the stop; runs start at 0s, 25s and 50s.
        scheduler.start(Duration::from_secs(10), job.clone()).await.unwrap();
        time::sleep(Duration::from_secs(59)).await;
        scheduler.stop().await;

        assert_eq!(job.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(job.started.load(Ordering::SeqCst), 3);
        assert_eq!(job.finished.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_timeout_aborts_in_flight_tick() {
        let job = Arc::new(Sluggish::default());
        let scheduler = PeriodicScheduler::new("test", Duration::from_secs(1));

        scheduler.start(Duration::from_secs(60), job.clone()).await.unwrap();
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(job.started.load(Ordering::SeqCst), 1);

        scheduler.stop().await;
        assert_eq!(job.finished.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(job.finished.load(Ordering::SeqCst), 0);
        assert_eq!(job.started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_rejected_and_double_stop_is_noop() {
        let scheduler = PeriodicScheduler::new("test", Duration::from_secs(5));
        scheduler
            .start(Duration::from_secs(60), Arc::new(Counting::default()))
            .await
            .unwrap();

        let err = scheduler
            .start(Duration::from_secs(60), Arc::new(Counting::default()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, keeper_core::error::ErrorKind::Configuration);

        scheduler.stop().await;
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let scheduler = PeriodicScheduler::new("test", Duration::from_secs(5));
        assert!(
            scheduler
                .start(Duration::ZERO, Arc::new(Counting::default()))
                .await
                .is_err()
        );
    }
}
