//! Job abstraction and guarded execution of a single tick.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use keeper_core::error::AppError;

/// A unit of periodic work.
#[async_trait]
pub trait ScheduledJob: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Run one tick. Implementations should check `cancel` at safe points
    /// and return early once it reads `true`.
    async fn run(&self, cancel: watch::Receiver<bool>) -> Result<(), JobExecutionError>;
}

/// Error from a job tick
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure; the next tick will hit it again.
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure; the next tick may succeed.
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Classify an application error by whether retrying can help.
    pub fn from_app_error(err: AppError) -> Self {
        if err.is_transient() {
            Self::Transient(err.to_string())
        } else {
            Self::Internal(err)
        }
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run one tick of `job` on its own task.
///
/// Errors and panics are logged and swallowed so the caller's loop keeps
/// going. Dropping the returned future aborts the tick.
pub async fn execute_tick(job: Arc<dyn ScheduledJob>, cancel: watch::Receiver<bool>) {
    let name = job.name().to_string();
    let started = Instant::now();

    let mut tick = AbortOnDrop(tokio::spawn({
        let job = Arc::clone(&job);
        async move { job.run(cancel).await }
    }));

    match (&mut tick.0).await {
        Ok(Ok(())) => {
            tracing::debug!(
                job = %name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Job tick finished"
            );
        }
        Ok(Err(JobExecutionError::Transient(msg))) => {
            tracing::warn!(job = %name, "Job tick failed (transient): {msg}");
        }
        Ok(Err(JobExecutionError::Permanent(msg))) => {
            tracing::error!(job = %name, "Job tick failed permanently: {msg}");
        }
        Ok(Err(JobExecutionError::Internal(err))) => {
            tracing::error!(job = %name, error = %err, "Job tick internal error");
        }
        Err(join_err) if join_err.is_panic() => {
            tracing::error!(job = %name, "Job tick panicked");
        }
        Err(join_err) => {
            tracing::error!(job = %name, error = %join_err, "Job tick aborted");
        }
    }
}
