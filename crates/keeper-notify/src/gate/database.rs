//! Gate persisted in `notification_log`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use keeper_core::result::AppResult;
use keeper_core::traits::gate::NotificationGate;
use keeper_core::types::id::{RecordId, UserId};
use keeper_database::repositories::NotificationLogRepository;

/// Gate that survives restarts.
///
/// The table's primary key makes concurrent marks of the same key collapse
/// into one row.
#[derive(Debug, Clone)]
pub struct DatabaseGate {
    log: NotificationLogRepository,
}

impl DatabaseGate {
    /// Create a gate on top of a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            log: NotificationLogRepository::new(pool),
        }
    }
}

#[async_trait]
impl NotificationGate for DatabaseGate {
    async fn should_notify(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
        day: NaiveDate,
    ) -> AppResult<bool> {
        Ok(!self.log.exists(user_id, record_id, day).await?)
    }

    async fn mark_notified(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
        day: NaiveDate,
    ) -> AppResult<()> {
        if !self.log.insert(user_id, record_id, day).await? {
            tracing::debug!(
                user_id = %user_id,
                record_id = %record_id,
                %day,
                "Notification already recorded"
            );
        }
        Ok(())
    }

    async fn purge_before(&self, cutoff: NaiveDate) -> AppResult<u64> {
        self.log.delete_before(cutoff).await
    }
}
