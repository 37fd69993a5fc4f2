//! Repository for the notification dedup log.

use chrono::NaiveDate;
use sqlx::PgPool;

use keeper_core::error::{AppError, ErrorKind};
use keeper_core::result::AppResult;
use keeper_core::types::id::{RecordId, UserId};
use keeper_entity::notification::NotificationLogEntry;

/// Reads and writes `notification_log`.
#[derive(Debug, Clone)]
pub struct NotificationLogRepository {
    pool: PgPool,
}

impl NotificationLogRepository {
    /// Create a new notification log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether an entry exists for the key.
    pub async fn exists(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
        day: NaiveDate,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM notification_log \
             WHERE user_id = $1 AND record_id = $2 AND notified_on = $3)",
        )
        .bind(user_id)
        .bind(record_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check notification log", e))
    }

    /// Insert an entry; an existing entry is left untouched.
    ///
    /// Returns `true` if a new row was written.
    pub async fn insert(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
        day: NaiveDate,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO notification_log (user_id, record_id, notified_on, dispatched_at) \
             VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (user_id, record_id, notified_on) DO NOTHING",
        )
        .bind(user_id)
        .bind(record_id)
        .bind(day)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write notification log", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete entries for days strictly before `cutoff`.
    pub async fn delete_before(&self, cutoff: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notification_log WHERE notified_on < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge notification log", e)
            })?;

        Ok(result.rows_affected())
    }

    /// Most recent entries for a user, newest first.
    pub async fn find_by_user(&self, user_id: &UserId, limit: i64) -> AppResult<Vec<NotificationLogEntry>> {
        sqlx::query_as::<_, NotificationLogEntry>(
            "SELECT user_id, record_id, notified_on, dispatched_at FROM notification_log \
             WHERE user_id = $1 ORDER BY notified_on DESC, dispatched_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notification log", e))
    }
}
