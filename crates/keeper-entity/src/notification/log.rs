//! Delivery log used by the persisted dedup gate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the `notification_log` table.
///
/// One row per (user, record, day) that received at least one successful
/// delivery.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationLogEntry {
    /// Recipient.
    pub user_id: Uuid,
    /// Receipt the notification was about.
    pub record_id: Uuid,
    /// Calendar day (UTC) of the notification.
    pub notified_on: NaiveDate,
    /// When the first successful delivery happened.
    pub dispatched_at: DateTime<Utc>,
}
