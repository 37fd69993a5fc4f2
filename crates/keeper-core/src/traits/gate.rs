//! Deduplication gate for notifications.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::result::AppResult;
use crate::types::id::{RecordId, UserId};

/// Remembers which (user, record, day) triples were already notified.
///
/// Implementations must be safe under concurrent callers: marking the same key
/// from two tasks records it once, and marking an existing key is a no-op.
#[async_trait]
pub trait NotificationGate: Send + Sync + 'static {
    /// Whether no successful notification was recorded for this key yet.
    async fn should_notify(&self, user_id: &UserId, record_id: &RecordId, day: NaiveDate)
    -> AppResult<bool>;

    /// Record a successful notification for this key.
    async fn mark_notified(&self, user_id: &UserId, record_id: &RecordId, day: NaiveDate)
    -> AppResult<()>;

    /// Forget every entry for a day strictly before `cutoff`.
    ///
    /// Returns the number of entries removed.
    async fn purge_before(&self, cutoff: NaiveDate) -> AppResult<u64>;
}
