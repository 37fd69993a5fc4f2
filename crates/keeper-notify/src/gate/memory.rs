//! In-process gate backed by a concurrent map.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use keeper_core::result::AppResult;
use keeper_core::traits::gate::NotificationGate;
use keeper_core::types::id::{RecordId, UserId};

/// Dedup key: one notification per user, record and day.
type GateKey = (UserId, RecordId, NaiveDate);

/// Gate that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryGate {
    /// When each key was first marked.
    entries: DashMap<GateKey, DateTime<Utc>>,
}

impl MemoryGate {
    /// Create an empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of remembered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the gate is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When a key was first marked, if ever.
    pub fn marked_at(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
        day: NaiveDate,
    ) -> Option<DateTime<Utc>> {
        self.entries
            .get(&(*user_id, *record_id, day))
            .map(|entry| *entry.value())
    }
}

#[async_trait]
impl NotificationGate for MemoryGate {
    async fn should_notify(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
        day: NaiveDate,
    ) -> AppResult<bool> {
        Ok(!self.entries.contains_key(&(*user_id, *record_id, day)))
    }

    async fn mark_notified(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
        day: NaiveDate,
    ) -> AppResult<()> {
        if let Entry::Vacant(slot) = self.entries.entry((*user_id, *record_id, day)) {
            slot.insert(Utc::now());
        }
        Ok(())
    }

    async fn purge_before(&self, cutoff: NaiveDate) -> AppResult<u64> {
        let before = self.entries.len();
        self.entries.retain(|(_, _, day), _| *day >= cutoff);
        Ok(before.saturating_sub(self.entries.len()) as u64)
    }
}
