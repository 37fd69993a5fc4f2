//! In-memory collaborator stores.
//!
//! Used by the CLI demo path and tests when no receipt/identity database is
//! available. Contents live only as long as the process.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use keeper_core::result::AppResult;
use keeper_core::traits::store::{ContactStore, ExpiringQuery, PreferenceStore, RecordStore};
use keeper_core::types::contact::UserContact;
use keeper_core::types::id::{RecordId, UserId};
use keeper_core::types::preference::NotificationPreference;
use keeper_core::types::warranty::WarrantyRecord;

/// Warranty records keyed by record id.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<DashMap<RecordId, WarrantyRecord>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: WarrantyRecord) {
        self.records.insert(record.id, record);
    }

    /// Remove a record.
    pub fn remove(&self, id: &RecordId) -> Option<WarrantyRecord> {
        self.records.remove(id).map(|(_, record)| record)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_expiring(&self, query: &ExpiringQuery) -> AppResult<Vec<WarrantyRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| {
                entry
                    .expiration_date
                    .is_some_and(|expires| query.contains(expires))
            })
            .map(|entry| entry.value().clone())
            .collect())
    }
}

/// Notification preferences keyed by user.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    preferences: Arc<DashMap<UserId, NotificationPreference>>,
}

impl MemoryPreferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user's preference.
    pub fn insert(&self, preference: NotificationPreference) {
        self.preferences.insert(preference.user_id, preference);
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get_preference(&self, user_id: &UserId) -> AppResult<Option<NotificationPreference>> {
        Ok(self.preferences.get(user_id).map(|p| p.value().clone()))
    }
}

/// Contact details keyed by user.
#[derive(Debug, Clone, Default)]
pub struct MemoryContactStore {
    contacts: Arc<DashMap<UserId, UserContact>>,
}

impl MemoryContactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user's contact details.
    pub fn insert(&self, user_id: UserId, contact: UserContact) {
        self.contacts.insert(user_id, contact);
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn get_contact(&self, user_id: &UserId) -> AppResult<Option<UserContact>> {
        Ok(self.contacts.get(user_id).map(|c| c.value().clone()))
    }
}
