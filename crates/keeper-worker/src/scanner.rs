//! Expiration scanner: which warranties need attention on a given day.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::NaiveDate;

use keeper_core::config::NotifierConfig;
use keeper_core::result::AppResult;
use keeper_core::traits::store::{ExpiringQuery, PreferenceStore, RecordStore};
use keeper_core::types::id::UserId;
use keeper_core::types::preference::NotificationPreference;
use keeper_core::types::warranty::ExpiringWarranty;
use keeper_notify::classify;

/// Selects expiring warranties and applies each owner's preferences.
///
/// Read-only: never touches the gate or any channel.
pub struct ExpirationScanner {
    records: Arc<dyn RecordStore>,
    preferences: Arc<dyn PreferenceStore>,
    default_lookahead_days: u32,
    max_lookahead_days: u32,
    expired_retention_days: u32,
}

impl std::fmt::Debug for ExpirationScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpirationScanner")
            .field("max_lookahead_days", &self.max_lookahead_days)
            .field("expired_retention_days", &self.expired_retention_days)
            .finish_non_exhaustive()
    }
}

impl ExpirationScanner {
    /// Create a scanner using the window sizes from `config`.
    pub fn new(
        records: Arc<dyn RecordStore>,
        preferences: Arc<dyn PreferenceStore>,
        config: &NotifierConfig,
    ) -> Self {
        Self {
            records,
            preferences,
            default_lookahead_days: config.default_lookahead_days,
            max_lookahead_days: config.max_lookahead_days,
            expired_retention_days: config.expired_retention_days,
        }
    }

    /// Candidates for `as_of`, most urgent first.
    ///
    /// Opted-out users and records beyond the owner's lookahead are dropped.
    /// Ties on days left are ordered by record id.
    pub async fn scan(&self, as_of: NaiveDate) -> AppResult<Vec<ExpiringWarranty>> {
        let query = ExpiringQuery::new(as_of, self.max_lookahead_days, self.expired_retention_days);
        let records = self.records.find_expiring(&query).await?;
        let fetched = records.len();

        let mut preferences: HashMap<UserId, Option<NotificationPreference>> = HashMap::new();
        let mut candidates = Vec::with_capacity(fetched);

        for record in records {
            let Some(days_left) = record.days_left(as_of) else {
                tracing::warn!(record_id = %record.id, "Skipping record without expiration date");
                continue;
            };

            let preference = match preferences.entry(record.user_id) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => slot.insert(self.load_preference(&record.user_id).await),
            };
            let Some(preference) = preference else {
                continue;
            };

            if preference.opted_out || !preference.within_lookahead(days_left) {
                continue;
            }
            if days_left < -i64::from(self.expired_retention_days) {
                continue;
            }

            candidates.push(ExpiringWarranty {
                tier: classify(days_left),
                days_left,
                record,
                preference: preference.clone(),
            });
        }

        candidates.sort_by(|a, b| {
            a.days_left
                .cmp(&b.days_left)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });

        tracing::debug!(
            %as_of,
            fetched,
            users = preferences.len(),
            candidates = candidates.len(),
            "Expiration scan complete"
        );
        Ok(candidates)
    }

    /// Stored preference, the configured default if none, or `None` (skip
    /// the user this scan) if the lookup failed.
    async fn load_preference(&self, user_id: &UserId) -> Option<NotificationPreference> {
        match self.preferences.get_preference(user_id).await {
            Ok(Some(mut preference)) => {
                preference.lookahead_days = preference.lookahead_days.min(self.max_lookahead_days);
                Some(preference)
            }
            Ok(None) => Some(NotificationPreference {
                lookahead_days: self.default_lookahead_days,
                ..NotificationPreference::default_for_user(*user_id)
            }),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Preference lookup failed; skipping user's records this scan"
                );
                None
            }
        }
    }
}
