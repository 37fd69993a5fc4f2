//! Read-only access to collaborator-owned data.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};

use crate::result::AppResult;
use crate::types::contact::UserContact;
use crate::types::id::UserId;
use crate::types::preference::NotificationPreference;
use crate::types::warranty::WarrantyRecord;

/// Window of expiration dates a scan is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiringQuery {
    /// The day the scan is evaluated for.
    pub as_of: NaiveDate,
    /// Include records expiring up to this many days after `as_of`.
    pub lookahead_days: u32,
    /// Include records that expired on or after this day.
    pub expired_since: NaiveDate,
}

impl ExpiringQuery {
    /// Build a query looking `lookahead_days` forward and `retention_days` back.
    pub fn new(as_of: NaiveDate, lookahead_days: u32, retention_days: u32) -> Self {
        let expired_since = as_of
            .checked_sub_days(Days::new(u64::from(retention_days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            as_of,
            lookahead_days,
            expired_since,
        }
    }

    /// Last expiration date inside the window.
    pub fn until(&self) -> NaiveDate {
        self.as_of
            .checked_add_days(Days::new(u64::from(self.lookahead_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether an expiration date falls inside the window (both ends inclusive).
    pub fn contains(&self, expiration: NaiveDate) -> bool {
        expiration >= self.expired_since && expiration <= self.until()
    }
}

/// Source of warranty records.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Records whose expiration date falls inside `query`.
    ///
    /// Records without an expiration date are never returned.
    async fn find_expiring(&self, query: &ExpiringQuery) -> AppResult<Vec<WarrantyRecord>>;
}

/// Source of notification preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    /// Stored preference for a user, or `None` if the user never set one.
    async fn get_preference(&self, user_id: &UserId) -> AppResult<Option<NotificationPreference>>;
}

/// Source of user contact details.
#[async_trait]
pub trait ContactStore: Send + Sync + 'static {
    /// Contact details for a user, or `None` for unknown users.
    async fn get_contact(&self, user_id: &UserId) -> AppResult<Option<UserContact>>;

    /// Whether the user's phone number has been verified.
    async fn is_phone_verified(&self, user_id: &UserId) -> AppResult<bool> {
        Ok(self
            .get_contact(user_id)
            .await?
            .is_some_and(|contact| contact.phone_verified))
    }
}
