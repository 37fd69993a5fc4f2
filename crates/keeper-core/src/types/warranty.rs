//! Warranty-bearing receipt records.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::id::{RecordId, UserId};
use crate::types::preference::NotificationPreference;
use crate::types::urgency::UrgencyTier;

/// A receipt with (optionally) a warranty window.
///
/// Owned by the receipt store; the notifier only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyRecord {
    /// Record identifier.
    pub id: RecordId,
    /// Owner of the receipt.
    pub user_id: UserId,
    /// Product name as shown to the user.
    pub product_name: String,
    /// Where the product was bought.
    pub merchant: Option<String>,
    /// Date of purchase.
    pub purchase_date: NaiveDate,
    /// Warranty length in whole months.
    pub warranty_months: Option<u32>,
    /// `purchase_date + warranty_months`, absent without a warranty.
    pub expiration_date: Option<NaiveDate>,
}

impl WarrantyRecord {
    /// Build a record, deriving the expiration date from the purchase date.
    pub fn new(
        id: RecordId,
        user_id: UserId,
        product_name: impl Into<String>,
        merchant: Option<String>,
        purchase_date: NaiveDate,
        warranty_months: Option<u32>,
    ) -> Self {
        Self {
            id,
            user_id,
            product_name: product_name.into(),
            merchant,
            purchase_date,
            warranty_months,
            expiration_date: expiration_for(purchase_date, warranty_months),
        }
    }

    /// Signed number of days from `as_of` until expiry.
    ///
    /// Negative once expired, `0` on the expiration day itself.
    pub fn days_left(&self, as_of: NaiveDate) -> Option<i64> {
        self.expiration_date
            .map(|expires| expires.signed_duration_since(as_of).num_days())
    }
}

/// Expiration date for a purchase, or `None` without a warranty.
///
/// Month arithmetic clamps to the end of shorter months (Jan 31 + 1 month is
/// the last day of February).
pub fn expiration_for(purchase_date: NaiveDate, warranty_months: Option<u32>) -> Option<NaiveDate> {
    warranty_months.and_then(|months| purchase_date.checked_add_months(Months::new(months)))
}

/// A record selected by a scan, with its urgency attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringWarranty {
    /// The underlying record.
    pub record: WarrantyRecord,
    /// Days until expiry relative to the scan day.
    pub days_left: i64,
    /// Urgency derived from `days_left`.
    pub tier: UrgencyTier,
    /// Owner's preference as resolved by the scan that selected the record.
    pub preference: NotificationPreference,
}

impl ExpiringWarranty {
    /// Owner of the record.
    pub fn user_id(&self) -> UserId {
        self.record.user_id
    }

    /// Record identifier.
    pub fn record_id(&self) -> RecordId {
        self.record.id
    }
}
