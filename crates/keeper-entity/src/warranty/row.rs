//! Receipt row as stored by the receipt service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use keeper_core::AppError;
use keeper_core::types::id::{RecordId, UserId};
use keeper_core::types::warranty::{WarrantyRecord, expiration_for};

/// A row of the `receipts` table (columns the notifier reads).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WarrantyRow {
    /// Receipt ID.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Product name.
    pub product_name: String,
    /// Merchant, if extracted.
    pub merchant: Option<String>,
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Warranty duration in months.
    pub warranty_months: Option<i32>,
    /// Expiration date as stored by the receipt service.
    pub expiration_date: Option<NaiveDate>,
}

impl TryFrom<WarrantyRow> for WarrantyRecord {
    type Error = AppError;

    fn try_from(row: WarrantyRow) -> Result<Self, Self::Error> {
        let months = row
            .warranty_months
            .map(|m| {
                u32::try_from(m).map_err(|_| {
                    AppError::validation(format!(
                        "Receipt {} has negative warranty duration {m}",
                        row.id
                    ))
                })
            })
            .transpose()?;

        let computed = expiration_for(row.purchase_date, months);
        if row.expiration_date.is_some() && row.expiration_date != computed {
            tracing::warn!(
                record_id = %row.id,
                stored = ?row.expiration_date,
                computed = ?computed,
                "Stored expiration date disagrees with purchase date + warranty; using computed value"
            );
        }

        Ok(WarrantyRecord {
            id: RecordId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            product_name: row.product_name,
            merchant: row.merchant,
            purchase_date: row.purchase_date,
            warranty_months: months,
            expiration_date: computed,
        })
    }
}
