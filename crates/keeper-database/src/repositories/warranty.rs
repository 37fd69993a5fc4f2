//! Receipt repository (read-only).

use async_trait::async_trait;
use sqlx::PgPool;

use keeper_core::error::{AppError, ErrorKind};
use keeper_core::result::AppResult;
use keeper_core::traits::store::{ExpiringQuery, RecordStore};
use keeper_core::types::warranty::WarrantyRecord;
use keeper_entity::warranty::WarrantyRow;

/// Reads warranty-bearing receipts owned by the receipt service.
#[derive(Debug, Clone)]
pub struct WarrantyRepository {
    pool: PgPool,
}

impl WarrantyRepository {
    /// Create a new warranty repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for WarrantyRepository {
    async fn find_expiring(&self, query: &ExpiringQuery) -> AppResult<Vec<WarrantyRecord>> {
        // Filter on the expiration derived from purchase date + months so rows
        // with a stale stored expiration are still selected correctly.
        let rows = sqlx::query_as::<_, WarrantyRow>(
            "SELECT id, user_id, product_name, merchant, purchase_date, warranty_months, expiration_date \
             FROM receipts \
             WHERE warranty_months IS NOT NULL \
               AND (purchase_date + make_interval(months => warranty_months))::date BETWEEN $1 AND $2 \
             ORDER BY user_id, id",
        )
        .bind(query.expired_since)
        .bind(query.until())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to query expiring receipts", e)
        })?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id;
            match WarrantyRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(record_id = %id, error = %e, "Skipping invalid receipt row");
                }
            }
        }
        Ok(records)
    }
}
