//! User contact repository (read-only).

use async_trait::async_trait;
use sqlx::PgPool;

use keeper_core::error::{AppError, ErrorKind};
use keeper_core::result::AppResult;
use keeper_core::traits::store::ContactStore;
use keeper_core::types::contact::UserContact;
use keeper_core::types::id::UserId;
use keeper_entity::user::ContactRow;

/// Reads contact details owned by the identity service.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    /// Create a new contact repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn get_contact(&self, user_id: &UserId) -> AppResult<Option<UserContact>> {
        let row = sqlx::query_as::<_, ContactRow>(
            "SELECT id, email, phone_number, phone_verified_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to get user contact", e))?;

        Ok(row.map(UserContact::from))
    }

    async fn is_phone_verified(&self, user_id: &UserId) -> AppResult<bool> {
        let verified: Option<bool> = sqlx::query_scalar(
            "SELECT phone_verified_at IS NOT NULL FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check phone verification", e)
        })?;

        Ok(verified.unwrap_or(false))
    }
}
