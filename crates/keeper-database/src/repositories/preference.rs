//! Notification preference repository (read-only).

use async_trait::async_trait;
use sqlx::PgPool;

use keeper_core::error::{AppError, ErrorKind};
use keeper_core::result::AppResult;
use keeper_core::traits::store::PreferenceStore;
use keeper_core::types::id::UserId;
use keeper_core::types::preference::NotificationPreference;
use keeper_entity::notification::PreferenceRow;

/// Reads per-user notification settings.
#[derive(Debug, Clone)]
pub struct PreferenceRepository {
    pool: PgPool,
}

impl PreferenceRepository {
    /// Create a new preference repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PreferenceRepository {
    async fn get_preference(&self, user_id: &UserId) -> AppResult<Option<NotificationPreference>> {
        let row = sqlx::query_as::<_, PreferenceRow>(
            "SELECT user_id, channels, lookahead_days, opted_out, updated_at \
             FROM notification_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to get preferences", e))?;

        row.map(NotificationPreference::try_from).transpose()
    }
}
