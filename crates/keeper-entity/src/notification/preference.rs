//! Notification preference row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use keeper_core::AppError;
use keeper_core::types::id::UserId;
use keeper_core::types::preference::{ChannelPreference, NotificationPreference};

/// A row of the `notification_preferences` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PreferenceRow {
    /// The user these preferences belong to.
    pub user_id: Uuid,
    /// One of `none`, `email`, `sms`, `both`.
    pub channels: String,
    /// Lookahead threshold in days.
    pub lookahead_days: i32,
    /// Global opt-out.
    pub opted_out: bool,
    /// When preferences were last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<PreferenceRow> for NotificationPreference {
    type Error = AppError;

    fn try_from(row: PreferenceRow) -> Result<Self, Self::Error> {
        let channels: ChannelPreference = row.channels.parse()?;
        let lookahead_days = u32::try_from(row.lookahead_days).map_err(|_| {
            AppError::validation(format!(
                "User {} has negative lookahead {}",
                row.user_id, row.lookahead_days
            ))
        })?;

        Ok(NotificationPreference {
            user_id: UserId::from_uuid(row.user_id),
            channels,
            lookahead_days,
            opted_out: row.opted_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(channels: &str, lookahead_days: i32) -> PreferenceRow {
        PreferenceRow {
            user_id: Uuid::new_v4(),
            channels: channels.into(),
            lookahead_days,
            opted_out: false,
            updated_at: None,
        }
    }

    #[test]
    fn test_valid_row_converts() {
        let pref = NotificationPreference::try_from(row("both", 14)).unwrap();
        assert_eq!(pref.channels, ChannelPreference::Both);
        assert_eq!(pref.lookahead_days, 14);
    }

    #[test]
    fn test_unknown_channel_rejected() {
        assert!(NotificationPreference::try_from(row("fax", 7)).is_err());
    }

    #[test]
    fn test_negative_lookahead_rejected() {
        assert!(NotificationPreference::try_from(row("email", -1)).is_err());
    }
}
