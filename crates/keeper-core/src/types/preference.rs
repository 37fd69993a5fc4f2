//! Per-user notification preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::UserId;

/// Lookahead used for users with no stored preference.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 7;

/// Which delivery channels a user wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPreference {
    /// No channel is enabled.
    None,
    /// Email only.
    #[default]
    EmailOnly,
    /// SMS only.
    SmsOnly,
    /// Email and SMS.
    Both,
}

impl ChannelPreference {
    /// Whether the email channel is enabled.
    pub fn email_enabled(&self) -> bool {
        matches!(self, Self::EmailOnly | Self::Both)
    }

    /// Whether the SMS channel is enabled.
    pub fn sms_enabled(&self) -> bool {
        matches!(self, Self::SmsOnly | Self::Both)
    }

    /// Return the stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::EmailOnly => "email",
            Self::SmsOnly => "sms",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for ChannelPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChannelPreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "email" => Ok(Self::EmailOnly),
            "sms" => Ok(Self::SmsOnly),
            "both" => Ok(Self::Both),
            other => Err(AppError::validation(format!(
                "Invalid channel preference: '{other}'"
            ))),
        }
    }
}

/// A user's notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreference {
    /// The user these settings belong to.
    pub user_id: UserId,
    /// Enabled channels.
    pub channels: ChannelPreference,
    /// Notify once a warranty is at most this many days from expiring.
    pub lookahead_days: u32,
    /// Global opt-out. Overrides `channels`.
    pub opted_out: bool,
}

impl NotificationPreference {
    /// Settings applied to users who never stored any.
    pub fn default_for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            channels: ChannelPreference::default(),
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            opted_out: false,
        }
    }

    /// Whether a record `days_left` from expiry falls inside this user's window.
    ///
    /// Already-expired records (negative days) are always inside the window.
    pub fn within_lookahead(&self, days_left: i64) -> bool {
        days_left <= i64::from(self.lookahead_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_flags() {
        assert!(!ChannelPreference::None.email_enabled());
        assert!(!ChannelPreference::None.sms_enabled());
        assert!(ChannelPreference::EmailOnly.email_enabled());
        assert!(!ChannelPreference::EmailOnly.sms_enabled());
        assert!(!ChannelPreference::SmsOnly.email_enabled());
        assert!(ChannelPreference::SmsOnly.sms_enabled());
        assert!(ChannelPreference::Both.email_enabled());
        assert!(ChannelPreference::Both.sms_enabled());
    }

    #[test]
    fn test_parse_stored_values() {
        assert_eq!("both".parse::<ChannelPreference>().ok(), Some(ChannelPreference::Both));
        assert_eq!(" SMS ".parse::<ChannelPreference>().ok(), Some(ChannelPreference::SmsOnly));
        let err = "pigeon".parse::<ChannelPreference>().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_default_preference() {
        let user = UserId::new();
        let pref = NotificationPreference::default_for_user(user);
        assert_eq!(pref.channels, ChannelPreference::EmailOnly);
        assert_eq!(pref.lookahead_days, 7);
        assert!(!pref.opted_out);
    }

    #[test]
    fn test_within_lookahead() {
        let pref = NotificationPreference {
            lookahead_days: 30,
            ..NotificationPreference::default_for_user(UserId::new())
        };
        assert!(pref.within_lookahead(-3));
        assert!(pref.within_lookahead(30));
        assert!(!pref.within_lookahead(31));
    }
}
