//! Delivery channel abstraction.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The channels a notification can travel on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Email.
    Email,
    /// SMS text message.
    Sms,
}

impl ChannelKind {
    /// Return the channel as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a delivery attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Retrying later may succeed (timeouts, throttling, 5xx).
    #[error("transient delivery failure: {0}")]
    Transient(String),
    /// Retrying will not help (invalid recipient, rejected credentials).
    #[error("permanent delivery failure: {0}")]
    Permanent(String),
}

impl DeliveryError {
    /// Whether the failure is transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// The failure reason without the classification prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::Transient(reason) | Self::Permanent(reason) => reason,
        }
    }
}

/// A single way of reaching a user.
///
/// Implementations make one attempt per call and never retry internally.
#[async_trait]
pub trait DeliveryChannel: Send + Sync + 'static {
    /// Which channel this is.
    fn kind(&self) -> ChannelKind;

    /// Deliver one message to `recipient` (an address or phone number).
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}
