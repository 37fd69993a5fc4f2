//! Delivery channel adapters and their construction from configuration.

pub mod email;
pub mod log;
pub mod sms;

use std::sync::Arc;

use keeper_core::config::{EmailChannelConfig, EmailTransport, SmsChannelConfig, SmsTransport};
use keeper_core::result::AppResult;
use keeper_core::traits::channel::{ChannelKind, DeliveryChannel};

pub use email::SmtpEmailChannel;
pub use log::LogChannel;
pub use sms::HttpSmsChannel;

/// Build the email channel selected in configuration.
pub fn build_email_channel(config: &EmailChannelConfig) -> AppResult<Arc<dyn DeliveryChannel>> {
    match config.transport {
        EmailTransport::Smtp => Ok(Arc::new(SmtpEmailChannel::new(config)?)),
        EmailTransport::Log => Ok(Arc::new(LogChannel::new(ChannelKind::Email))),
    }
}

/// Build the SMS channel selected in configuration.
pub fn build_sms_channel(config: &SmsChannelConfig) -> AppResult<Arc<dyn DeliveryChannel>> {
    match config.transport {
        SmsTransport::Http => Ok(Arc::new(HttpSmsChannel::new(config)?)),
        SmsTransport::Log => Ok(Arc::new(LogChannel::new(ChannelKind::Sms))),
    }
}
