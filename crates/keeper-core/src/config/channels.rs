//! Delivery channel configuration.

use serde::{Deserialize, Serialize};

/// Configuration for every delivery channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// Email channel.
    #[serde(default)]
    pub email: EmailChannelConfig,
    /// SMS channel.
    #[serde(default)]
    pub sms: SmsChannelConfig,
}

/// Transport backing the email channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTransport {
    /// Send through an SMTP relay.
    Smtp,
    /// Log the message and report success (development).
    #[default]
    Log,
}

/// Transport backing the SMS channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsTransport {
    /// POST to a carrier HTTP API.
    Http,
    /// Log the message and report success (development).
    #[default]
    Log,
}

/// SMTP email channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailChannelConfig {
    /// Which transport to use.
    #[serde(default)]
    pub transport: EmailTransport,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP relay port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username; empty disables authentication.
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Per-message timeout in seconds.
    #[serde(default = "default_email_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EmailChannelConfig {
    fn default() -> Self {
        Self {
            transport: EmailTransport::default(),
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: default_from_address(),
            from_name: default_from_name(),
            timeout_seconds: default_email_timeout(),
        }
    }
}

/// Carrier API SMS channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsChannelConfig {
    /// Which transport to use.
    #[serde(default)]
    pub transport: SmsTransport,
    /// Carrier endpoint accepting `{from, to, body}` JSON.
    #[serde(default)]
    pub api_url: String,
    /// Bearer token for the carrier API.
    #[serde(default, skip_serializing)]
    pub api_token: String,
    /// Sender number.
    #[serde(default)]
    pub from_number: String,
    /// Per-message timeout in seconds.
    #[serde(default = "default_sms_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SmsChannelConfig {
    fn default() -> Self {
        Self {
            transport: SmsTransport::default(),
            api_url: String::new(),
            api_token: String::new(),
            from_number: String::new(),
            timeout_seconds: default_sms_timeout(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "no-reply@warranty-keeper.local".to_string()
}

fn default_from_name() -> String {
    "Warranty Keeper".to_string()
}

fn default_email_timeout() -> u64 {
    15
}

fn default_sms_timeout() -> u64 {
    10
}
