//! SMS delivery through a carrier HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use keeper_core::config::SmsChannelConfig;
use keeper_core::error::AppError;
use keeper_core::result::AppResult;
use keeper_core::traits::channel::{ChannelKind, DeliveryChannel, DeliveryError};

/// Posts `{from, to, body}` as JSON with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpSmsChannel {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    from_number: String,
}

impl HttpSmsChannel {
    /// Build the HTTP client.
    pub fn new(config: &SmsChannelConfig) -> AppResult<Self> {
        if config.api_url.trim().is_empty() {
            return Err(AppError::configuration("channels.sms.api_url is required"));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("warranty-keeper/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("SMS HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            from_number: config.from_number.clone(),
        })
    }
}

#[async_trait]
impl DeliveryChannel for HttpSmsChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    async fn deliver(&self, recipient: &str, _subject: &str, body: &str) -> Result<(), DeliveryError> {
        let mut request = self.client.post(&self.api_url).json(&serde_json::json!({
            "from": self.from_number,
            "to": recipient,
            "body": body,
        }));
        if !self.api_token.is_empty() {
            request = request.bearer_auth(&self.api_token);
        }

        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                DeliveryError::Transient(format!("SMS request failed: {e}"))
            } else if e.is_builder() {
                DeliveryError::Permanent(format!("SMS request invalid: {e}"))
            } else {
                DeliveryError::Transient(format!("SMS request failed: {e}"))
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(recipient = %recipient, "SMS accepted by carrier");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }
}

/// Map a non-success carrier response onto retry semantics.
fn classify_status(status: StatusCode, body: &str) -> DeliveryError {
    let reason = format!("SMS API error {status}: {}", body.trim());
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        DeliveryError::Transient(reason)
    } else {
        DeliveryError::Permanent(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_and_server_errors_are_transient() {
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(classify_status(StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(classify_status(StatusCode::SERVICE_UNAVAILABLE, "try later").is_transient());
    }

    #[test]
    fn test_client_errors_are_permanent() {
        let err = classify_status(StatusCode::BAD_REQUEST, "invalid number");
        assert!(!err.is_transient());
        assert!(err.reason().contains("invalid number"));
        assert!(!classify_status(StatusCode::UNAUTHORIZED, "").is_transient());
    }

    #[test]
    fn test_missing_api_url_rejected() {
        assert!(HttpSmsChannel::new(&SmsChannelConfig::default()).is_err());
    }
}
