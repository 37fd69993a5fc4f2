//! Email delivery over SMTP.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use keeper_core::config::EmailChannelConfig;
use keeper_core::error::AppError;
use keeper_core::result::AppResult;
use keeper_core::traits::channel::{ChannelKind, DeliveryChannel, DeliveryError};

/// Sends plain-text mail through a STARTTLS relay.
pub struct SmtpEmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailChannel {
    /// Build the transport. No connection is made until the first delivery.
    pub fn new(config: &EmailChannelConfig) -> AppResult<Self> {
        if config.smtp_host.trim().is_empty() {
            return Err(AppError::configuration("channels.email.smtp_host is required"));
        }

        let from = if config.from_name.trim().is_empty() {
            config.from_address.parse::<Mailbox>()
        } else {
            format!("{} <{}>", config.from_name, config.from_address).parse::<Mailbox>()
        }
        .map_err(|e| AppError::configuration(format!("Invalid from address: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::configuration(format!("SMTP relay: {e}")))?
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        tracing::info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            "SMTP email channel configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl DeliveryChannel for SmtpEmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| DeliveryError::Permanent(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| DeliveryError::Permanent(format!("Build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| classify_smtp_error(&e))?;

        tracing::debug!(recipient = %recipient, "Email sent");
        Ok(())
    }
}

/// Map an SMTP failure onto retry semantics.
///
/// 5xx replies and client-side errors are permanent; 4xx replies, timeouts
/// and connection problems are transient.
fn classify_smtp_error(err: &lettre::transport::smtp::Error) -> DeliveryError {
    if err.is_permanent() || err.is_client() {
        DeliveryError::Permanent(format!("SMTP send: {err}"))
    } else {
        DeliveryError::Transient(format!("SMTP send: {err}"))
    }
}
