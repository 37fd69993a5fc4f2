//! Channel that only logs. Used in development.

use async_trait::async_trait;

use keeper_core::traits::channel::{ChannelKind, DeliveryChannel, DeliveryError};

/// Logs every message at `info` and reports success.
#[derive(Debug, Clone, Copy)]
pub struct LogChannel {
    kind: ChannelKind,
}

impl LogChannel {
    /// Create a log channel standing in for `kind`.
    pub fn new(kind: ChannelKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl DeliveryChannel for LogChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        tracing::info!(
            channel = %self.kind,
            recipient = %recipient,
            subject = %subject,
            body_len = body.len(),
            "Notification (log channel)"
        );
        Ok(())
    }
}
