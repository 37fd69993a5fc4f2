//! Composite dispatcher: one message, every enabled and eligible channel.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use keeper_core::traits::channel::{ChannelKind, DeliveryChannel};
use keeper_core::traits::store::ContactStore;
use keeper_core::types::contact::UserContact;
use keeper_core::types::id::UserId;
use keeper_core::types::preference::NotificationPreference;

use crate::formatter::NotificationMessage;

/// What happened on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelOutcome {
    /// The channel accepted the message.
    Delivered,
    /// The channel was attempted and failed.
    Failed {
        /// Failure description.
        reason: String,
        /// Whether a later attempt may succeed.
        transient: bool,
    },
    /// The channel was not attempted.
    Skipped {
        /// Why it was not attempted.
        reason: String,
    },
}

impl ChannelOutcome {
    fn skipped(reason: &str) -> Self {
        Self::Skipped {
            reason: reason.to_string(),
        }
    }

    /// Whether the channel delivered.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Whether the channel was attempted and failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether the channel was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl fmt::Display for ChannelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => write!(f, "delivered"),
            Self::Failed { reason, transient } => {
                let kind = if *transient { "transient" } else { "permanent" };
                write!(f, "failed ({kind}): {reason}")
            }
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

/// Per-channel outcomes of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Email outcome.
    pub email: ChannelOutcome,
    /// SMS outcome.
    pub sms: ChannelOutcome,
}

impl DispatchResult {
    fn uniform(outcome: ChannelOutcome) -> Self {
        Self {
            email: outcome.clone(),
            sms: outcome,
        }
    }

    /// Whether at least one channel delivered. Drives the dedup gate.
    pub fn any_delivered(&self) -> bool {
        self.email.is_delivered() || self.sms.is_delivered()
    }

    /// Whether at least one attempted channel failed.
    pub fn any_failed(&self) -> bool {
        self.email.is_failed() || self.sms.is_failed()
    }

    /// Whether neither channel was attempted.
    pub fn all_skipped(&self) -> bool {
        self.email.is_skipped() && self.sms.is_skipped()
    }

    /// Outcome for a given channel.
    pub fn outcome(&self, kind: ChannelKind) -> &ChannelOutcome {
        match kind {
            ChannelKind::Email => &self.email,
            ChannelKind::Sms => &self.sms,
        }
    }
}

/// Fans notifications out to the email and SMS channels.
///
/// Each channel succeeds or fails on its own; no failure escapes `dispatch`.
pub struct NotificationDispatcher {
    contacts: Arc<dyn ContactStore>,
    email: Arc<dyn DeliveryChannel>,
    sms: Arc<dyn DeliveryChannel>,
}

impl fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationDispatcher").finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// Create a dispatcher.
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        email: Arc<dyn DeliveryChannel>,
        sms: Arc<dyn DeliveryChannel>,
    ) -> Self {
        Self {
            contacts,
            email,
            sms,
        }
    }

    /// Deliver `message` to the owner of `preference` on every enabled,
    /// eligible channel.
    ///
    /// `preference` is the one the candidate was selected under, so channel
    /// choice matches the scan.
    pub async fn dispatch(
        &self,
        preference: &NotificationPreference,
        message: &NotificationMessage,
    ) -> DispatchResult {
        let user_id = &preference.user_id;
        let record_id = message.record_id;

        if preference.opted_out {
            tracing::debug!(user_id = %user_id, record_id = %record_id, "User opted out");
            return DispatchResult::uniform(ChannelOutcome::skipped("user opted out"));
        }

        let contact = match self.contacts.get_contact(user_id).await {
            Ok(c) => c.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    record_id = %record_id,
                    error = %e,
                    "Contact lookup failed; nothing dispatched"
                );
                return DispatchResult::uniform(ChannelOutcome::Failed {
                    reason: format!("contact lookup failed: {e}"),
                    transient: true,
                });
            }
        };

        let email_target = email_target(preference, &contact);
        let sms_target = self.sms_target(preference, &contact).await;

        let (email, sms) = tokio::join!(
            self.attempt(self.email.as_ref(), email_target, message),
            self.attempt(self.sms.as_ref(), sms_target, message),
        );

        let result = DispatchResult { email, sms };
        for kind in [ChannelKind::Email, ChannelKind::Sms] {
            log_outcome(user_id, message, kind, result.outcome(kind));
        }
        result
    }

    /// SMS recipient, or the outcome to report without attempting.
    ///
    /// Skip order: disabled by preference, phone unverified, no number.
    async fn sms_target<'a>(
        &self,
        preference: &NotificationPreference,
        contact: &'a UserContact,
    ) -> Result<&'a str, ChannelOutcome> {
        if !preference.channels.sms_enabled() {
            return Err(ChannelOutcome::skipped("sms disabled by preference"));
        }
        match self.contacts.is_phone_verified(&preference.user_id).await {
            Ok(true) => contact
                .sms_number()
                .ok_or_else(|| ChannelOutcome::skipped("no phone number")),
            Ok(false) => Err(ChannelOutcome::skipped("phone not verified")),
            Err(e) => Err(ChannelOutcome::Failed {
                reason: format!("phone verification lookup failed: {e}"),
                transient: true,
            }),
        }
    }

    async fn attempt(
        &self,
        channel: &dyn DeliveryChannel,
        target: Result<&str, ChannelOutcome>,
        message: &NotificationMessage,
    ) -> ChannelOutcome {
        let recipient = match target {
            Ok(recipient) => recipient,
            Err(outcome) => return outcome,
        };

        match channel.deliver(recipient, &message.subject, &message.body).await {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e) => ChannelOutcome::Failed {
                transient: e.is_transient(),
                reason: e.reason().to_string(),
            },
        }
    }
}

fn email_target<'a>(
    preference: &NotificationPreference,
    contact: &'a UserContact,
) -> Result<&'a str, ChannelOutcome> {
    if !preference.channels.email_enabled() {
        return Err(ChannelOutcome::skipped("email disabled by preference"));
    }
    contact
        .email_address()
        .ok_or_else(|| ChannelOutcome::skipped("no email address"))
}

fn log_outcome(
    user_id: &UserId,
    message: &NotificationMessage,
    kind: ChannelKind,
    outcome: &ChannelOutcome,
) {
    match outcome {
        ChannelOutcome::Delivered => tracing::info!(
            user_id = %user_id,
            record_id = %message.record_id,
            channel = %kind,
            tier = %message.tier,
            "Notification delivered"
        ),
        ChannelOutcome::Failed { reason, transient } => tracing::warn!(
            user_id = %user_id,
            record_id = %message.record_id,
            channel = %kind,
            transient = *transient,
            reason = %reason,
            "Notification delivery failed"
        ),
        ChannelOutcome::Skipped { reason } => tracing::debug!(
            user_id = %user_id,
            record_id = %message.record_id,
            channel = %kind,
            reason = %reason,
            "Channel skipped"
        ),
    }
}
