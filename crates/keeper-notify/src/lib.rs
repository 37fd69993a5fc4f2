//! # keeper-notify
//!
//! Everything between "this warranty is expiring" and "the user was told":
//! urgency classification, the per-day dedup gate, message formatting,
//! the composite dispatcher, and the email/SMS/log channel adapters.

pub mod channels;
pub mod classifier;
pub mod dispatcher;
pub mod formatter;
pub mod gate;

pub use classifier::classify;
pub use dispatcher::{ChannelOutcome, DispatchResult, NotificationDispatcher};
pub use formatter::{MessageFormatter, NotificationMessage};
