//! Notification preference and delivery log rows.

pub mod log;
pub mod preference;

pub use log::NotificationLogEntry;
pub use preference::PreferenceRow;
