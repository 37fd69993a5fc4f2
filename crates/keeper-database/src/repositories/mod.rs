//! PostgreSQL implementations of the store traits.

pub mod contact;
pub mod notification_log;
pub mod preference;
pub mod warranty;

pub use contact::ContactRepository;
pub use notification_log::NotificationLogRepository;
pub use preference::PreferenceRepository;
pub use warranty::WarrantyRepository;
