//! Domain value types shared by every crate.

pub mod contact;
pub mod id;
pub mod preference;
pub mod urgency;
pub mod warranty;

pub use contact::UserContact;
pub use id::{RecordId, UserId};
pub use preference::{ChannelPreference, NotificationPreference};
pub use urgency::UrgencyTier;
pub use warranty::{ExpiringWarranty, WarrantyRecord};
