//! Backend traits implemented by the database, notify and test crates.

pub mod channel;
pub mod gate;
pub mod store;

pub use channel::{ChannelKind, DeliveryChannel, DeliveryError};
pub use gate::NotificationGate;
pub use store::{ContactStore, ExpiringQuery, PreferenceStore, RecordStore};
