//! Scheduled job implementations.

pub mod cleanup;
pub mod expiration;

pub use cleanup::GateCleanupJob;
pub use expiration::{ExpirationJob, ScanPreview, TickReport};
