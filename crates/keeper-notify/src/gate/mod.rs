//! Notification gate backends.

pub mod database;
pub mod memory;

use std::sync::Arc;

use keeper_core::config::{GateBackend, GateConfig};
use keeper_core::traits::gate::NotificationGate;
use keeper_database::DatabasePool;

pub use database::DatabaseGate;
pub use memory::MemoryGate;

/// Build the gate selected in configuration.
pub fn build_gate(config: &GateConfig, db: &DatabasePool) -> Arc<dyn NotificationGate> {
    match config.backend {
        GateBackend::Database => {
            tracing::info!("Using database notification gate");
            Arc::new(DatabaseGate::new(db.pool().clone()))
        }
        GateBackend::Memory => {
            tracing::warn!("Using in-memory notification gate; a same-day restart will re-notify");
            Arc::new(MemoryGate::new())
        }
    }
}
