//! Expiration notification engine configuration.

use serde::{Deserialize, Serialize};

/// Settings for the warranty expiration scan and dispatch loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Whether the engine runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between two expiration scans.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_seconds: u64,
    /// Lookahead used for users without a stored preference.
    #[serde(default = "default_lookahead")]
    pub default_lookahead_days: u32,
    /// Upper bound on any user's lookahead; also the width of the store query.
    #[serde(default = "default_max_lookahead")]
    pub max_lookahead_days: u32,
    /// How many days past expiry a record keeps being surfaced as expired.
    #[serde(default = "default_expired_retention")]
    pub expired_retention_days: u32,
    /// Maximum number of notifications dispatched concurrently within a tick.
    #[serde(default = "default_dispatch_concurrency")]
    pub dispatch_concurrency: usize,
    /// Seconds `stop` waits for an in-flight tick before abandoning it.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
    /// Deduplication gate settings.
    #[serde(default)]
    pub gate: GateConfig,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_interval_seconds: default_scan_interval(),
            default_lookahead_days: default_lookahead(),
            max_lookahead_days: default_max_lookahead(),
            expired_retention_days: default_expired_retention(),
            dispatch_concurrency: default_dispatch_concurrency(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
            gate: GateConfig::default(),
        }
    }
}

/// Storage backend for the notification gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateBackend {
    /// Process-local map. A restart within the same day may re-notify.
    Memory,
    /// `notification_log` table; survives restarts.
    #[default]
    Database,
}

/// Deduplication gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Which store backs the gate.
    #[serde(default)]
    pub backend: GateBackend,
    /// Days a dedup entry is kept after its day has passed.
    #[serde(default = "default_gate_retention")]
    pub retention_days: u32,
    /// Seconds between two gate cleanup runs.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            backend: GateBackend::default(),
            retention_days: default_gate_retention(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_scan_interval() -> u64 {
    3600
}

fn default_lookahead() -> u32 {
    7
}

fn default_max_lookahead() -> u32 {
    365
}

fn default_expired_retention() -> u32 {
    30
}

fn default_dispatch_concurrency() -> usize {
    8
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_gate_retention() -> u32 {
    7
}

fn default_cleanup_interval() -> u64 {
    3600
}
