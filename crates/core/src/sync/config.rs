//! Catalog sync configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the scheduled catalog sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Enable/disable the scheduler.
    /// When disabled, the catalog is only as fresh as the last run.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between runs.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Highest species number to sync (range is 1..=limit).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Species per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Run once immediately instead of waiting a full interval.
    #[serde(default)]
    pub run_on_start: bool,

    /// How long stop() waits for an in-flight run.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    21_600 // 6 hours
}

fn default_limit() -> u32 {
    151
}

fn default_batch_size() -> u32 {
    50
}

fn default_shutdown_timeout() -> u64 {
    25
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
            limit: default_limit(),
            batch_size: default_batch_size(),
            run_on_start: false,
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}
