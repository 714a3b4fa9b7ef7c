//! Types for the catalog sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::pokeapi::PokeApiError;

/// Errors from the scheduler's manual trigger.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A run is already in progress.
    #[error("a catalog sync is already in progress")]
    AlreadyRunning,
}

/// Why a single species was skipped.
#[derive(Debug, Error)]
pub enum SyncItemError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] PokeApiError),

    #[error("upsert failed: {0}")]
    Store(#[from] CatalogError),
}

/// Outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Species numbers requested (1..=limit).
    pub requested: u32,
    /// Species inserted or refreshed.
    pub synced: u32,
    /// Species skipped after a fetch, parse or store failure.
    pub skipped: u32,
    /// Numbers of the skipped species.
    pub failed_numbers: Vec<u32>,
    /// Catalog size after the run.
    pub catalog_size: u64,
    /// Run stopped before reaching `requested`.
    #[serde(default)]
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Current status of the sync scheduler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Whether the scheduler loop is running.
    pub running: bool,
    /// Whether a sync run is executing right now.
    pub in_progress: bool,
    /// Report of the most recent finished run.
    pub last_run: Option<SyncReport>,
}
