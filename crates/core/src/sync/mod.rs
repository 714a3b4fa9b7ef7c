//! Catalog sync from PokeAPI.
//!
//! - **Pipeline**: one run over species 1..=limit, per-species failures skipped
//! - **Scheduler**: periodic runs, one at a time, with graceful stop

mod config;
mod pipeline;
mod runner;
mod types;

pub use config::SyncConfig;
pub use pipeline::CatalogSync;
pub use runner::SyncScheduler;
pub use types::{SyncError, SyncItemError, SyncReport, SyncStatus};
