//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog sync (runs, per-species outcomes, duration)
//! - PokeAPI requests
//! - Response cache lookups

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Sync Metrics
// =============================================================================

/// Sync runs started.
pub static SYNC_RUNS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("pokedex_sync_runs_total", "Total catalog sync runs").unwrap()
});

/// Species processed by result.
pub static SYNC_SPECIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pokedex_sync_species_total",
            "Total species processed by catalog sync",
        ),
        &["result"], // "inserted", "updated", "skipped"
    )
    .unwrap()
});

/// Sync run duration in seconds.
pub static SYNC_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_sync_duration_seconds",
            "Duration of catalog sync runs",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// PokeAPI requests by resource and result.
pub static POKEAPI_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_pokeapi_requests_total", "Total PokeAPI requests"),
        &["resource", "result"], // result: "success", "not_found", "error"
    )
    .unwrap()
});

// =============================================================================
// Cache Metrics
// =============================================================================

/// Response cache lookups by cache name and result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pokedex_cache_lookups_total",
            "Total response cache lookups",
        ),
        &["cache", "result"], // result: "hit", "miss"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Sync
        Box::new(SYNC_RUNS.clone()),
        Box::new(SYNC_SPECIES.clone()),
        Box::new(SYNC_DURATION.clone()),
        // External services
        Box::new(POKEAPI_REQUESTS.clone()),
        // Cache
        Box::new(CACHE_LOOKUPS.clone()),
    ]
}
