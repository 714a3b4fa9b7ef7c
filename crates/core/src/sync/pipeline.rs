//! Catalog sync pipeline.
//!
//! Walks species numbers 1..=limit in ascending order and batches, fetching
//! each species from PokeAPI and upserting it by number. A species that
//! fails to fetch, parse or store is logged and skipped; the run itself
//! never fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogStore, UpsertOutcome};
use crate::metrics::{SYNC_DURATION, SYNC_RUNS, SYNC_SPECIES};
use crate::pokeapi::transform::build_pokemon;
use crate::pokeapi::PokemonSource;

use super::types::{SyncItemError, SyncReport};

/// Pulls species from a [`PokemonSource`] into a [`CatalogStore`].
pub struct CatalogSync {
    source: Arc<dyn PokemonSource>,
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogSync {
    pub fn new(source: Arc<dyn PokemonSource>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { source, catalog }
    }

    /// Sync species 1..=limit. A `batch_size` of 0 is treated as 1.
    pub async fn sync(&self, limit: u32, batch_size: u32) -> SyncReport {
        self.sync_with_stop(limit, batch_size, &AtomicBool::new(false))
            .await
    }

    /// Like [`sync`](Self::sync), but checks `stop` before each species.
    ///
    /// The species in flight when `stop` is set still finishes.
    pub async fn sync_with_stop(
        &self,
        limit: u32,
        batch_size: u32,
        stop: &AtomicBool,
    ) -> SyncReport {
        let started_at = Utc::now();
        let timer = Instant::now();
        let batch_size = batch_size.max(1);

        SYNC_RUNS.inc();
        info!(
            "Starting catalog sync of {} Pokemon (batch size {})",
            limit, batch_size
        );

        let mut synced = 0;
        let mut failed_numbers = Vec::new();
        let mut interrupted = false;

        let numbers: Vec<u32> = (1..=limit).collect();
        'batches: for (batch_index, batch) in numbers.chunks(batch_size as usize).enumerate() {
            debug!(
                "Sync batch {} (#{}..#{})",
                batch_index + 1,
                batch[0],
                batch[batch.len() - 1]
            );

            for &number in batch {
                if stop.load(Ordering::SeqCst) {
                    interrupted = true;
                    break 'batches;
                }

                match self.sync_one(number).await {
                    Ok(outcome) => {
                        synced += 1;
                        let label = match outcome {
                            UpsertOutcome::Inserted => "inserted",
                            UpsertOutcome::Updated => "updated",
                        };
                        SYNC_SPECIES.with_label_values(&[label]).inc();
                    }
                    Err(e) => {
                        warn!("Failed to sync Pokemon #{}: {}", number, e);
                        SYNC_SPECIES.with_label_values(&["skipped"]).inc();
                        failed_numbers.push(number);
                    }
                }
            }
        }

        let catalog_size = self.catalog.count().unwrap_or_else(|e| {
            warn!("Failed to count catalog after sync: {}", e);
            0
        });

        SYNC_DURATION
            .with_label_values(&[])
            .observe(timer.elapsed().as_secs_f64());

        if interrupted {
            warn!(
                "Catalog sync interrupted after {} Pokemon. Total: {}",
                synced, catalog_size
            );
        } else {
            info!(
                "Catalog sync completed: {} synced, {} skipped. Total: {}",
                synced,
                failed_numbers.len(),
                catalog_size
            );
        }

        SyncReport {
            requested: limit,
            synced,
            skipped: failed_numbers.len() as u32,
            failed_numbers,
            catalog_size,
            interrupted,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn sync_one(&self, number: u32) -> Result<UpsertOutcome, SyncItemError> {
        let id = number.to_string();
        let pokemon = self.source.fetch_pokemon(&id).await?;

        let species = match self.source.fetch_species(&id).await {
            Ok(species) => Some(species),
            Err(e) => {
                debug!("No species record for #{}: {}", number, e);
                None
            }
        };

        let data = build_pokemon(&pokemon, species.as_ref());
        Ok(self.catalog.upsert(&data)?)
    }
}
