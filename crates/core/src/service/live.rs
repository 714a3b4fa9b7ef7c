//! Catalog service proxying PokeAPI live.
//!
//! PokeAPI has no server-side search, so the full species index is fetched
//! once per listing TTL and filtered in memory. Only the returned page is
//! enriched with images.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use super::{PokedexService, PokemonDetail, ServiceError};
use crate::cache::ResponseCache;
use crate::catalog::{
    Identifier, ListQuery, Navigation, NavigationEntry, PokemonData, PokemonPage, PokemonSummary,
};
use crate::pokeapi::transform::build_pokemon;
use crate::pokeapi::{IndexEntry, PokeApiError, PokemonSource};

const LISTING_KEY: &str = "all_pokemon";

/// Serves list and detail requests straight from PokeAPI.
pub struct LiveApiService {
    source: Arc<dyn PokemonSource>,
    listing: Arc<ResponseCache<Vec<IndexEntry>>>,
    lookups: Arc<ResponseCache<PokemonData>>,
    listing_ttl: Duration,
    lookup_ttl: Duration,
}

impl LiveApiService {
    pub fn new(
        source: Arc<dyn PokemonSource>,
        listing: Arc<ResponseCache<Vec<IndexEntry>>>,
        lookups: Arc<ResponseCache<PokemonData>>,
        listing_ttl: Duration,
        lookup_ttl: Duration,
    ) -> Self {
        Self {
            source,
            listing,
            lookups,
            listing_ttl,
            lookup_ttl,
        }
    }

    async fn index(&self) -> Result<Vec<IndexEntry>, PokeApiError> {
        self.listing
            .fetch_or_compute(LISTING_KEY, self.listing_ttl, || self.source.fetch_index())
            .await
    }

    /// Image for one list entry. Lookup failures leave the image empty.
    async fn image(&self, number: u32) -> Option<String> {
        let key = format!("summary:{}", number);
        let result = self
            .lookups
            .fetch_or_compute(&key, self.lookup_ttl, || async {
                let payload = self.source.fetch_pokemon(&number.to_string()).await?;
                Ok::<_, PokeApiError>(build_pokemon(&payload, None))
            })
            .await;

        match result {
            Ok(data) => data.image,
            Err(e) => {
                debug!("No image for #{}: {}", number, e);
                None
            }
        }
    }

    async fn detail(&self, id: &str) -> Result<PokemonData, PokeApiError> {
        let key = format!("detail:{}", id);
        self.lookups
            .fetch_or_compute(&key, self.lookup_ttl, || async {
                let payload = self.source.fetch_pokemon(id).await?;
                let species = match self.source.fetch_species(id).await {
                    Ok(species) => Some(species),
                    Err(e) => {
                        debug!("No species record for {}: {}", id, e);
                        None
                    }
                };
                Ok::<_, PokeApiError>(build_pokemon(&payload, species.as_ref()))
            })
            .await
    }

    /// Neighbors from the cached index; empty when the index is unavailable.
    async fn navigation(&self, number: u32) -> Navigation {
        let entries = match self.index().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Navigation unavailable for #{}: {}", number, e);
                return Navigation::default();
            }
        };

        let entry = |e: &IndexEntry| NavigationEntry {
            number: e.number,
            name: e.name.clone(),
        };

        Navigation {
            prev: entries
                .iter()
                .filter(|e| e.number < number)
                .max_by_key(|e| e.number)
                .map(entry),
            next: entries
                .iter()
                .filter(|e| e.number > number)
                .min_by_key(|e| e.number)
                .map(entry),
        }
    }
}

#[async_trait]
impl PokedexService for LiveApiService {
    async fn list(&self, query: &ListQuery) -> Result<PokemonPage, ServiceError> {
        let entries = self.index().await.map_err(|e| {
            warn!("Failed to fetch Pokemon index: {}", e);
            ServiceError::Unavailable(e.to_string())
        })?;

        let (page, total_count) = query.select(entries, |e| e.number, |e| e.name.as_str());

        let images = join_all(page.iter().map(|e| self.image(e.number))).await;

        let items = page
            .into_iter()
            .zip(images)
            .map(|(entry, image)| PokemonSummary {
                name: entry.name,
                number: entry.number,
                image,
            })
            .collect();

        Ok(PokemonPage { items, total_count })
    }

    async fn find(&self, identifier: &str) -> Result<PokemonDetail, ServiceError> {
        let id = match Identifier::parse(identifier) {
            Identifier::Name(name) if name.is_empty() => {
                return Err(ServiceError::NotFound(identifier.to_string()))
            }
            id => id.to_string(),
        };

        let data = self.detail(&id).await?;
        let navigation = self.navigation(data.number).await;

        Ok(PokemonDetail {
            data,
            navigation,
            created_at: None,
            updated_at: None,
        })
    }

    fn backend_name(&self) -> &'static str {
        "live"
    }
}
