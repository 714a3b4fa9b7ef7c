//! Catalog services behind the HTTP entrypoint.
//!
//! [`PokedexService`] is the list/detail contract. Two implementations exist:
//! [`StoreBackedService`] reads the local catalog populated by sync, and
//! [`LiveApiService`] proxies PokeAPI through TTL caches. The backend is
//! chosen once at startup by [`create_service`].

mod live;
mod store;

pub use live::LiveApiService;
pub use store::StoreBackedService;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::cache::ResponseCache;
use crate::catalog::{CatalogError, CatalogStore, ListQuery, Navigation, PokemonData, PokemonPage};
use crate::config::{CatalogBackend, CatalogConfig};
use crate::pokeapi::{PokeApiError, PokemonSource};

/// Errors surfaced to the entrypoint.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No Pokemon matches the identifier.
    #[error("Pokemon not found: {0}")]
    NotFound(String),

    /// The catalog store or upstream API could not serve the request.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl From<CatalogError> for ServiceError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Unavailable(other.to_string()),
        }
    }
}

impl From<PokeApiError> for ServiceError {
    fn from(err: PokeApiError) -> Self {
        match err {
            PokeApiError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Unavailable(other.to_string()),
        }
    }
}

/// Full detail of one Pokemon with prev/next navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
    #[serde(flatten)]
    pub data: PokemonData,
    pub navigation: Navigation,
    /// Store timestamps; absent when proxied live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// List and detail lookups over the Pokemon catalog.
#[async_trait]
pub trait PokedexService: Send + Sync {
    /// Filtered, sorted page plus the filtered count.
    async fn list(&self, query: &ListQuery) -> Result<PokemonPage, ServiceError>;

    /// Lookup by decimal number or case-insensitive name.
    async fn find(&self, identifier: &str) -> Result<PokemonDetail, ServiceError>;

    /// Backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Create the catalog service for the configured backend.
pub fn create_service(
    config: &CatalogConfig,
    catalog: Arc<dyn CatalogStore>,
    source: Arc<dyn PokemonSource>,
) -> Arc<dyn PokedexService> {
    let service: Arc<dyn PokedexService> = match config.backend {
        CatalogBackend::Store => Arc::new(StoreBackedService::new(catalog)),
        CatalogBackend::Live => Arc::new(LiveApiService::new(
            source,
            Arc::new(ResponseCache::new("listing")),
            Arc::new(ResponseCache::new("lookup")),
            Duration::from_secs(config.list_cache_ttl_secs),
            Duration::from_secs(config.detail_cache_ttl_secs),
        )),
    };

    info!("Catalog service backend: {}", service.backend_name());
    service
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SqliteCatalog;
    use crate::testing::{fixtures, MockPokemonSource};

    #[test]
    fn test_catalog_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(CatalogError::NotFound("1".into())),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            ServiceError::from(CatalogError::Database("locked".into())),
            ServiceError::Unavailable(_)
        ));
        assert!(matches!(
            ServiceError::from(PokeApiError::ParseError("bad".into())),
            ServiceError::Unavailable(_)
        ));
    }

    #[test]
    fn test_detail_serializes_flat_with_navigation() {
        let detail = PokemonDetail {
            data: fixtures::pokemon_data(4, "charmander"),
            navigation: Navigation::default(),
            created_at: None,
            updated_at: None,
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "charmander");
        assert_eq!(json["base_stats"]["hp"], 50);
        assert!(json["navigation"]["prev"].is_null());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_create_service_selects_backend() {
        let catalog: Arc<dyn CatalogStore> = Arc::new(SqliteCatalog::in_memory().unwrap());
        let source: Arc<dyn PokemonSource> = Arc::new(MockPokemonSource::new());

        let mut config = CatalogConfig::default();
        let store = create_service(&config, Arc::clone(&catalog), Arc::clone(&source));
        assert_eq!(store.backend_name(), "store");

        config.backend = CatalogBackend::Live;
        let live = create_service(&config, catalog, source);
        assert_eq!(live.backend_name(), "live");
    }
}
