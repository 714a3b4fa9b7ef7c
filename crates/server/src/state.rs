use std::sync::Arc;

use pokedex_core::{
    Authenticator, CatalogStore, Config, PokedexService, SanitizedConfig, SyncScheduler,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    catalog: Arc<dyn CatalogStore>,
    service: Arc<dyn PokedexService>,
    scheduler: Option<Arc<SyncScheduler>>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        catalog: Arc<dyn CatalogStore>,
        service: Arc<dyn PokedexService>,
        scheduler: Option<Arc<SyncScheduler>>,
    ) -> Self {
        Self {
            config,
            authenticator,
            catalog,
            service,
            scheduler,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    pub fn service(&self) -> &dyn PokedexService {
        self.service.as_ref()
    }

    /// The sync scheduler, absent when the live backend serves the catalog.
    pub fn scheduler(&self) -> Option<&Arc<SyncScheduler>> {
        self.scheduler.as_ref()
    }
}
