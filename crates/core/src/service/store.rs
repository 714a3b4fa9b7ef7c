//! Catalog service over the local store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{PokedexService, PokemonDetail, ServiceError};
use crate::catalog::{CatalogStore, Identifier, ListQuery, PokemonPage};

/// Serves list and detail requests from the catalog populated by sync.
pub struct StoreBackedService {
    catalog: Arc<dyn CatalogStore>,
}

impl StoreBackedService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl PokedexService for StoreBackedService {
    async fn list(&self, query: &ListQuery) -> Result<PokemonPage, ServiceError> {
        debug!(?query, "Listing catalog");
        Ok(self.catalog.list(query)?)
    }

    async fn find(&self, identifier: &str) -> Result<PokemonDetail, ServiceError> {
        let id = Identifier::parse(identifier);
        let record = self.catalog.get(&id)?;
        let navigation = self.catalog.navigation(record.data.number)?;

        Ok(PokemonDetail {
            data: record.data,
            navigation,
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
        })
    }

    fn backend_name(&self) -> &'static str {
        "store"
    }
}
