//! Pokemon catalog - the persisted table of species records.
//!
//! The catalog is written only by ingestion (upsert by number) and read by
//! the list and detail paths.

pub mod query;
mod sqlite;
mod types;

pub use query::{
    Identifier, ListQuery, Pagination, SearchFilter, SortField, SortOrder, DEFAULT_LIMIT,
    MAX_LIMIT,
};
pub use sqlite::SqliteCatalog;
pub use types::*;

/// Trait for catalog storage.
pub trait CatalogStore: Send + Sync {
    /// Insert a record, or replace every field of the record with the same number.
    ///
    /// `created_at` is kept on update, `updated_at` always moves forward.
    fn upsert(&self, pokemon: &PokemonData) -> Result<UpsertOutcome, CatalogError>;

    /// Filter, sort and page the catalog.
    fn list(&self, query: &ListQuery) -> Result<PokemonPage, CatalogError>;

    /// Look up a record by number or case-insensitive name.
    fn get(&self, id: &Identifier) -> Result<PokemonRecord, CatalogError>;

    /// Neighbors by number (not by insertion order).
    fn navigation(&self, number: u32) -> Result<Navigation, CatalogError>;

    /// Total number of records.
    fn count(&self) -> Result<u64, CatalogError>;

    /// Check the store is reachable.
    fn ping(&self) -> Result<(), CatalogError>;
}
