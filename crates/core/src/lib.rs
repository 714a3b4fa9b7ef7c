pub mod auth;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod pokeapi;
pub mod service;
pub mod sync;
pub mod testing;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, BearerTokenAuthenticator,
    Identity, NoneAuthenticator,
};
pub use cache::ResponseCache;
pub use catalog::{
    CatalogError, CatalogStore, Identifier, ListQuery, Navigation, Pagination, PokemonData,
    PokemonPage, PokemonRecord, PokemonSummary, SortField, SortOrder, SqliteCatalog,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, CatalogBackend, Config,
    ConfigError, SanitizedConfig,
};
pub use pokeapi::{PokeApiClient, PokeApiConfig, PokeApiError, PokemonSource};
pub use service::{create_service, PokedexService, PokemonDetail, ServiceError};
pub use sync::{CatalogSync, SyncConfig, SyncReport, SyncScheduler, SyncStatus};
