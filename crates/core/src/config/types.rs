use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::pokeapi::PokeApiConfig;
use crate::sync::SyncConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pokeapi: PokeApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3001".to_string()]
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    /// Accepted bearer tokens (bearer method only).
    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
    /// Tokens that were issued but are no longer accepted.
    #[serde(default)]
    pub revoked: Vec<String>,
}

impl AuthConfig {
    pub fn none() -> Self {
        Self {
            method: AuthMethod::None,
            tokens: Vec::new(),
            revoked: Vec::new(),
        }
    }
}

/// A bearer token and the user it identifies.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenEntry {
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    Bearer,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::None => "none",
            AuthMethod::Bearer => "bearer",
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("pokedex.db")
}

/// Which service answers catalog requests.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    /// Persistent catalog fed by the sync.
    #[default]
    Store,
    /// Proxy PokeAPI live behind the response cache.
    Live,
}

impl CatalogBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogBackend::Store => "store",
            CatalogBackend::Live => "live",
        }
    }
}

/// Catalog service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub backend: CatalogBackend,
    /// TTL of the cached full listing (live backend).
    #[serde(default = "default_list_ttl")]
    pub list_cache_ttl_secs: u64,
    /// TTL of cached per-Pokemon lookups (live backend).
    #[serde(default = "default_detail_ttl")]
    pub detail_cache_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::default(),
            list_cache_ttl_secs: default_list_ttl(),
            detail_cache_ttl_secs: default_detail_ttl(),
        }
    }
}

fn default_list_ttl() -> u64 {
    3600
}

fn default_detail_ttl() -> u64 {
    300
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pokeapi: PokeApiConfig,
    pub catalog: CatalogConfig,
    pub sync: SyncConfig,
}

/// Auth config with tokens replaced by counts
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub tokens_configured: usize,
    pub tokens_revoked: usize,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: config.auth.method.as_str().to_string(),
                tokens_configured: config.auth.tokens.len(),
                tokens_revoked: config.auth.revoked.len(),
            },
            server: config.server.clone(),
            database: config.database.clone(),
            pokeapi: config.pokeapi.clone(),
            catalog: config.catalog.clone(),
            sync: config.sync.clone(),
        }
    }
}
