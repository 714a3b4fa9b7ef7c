//! PokeAPI integration.
//!
//! The catalog is populated from two PokeAPI resources per species:
//! `pokemon/{id}` (the primary record) and `pokemon-species/{id}`
//! (flavor text and color). The live catalog variant also reads the
//! full `pokemon` index.

mod client;
pub mod transform;
mod types;

pub use client::{PokeApiClient, PokeApiConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to PokeAPI.
#[derive(Debug, Error)]
pub enum PokeApiError {
    /// HTTP request failed (connection, timeout).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Malformed payload or missing required fields.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured.
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl PokeApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PokeApiError::NotFound(_))
    }
}

/// Source of raw Pokemon payloads.
///
/// Implemented by [`PokeApiClient`] and by the mock in `testing`.
/// `id` is a decimal number or a lowercase slug.
#[async_trait]
pub trait PokemonSource: Send + Sync {
    /// Fetch the primary record (`pokemon/{id}`).
    async fn fetch_pokemon(&self, id: &str) -> Result<PokemonPayload, PokeApiError>;

    /// Fetch the supplementary record (`pokemon-species/{id}`).
    async fn fetch_species(&self, id: &str) -> Result<SpeciesPayload, PokeApiError>;

    /// Fetch every species name and number.
    async fn fetch_index(&self) -> Result<Vec<IndexEntry>, PokeApiError>;
}
