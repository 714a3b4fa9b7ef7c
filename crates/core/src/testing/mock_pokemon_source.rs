//! Mock PokeAPI source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::pokeapi::{IndexEntry, PokeApiError, PokemonPayload, PokemonSource, SpeciesPayload};

/// A recorded request for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Pokemon(String),
    Species(String),
    Index,
}

/// How a configured number should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Payload could not be decoded.
    Malformed,
    /// Upstream answered with this status.
    Status(u16),
}

impl MockFailure {
    fn to_error(self, id: &str) -> PokeApiError {
        match self {
            MockFailure::Malformed => {
                PokeApiError::ParseError(format!("malformed payload for {}", id))
            }
            MockFailure::Status(404) => PokeApiError::NotFound(id.to_string()),
            MockFailure::Status(status) => PokeApiError::ApiError {
                status,
                message: "mock failure".to_string(),
            },
        }
    }
}

/// Mock implementation of the PokemonSource trait.
///
/// Provides controllable behavior for testing:
/// - Serve configurable primary and species payloads
/// - Fail specific numbers
/// - Track requests for assertions
/// - Slow every request down
///
/// # Example
///
/// ```rust,ignore
/// use pokedex_core::testing::{MockPokemonSource, fixtures};
///
/// let source = MockPokemonSource::new();
/// source.add_pokemon(fixtures::pokemon_payload(1, "bulbasaur")).await;
///
/// let payload = source.fetch_pokemon("1").await?;
/// assert_eq!(payload.name, "bulbasaur");
/// ```
#[derive(Debug)]
pub struct MockPokemonSource {
    /// Primary payloads by number.
    pokemon: Arc<RwLock<HashMap<u32, PokemonPayload>>>,
    /// Species payloads by number.
    species: Arc<RwLock<HashMap<u32, SpeciesPayload>>>,
    /// Numbers whose primary record fails.
    failures: Arc<RwLock<HashMap<u32, MockFailure>>>,
    /// Index override; derived from `pokemon` when unset.
    index: Arc<RwLock<Option<Vec<IndexEntry>>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<PokeApiError>>>,
    /// Artificial latency per request.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockPokemonSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPokemonSource {
    /// Create a new empty mock source.
    pub fn new() -> Self {
        Self {
            pokemon: Arc::new(RwLock::new(HashMap::new())),
            species: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            index: Arc::new(RwLock::new(None)),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Payload Configuration
    // =========================================================================

    /// Add a primary payload.
    pub async fn add_pokemon(&self, payload: PokemonPayload) {
        self.pokemon.write().await.insert(payload.id, payload);
    }

    /// Add a species payload for a number.
    pub async fn add_species(&self, number: u32, payload: SpeciesPayload) {
        self.species.write().await.insert(number, payload);
    }

    /// Make the primary record of a number fail.
    pub async fn fail_pokemon(&self, number: u32, failure: MockFailure) {
        self.failures.write().await.insert(number, failure);
    }

    /// Serve a fixed index instead of the one derived from the payloads.
    pub async fn set_index(&self, entries: Vec<IndexEntry>) {
        *self.index.write().await = Some(entries);
    }

    /// Delay every request by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    // =========================================================================
    // Request Recording
    // =========================================================================

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Number of primary-record requests.
    pub async fn pokemon_request_count(&self) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| matches!(r, RecordedRequest::Pokemon(_)))
            .count()
    }

    /// Clear recorded requests.
    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: PokeApiError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<PokeApiError> {
        self.next_error.write().await.take()
    }

    /// Record a request and apply the configured latency.
    async fn record(&self, request: RecordedRequest) {
        self.requests.write().await.push(request);
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Resolve a number or name to a configured number.
    async fn resolve(&self, id: &str) -> Option<u32> {
        if let Ok(number) = id.parse::<u32>() {
            return Some(number);
        }
        self.pokemon
            .read()
            .await
            .values()
            .find(|p| p.name == id)
            .map(|p| p.id)
    }
}

#[async_trait]
impl PokemonSource for MockPokemonSource {
    async fn fetch_pokemon(&self, id: &str) -> Result<PokemonPayload, PokeApiError> {
        self.record(RecordedRequest::Pokemon(id.to_string())).await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let number = self
            .resolve(id)
            .await
            .ok_or_else(|| PokeApiError::NotFound(format!("pokemon/{}", id)))?;

        if let Some(failure) = self.failures.read().await.get(&number) {
            return Err(failure.to_error(id));
        }

        self.pokemon
            .read()
            .await
            .get(&number)
            .cloned()
            .ok_or_else(|| PokeApiError::NotFound(format!("pokemon/{}", id)))
    }

    async fn fetch_species(&self, id: &str) -> Result<SpeciesPayload, PokeApiError> {
        self.record(RecordedRequest::Species(id.to_string())).await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let number = self
            .resolve(id)
            .await
            .ok_or_else(|| PokeApiError::NotFound(format!("pokemon-species/{}", id)))?;

        self.species
            .read()
            .await
            .get(&number)
            .cloned()
            .ok_or_else(|| PokeApiError::NotFound(format!("pokemon-species/{}", id)))
    }

    async fn fetch_index(&self) -> Result<Vec<IndexEntry>, PokeApiError> {
        self.record(RecordedRequest::Index).await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if let Some(entries) = self.index.read().await.clone() {
            return Ok(entries);
        }

        let mut entries: Vec<IndexEntry> = self
            .pokemon
            .read()
            .await
            .values()
            .map(|p| IndexEntry {
                number: p.id,
                name: p.name.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.number);

        Ok(entries)
    }
}
