//! PokeAPI HTTP client.
//!
//! PokeAPI is public and needs no key. Every request has a finite timeout so
//! a stalled upstream can never hang a sync run or a request handler.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{IndexEntry, IndexPayload, PokemonPayload, SpeciesPayload};
use super::{PokeApiError, PokemonSource};
use crate::metrics::POKEAPI_REQUESTS;

/// Upper bound for the full species index.
const INDEX_LIMIT: u32 = 100_000;

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// PokeAPI client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokeApiConfig {
    /// Base URL (default: https://pokeapi.co/api/v2).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for each outbound request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// PokeAPI client.
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a new PokeAPI client.
    pub fn new(config: &PokeApiConfig) -> Result<Self, PokeApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(PokeApiError::NotConfigured(
                "PokeAPI base URL is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// GET `{base_url}/{path}` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
    ) -> Result<T, PokeApiError> {
        let result = self.request(path).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(PokeApiError::NotFound(_)) => "not_found",
            Err(_) => "error",
        };
        POKEAPI_REQUESTS
            .with_label_values(&[resource, outcome])
            .inc();

        result
    }

    async fn request<T: DeserializeOwned>(&self, path: &str) -> Result<T, PokeApiError> {
        let url = format!("{}/{}", self.base_url, path);

        debug!("PokeAPI GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == 404 {
            return Err(PokeApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PokeApiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            PokeApiError::ParseError(format!("Failed to parse {} response: {}", path, e))
        })
    }
}

#[async_trait]
impl PokemonSource for PokeApiClient {
    async fn fetch_pokemon(&self, id: &str) -> Result<PokemonPayload, PokeApiError> {
        let path = format!("pokemon/{}", urlencoding::encode(id));
        self.get_json("pokemon", &path).await
    }

    async fn fetch_species(&self, id: &str) -> Result<SpeciesPayload, PokeApiError> {
        let path = format!("pokemon-species/{}", urlencoding::encode(id));
        self.get_json("pokemon-species", &path).await
    }

    async fn fetch_index(&self) -> Result<Vec<IndexEntry>, PokeApiError> {
        let path = format!("pokemon?limit={}", INDEX_LIMIT);
        let payload: IndexPayload = self.get_json("pokemon-index", &path).await?;
        Ok(payload.into_entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;

    async fn pokemon(Path(id): Path<String>) -> axum::response::Response {
        match id.as_str() {
            "1" | "bulbasaur" => (
                [("content-type", "application/json")],
                r#"{"id": 1, "name": "bulbasaur", "weight": 69, "height": 7}"#,
            )
                .into_response(),
            "2" => (
                [("content-type", "application/json")],
                r#"{"id": 2, "name": "ivysaur", "weight":"#,
            )
                .into_response(),
            "3" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
            _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        }
    }

    async fn index() -> impl IntoResponse {
        (
            [("content-type", "application/json")],
            r#"{"count": 2, "results": [
                {"name": "bulbasaur", "url": "http://stub/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "http://stub/api/v2/pokemon/2/"}
            ]}"#,
        )
    }

    async fn start_stub() -> String {
        let app = Router::new()
            .route("/api/v2/pokemon", get(index))
            .route("/api/v2/pokemon/{id}", get(pokemon));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/api/v2", addr)
    }

    fn client_for(base_url: String) -> PokeApiClient {
        PokeApiClient::new(&PokeApiConfig {
            base_url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let result = PokeApiClient::new(&PokeApiConfig {
            base_url: String::new(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(PokeApiError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_fetch_pokemon_by_number_and_slug() {
        let client = client_for(start_stub().await);

        let by_number = client.fetch_pokemon("1").await.unwrap();
        assert_eq!(by_number.name, "bulbasaur");
        assert_eq!(by_number.weight, Some(69));

        let by_slug = client.fetch_pokemon("bulbasaur").await.unwrap();
        assert_eq!(by_slug.id, 1);
    }

    #[tokio::test]
    async fn test_fetch_pokemon_error_classes() {
        let client = client_for(start_stub().await);

        assert!(matches!(
            client.fetch_pokemon("2").await,
            Err(PokeApiError::ParseError(_))
        ));
        assert!(matches!(
            client.fetch_pokemon("3").await,
            Err(PokeApiError::ApiError { status: 500, .. })
        ));
        assert!(client.fetch_pokemon("999").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_index() {
        let client = client_for(start_stub().await);

        let entries = client.fetch_index().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].number, 2);
        assert_eq!(entries[1].name, "ivysaur");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/api/v2", addr));
        assert!(matches!(
            client.fetch_species("1").await,
            Err(PokeApiError::HttpError(_))
        ));
    }
}
