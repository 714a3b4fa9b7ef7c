//! Common test utilities for router tests with mocks.
//!
//! The fixture builds the full router in-process over a temporary SQLite
//! catalog and a mock PokeAPI source, so tests need no network.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use pokedex_core::{
    config::{AuthConfig, AuthMethod, CatalogBackend, TokenEntry},
    create_authenticator, create_service, load_config_from_str,
    testing::MockPokemonSource,
    Authenticator, CatalogStore, CatalogSync, PokemonData, PokemonSource, SqliteCatalog, SyncScheduler,
};
use pokedex_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use pokedex_core::testing::fixtures;

/// Token accepted when the fixture uses bearer auth.
pub const TEST_TOKEN: &str = "test-token";

/// In-process server with a controllable PokeAPI mock.
pub struct TestFixture {
    pub router: Router,
    pub catalog: Arc<SqliteCatalog>,
    pub source: Arc<MockPokemonSource>,
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Require `Authorization: Bearer test-token`
    pub bearer_auth: bool,
    /// Serve from the live PokeAPI proxy instead of the store
    pub live_backend: bool,
    /// Catalog seeded before the router is built
    pub seed: Vec<PokemonData>,
}

impl TestConfig {
    pub fn seeded(entries: &[(u32, &str)]) -> Self {
        Self {
            seed: entries
                .iter()
                .map(|(number, name)| fixtures::pokemon_data(*number, name))
                .collect(),
            ..Default::default()
        }
    }
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let mut config =
            load_config_from_str("[auth]\nmethod = \"none\"").expect("Failed to build config");
        config.database.path = db_path.clone();
        if test_config.bearer_auth {
            config.auth = AuthConfig {
                method: AuthMethod::Bearer,
                tokens: vec![TokenEntry {
                    token: TEST_TOKEN.to_string(),
                    user_id: "ash".to_string(),
                }],
                revoked: vec!["revoked-token".to_string()],
            };
        }
        if test_config.live_backend {
            config.catalog.backend = CatalogBackend::Live;
        }

        let catalog = Arc::new(SqliteCatalog::new(&db_path).expect("Failed to create catalog"));
        for pokemon in &test_config.seed {
            catalog.upsert(pokemon).expect("Failed to seed catalog");
        }

        let source = Arc::new(MockPokemonSource::new());
        let store: Arc<dyn CatalogStore> = catalog.clone();
        let upstream: Arc<dyn PokemonSource> = source.clone();

        let authenticator: Arc<dyn Authenticator> =
            Arc::from(create_authenticator(&config.auth).expect("Failed to create authenticator"));
        let service = create_service(&config.catalog, Arc::clone(&store), Arc::clone(&upstream));
        let sync = Arc::new(CatalogSync::new(upstream, Arc::clone(&store)));
        let scheduler = Arc::new(SyncScheduler::new(config.sync.clone(), sync));

        let state = Arc::new(AppState::new(
            config,
            authenticator,
            store,
            service,
            Some(scheduler),
        ));

        Self {
            router: create_router(state),
            catalog,
            source,
            temp_dir,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a GET request with a bearer token.
    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.request("GET", path, Some(token)).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a DELETE request without a body.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    async fn request(&self, method: &str, path: &str, token: Option<&str>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            request_builder =
                request_builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = request_builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
