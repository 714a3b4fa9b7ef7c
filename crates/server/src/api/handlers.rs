use axum::{extract::State, http::header, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use pokedex_core::SanitizedConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use super::response::{success, Envelope};
use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Whether the catalog database answers queries.
    pub database: bool,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Envelope<HealthResponse>> {
    let database = match state.catalog().ping() {
        Ok(()) => true,
        Err(e) => {
            warn!("Health check: catalog unavailable: {}", e);
            false
        }
    };

    success(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        database,
    })
}

/// GET /api/v1/config
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Envelope<SanitizedConfig>> {
    success(state.sanitized_config())
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
