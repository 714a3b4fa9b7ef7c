//! Sync scheduler endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use pokedex_core::{sync::SyncError, SyncReport, SyncStatus};
use tracing::info;

use super::middleware::AuthUser;
use super::response::{success, ApiError, Envelope};
use crate::state::AppState;

/// GET /api/v1/sync/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<Envelope<SyncStatus>> {
    let status = match state.scheduler() {
        Some(scheduler) => scheduler.status().await,
        None => SyncStatus::default(),
    };
    success(status)
}

/// POST /api/v1/sync/run
///
/// Runs one sync immediately and returns its report.
pub async fn run_sync(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Envelope<SyncReport>>, ApiError> {
    let scheduler = state
        .scheduler()
        .ok_or_else(|| ApiError::unavailable("Sync is not available for this backend"))?;

    info!("Manual sync requested by {}", user);

    match scheduler.run_now().await {
        Ok(report) => Ok(success(report)),
        Err(SyncError::AlreadyRunning) => Err(ApiError::new(
            StatusCode::CONFLICT,
            "A sync is already in progress",
        )),
    }
}
