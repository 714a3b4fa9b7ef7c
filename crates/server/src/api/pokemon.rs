//! Pokemon list and detail handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use pokedex_core::{
    catalog::PokemonSummary, ListQuery, Pagination, PokemonDetail, ServiceError,
};
use tracing::{debug, warn};

use super::middleware::AuthUser;
use super::response::{success, success_with_meta, ApiError, Envelope, ListMeta};
use crate::state::AppState;

/// Raw list parameters. Kept as strings so bad numbers are clamped, not rejected.
#[derive(Debug, Default)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListParams {
    /// Build from decoded query pairs. A repeated key keeps its last value;
    /// unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut params.search,
                "sort" => &mut params.sort,
                "order" => &mut params.order,
                "limit" => &mut params.limit,
                "offset" => &mut params.offset,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }

    pub fn to_query(&self) -> ListQuery {
        ListQuery::new(
            self.search.as_deref(),
            self.sort.as_deref(),
            self.order.as_deref(),
            Pagination::from_raw(self.limit.as_deref(), self.offset.as_deref()),
        )
    }
}

/// GET /api/v1/pokemon
pub async fn list_pokemon(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Envelope<Vec<PokemonSummary>>>, ApiError> {
    let Query(pairs) = pairs.map_err(|e| {
        debug!("Rejected list query string: {}", e);
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid query string")
    })?;
    let query = ListParams::from_pairs(pairs).to_query();
    debug!(user = %user, ?query, "Listing Pokemon");

    match state.service().list(&query).await {
        Ok(page) => Ok(success_with_meta(
            page.items,
            ListMeta {
                count: page.total_count,
                limit: query.limit,
                offset: query.offset,
            },
        )),
        Err(e) => {
            warn!("Failed to list Pokemon: {}", e);
            Err(ApiError::unavailable("Failed to fetch Pokemon list"))
        }
    }
}

/// GET /api/v1/pokemon/{id}
///
/// `id` is a dex number or a case-insensitive name.
pub async fn get_pokemon(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<PokemonDetail>>, ApiError> {
    debug!(user = %user, id = %id, "Fetching Pokemon");

    match state.service().find(&id).await {
        Ok(detail) => Ok(success(detail)),
        Err(ServiceError::NotFound(_)) => Err(ApiError::not_found("Pokemon")),
        Err(e) => {
            warn!("Failed to fetch Pokemon {}: {}", id, e);
            Err(ApiError::unavailable("Failed to fetch Pokemon"))
        }
    }
}
