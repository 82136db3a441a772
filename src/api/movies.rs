//! Handlers for movie search, index refresh, and provider switching.

use super::state::ApiState;
use crate::search::{MovieMatch, SearchOptions};

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub(super) struct SearchParams {
    #[serde(default = "default_query")]
    query: String,
    #[serde(default = "default_top")]
    top: usize,
    #[serde(default)]
    skip: usize,
}

fn default_query() -> String {
    "A family friendly movie that includes ogres and dragons".to_string()
}

fn default_top() -> usize {
    3
}

#[derive(Serialize)]
pub(super) struct SearchResponse {
    query: String,
    results: Vec<MovieMatch>,
}

#[derive(Serialize)]
pub(super) struct RefreshResponse {
    success: bool,
}

#[derive(Serialize)]
pub(super) struct SwitchResponse {
    success: bool,
    message: String,
}

/// `GET /api/movies/search`: semantic search over the catalog.
///
/// A blank query or zero matches is a `200` with an empty result list;
/// only provider/index failures are reported as errors.
pub(super) async fn search(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, StatusCode> {
    let options = SearchOptions {
        top: params.top,
        skip: params.skip,
    };

    let results = state
        .search
        .search(&params.query, options)
        .await
        .map_err(|error| {
            tracing::error!(%error, "movie search failed");
            StatusCode::BAD_GATEWAY
        })?;

    Ok(Json(SearchResponse {
        query: params.query,
        results,
    }))
}

/// `POST /api/movies/refresh`: full index rebuild with the active provider.
pub(super) async fn refresh(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    let success = state.search.refresh().await.map_err(|error| {
        tracing::error!(%error, "index refresh failed");
        StatusCode::BAD_GATEWAY
    })?;

    Ok(Json(RefreshResponse { success }))
}

/// `POST /api/movies/switch/{provider}`: activate a registered provider and
/// reindex. An unknown name reports `success: false` without touching state.
pub(super) async fn switch_provider(
    State(state): State<Arc<ApiState>>,
    Path(provider): Path<String>,
) -> Result<Json<SwitchResponse>, StatusCode> {
    let switched = state
        .search
        .switch_provider(&provider)
        .await
        .map_err(|error| {
            tracing::error!(%error, provider, "provider switch failed");
            StatusCode::BAD_GATEWAY
        })?;

    let message = if switched {
        format!("Provider '{provider}' is now active")
    } else {
        format!("The provider is not supported: {provider}")
    };

    Ok(Json(SwitchResponse {
        success: switched,
        message,
    }))
}
