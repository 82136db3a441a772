//! Handler exposing the registered embedding providers.

use super::state::ApiState;
use crate::embedding::ProviderMetadata;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub(super) struct ProvidersResponse {
    /// Name of the provider currently serving searches.
    active: String,
    /// Every registered backend, sorted by name.
    providers: Vec<ProviderMetadata>,
}

/// `GET /api/providers`
pub(super) async fn get_providers(
    State(state): State<Arc<ApiState>>,
) -> Json<ProvidersResponse> {
    let active = state.search.active_provider().await;

    Json(ProvidersResponse {
        active: active.name,
        providers: state.registry.metadata(),
    })
}
