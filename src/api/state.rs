//! Shared state for the HTTP API.

use crate::embedding::ProviderRegistry;
use crate::search::MovieSearch;
use std::sync::Arc;
use std::time::Instant;

/// State shared across all API handlers.
pub struct ApiState {
    pub search: Arc<MovieSearch>,
    pub registry: Arc<ProviderRegistry>,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(search: Arc<MovieSearch>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            search,
            registry,
            started_at: Instant::now(),
        }
    }
}
