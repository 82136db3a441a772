//! Request and result types for movie search.

use serde::Serialize;

/// A movie row as stored in the vector index. One per catalog entry,
/// fully overwritten on every refresh.
#[derive(Debug, Clone)]
pub struct IndexedMovie {
    pub key: i64,
    pub title: String,
    pub description: String,
    /// Name of the provider that generated `vector`. All rows of a given
    /// index generation carry the same provider.
    pub provider: String,
    pub vector: Vec<f32>,
}

/// A single search hit, ranked as returned by the vector index.
#[derive(Debug, Clone, Serialize)]
pub struct MovieMatch {
    pub key: i64,
    pub title: String,
    /// Similarity score in `[0, 1]`, higher is closer.
    pub score: f32,
}

/// Paging options for a search request.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Maximum number of results. Values below 1 are clamped to 1.
    pub top: usize,
    /// Number of ranked results to skip before collecting.
    pub skip: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { top: 3, skip: 0 }
    }
}
