//! Embedding backends and the registry that selects between them.
//!
//! Every backend implements [`EmbeddingProvider`] and announces its display
//! metadata directly at registration time, so callers never have to probe a
//! backend's shape to find out what model it runs.

mod azure;
mod gemini;
mod local;
mod ollama;
mod registry;

pub use azure::AzureProvider;
pub use gemini::GeminiProvider;
pub use local::LocalProvider;
pub use ollama::OllamaProvider;
pub use registry::ProviderRegistry;

use crate::error::Result;
use serde::Serialize;

/// Display metadata a provider supplies when it is registered.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetadata {
    /// Registry name, e.g. `"ollama"`.
    pub name: String,
    /// Model identifier reported by the backend.
    pub model: String,
    /// Endpoint the backend talks to; `None` for in-process models.
    pub endpoint: Option<String>,
    /// Vector dimensionality when known up front.
    pub dimensions: Option<usize>,
}

/// A pluggable embedding backend.
///
/// Implementations are shared behind `Arc<dyn EmbeddingProvider>` and must be
/// cheap to call concurrently.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Registration metadata for logging and the providers endpoint.
    fn metadata(&self) -> &ProviderMetadata;

    /// Compute the embedding vector for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
