//! In-process embedding via fastembed.

use crate::embedding::{EmbeddingProvider, ProviderMetadata};
use crate::error::{ProviderError, Result};
use std::path::Path;
use std::sync::Arc;

/// Embedding dimension of the default fastembed model (all-MiniLM-L6-v2).
const LOCAL_EMBEDDING_DIM: usize = 384;

/// Local fastembed backend. Needs no credentials and serves as the default
/// provider so the service works out of the box.
///
/// fastembed's `TextEmbedding` is not `Send`, so the model lives behind an
/// `Arc` and every call goes through `spawn_blocking`.
pub struct LocalProvider {
    model: Arc<fastembed::TextEmbedding>,
    metadata: ProviderMetadata,
}

impl LocalProvider {
    /// Create the local backend, storing downloaded model files in `cache_dir`.
    pub fn new(cache_dir: &Path) -> Result<Self> {
        let options = fastembed::InitOptions::default()
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(true);

        let model = fastembed::TextEmbedding::try_new(options)
            .map_err(|e| ProviderError::EmbeddingFailed(e.to_string()))?;

        Ok(Self {
            model: Arc::new(model),
            metadata: ProviderMetadata {
                name: "local".to_string(),
                model: "all-MiniLM-L6-v2".to_string(),
                endpoint: None,
                dimensions: Some(LOCAL_EMBEDDING_DIM),
            },
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for LocalProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let text = text.to_string();
        let model = self.model.clone();
        let embeddings = tokio::task::spawn_blocking(move || {
            model
                .embed(vec![text], None)
                .map_err(|e| ProviderError::EmbeddingFailed(e.to_string()))
        })
        .await
        .map_err(|e| ProviderError::EmbeddingFailed(format!("embedding task failed: {e}")))??;

        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse.into())
    }
}
