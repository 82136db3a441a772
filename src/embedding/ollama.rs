//! Embedding via a local Ollama server.

use crate::config::OllamaProviderConfig;
use crate::embedding::{EmbeddingProvider, ProviderMetadata};
use crate::error::{ProviderError, Result};
use serde::Deserialize;

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

/// Backend talking to Ollama's `/api/embeddings` endpoint.
pub struct OllamaProvider {
    client: reqwest::Client,
    host: String,
    model: String,
    metadata: ProviderMetadata,
}

impl OllamaProvider {
    pub fn new(config: &OllamaProviderConfig) -> Self {
        let host = config.host.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            metadata: ProviderMetadata {
                name: "ollama".to_string(),
                model: config.model.clone(),
                endpoint: Some(host.clone()),
                dimensions: None,
            },
            host,
            model: config.model.clone(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.host))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": text,
            }))
            .send()
            .await
            .map_err(ProviderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: OllamaEmbeddingResponse =
            response.json().await.map_err(ProviderError::Http)?;

        if parsed.embedding.is_empty() {
            return Err(ProviderError::EmptyResponse.into());
        }

        Ok(parsed.embedding)
    }
}
