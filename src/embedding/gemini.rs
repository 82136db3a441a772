//! Embedding via the Google Generative Language API.

use crate::config::GeminiProviderConfig;
use crate::embedding::{EmbeddingProvider, ProviderMetadata};
use crate::error::{ProviderError, Result};
use serde::Deserialize;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Deserialize)]
struct GeminiEmbeddingResponse {
    embedding: GeminiEmbedding,
}

#[derive(Deserialize)]
struct GeminiEmbedding {
    values: Vec<f32>,
}

/// Backend talking to Gemini's `embedContent` endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    token: String,
    model: String,
    metadata: ProviderMetadata,
}

impl GeminiProvider {
    pub fn new(config: &GeminiProviderConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(ProviderError::MissingSetting {
                provider: "gemini",
                setting: "token",
            }
            .into());
        }

        Ok(Self {
            client: reqwest::Client::new(),
            metadata: ProviderMetadata {
                name: "gemini".to_string(),
                model: config.model.clone(),
                endpoint: Some(BASE_URL.to_string()),
                dimensions: None,
            },
            token: config.token.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for GeminiProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!(
                "{}/models/{}:embedContent",
                BASE_URL, self.model
            ))
            .header("x-goog-api-key", &self.token)
            .json(&serde_json::json!({
                "content": { "parts": [{ "text": text }] },
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

        let parsed: GeminiEmbeddingResponse =
            response.json().await.map_err(ProviderError::Http)?;

        if parsed.embedding.values.is_empty() {
            return Err(ProviderError::EmptyResponse.into());
        }

        Ok(parsed.embedding.values)
    }
}
