//! Embedding via the Azure AI Inference REST API.

use crate::config::AzureProviderConfig;
use crate::embedding::{EmbeddingProvider, ProviderMetadata};
use crate::error::{ProviderError, Result};
use serde::Deserialize;

const API_VERSION: &str = "2024-05-01-preview";

#[derive(Deserialize)]
struct AzureEmbeddingResponse {
    data: Vec<AzureEmbeddingItem>,
}

#[derive(Deserialize)]
struct AzureEmbeddingItem {
    embedding: Vec<f32>,
}

/// Backend talking to an Azure AI Inference embeddings deployment.
pub struct AzureProvider {
    client: reqwest::Client,
    host: String,
    token: String,
    model: Option<String>,
    metadata: ProviderMetadata,
}

impl AzureProvider {
    pub fn new(config: &AzureProviderConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(ProviderError::MissingSetting {
                provider: "azure",
                setting: "token",
            }
            .into());
        }

        let host = config.host.trim_end_matches('/').to_string();
        Ok(Self {
            client: reqwest::Client::new(),
            metadata: ProviderMetadata {
                name: "azure".to_string(),
                model: config.model.clone().unwrap_or_else(|| "default".to_string()),
                endpoint: Some(host.clone()),
                dimensions: None,
            },
            host,
            token: config.token.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for AzureProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut body = serde_json::json!({ "input": [text] });
        if let Some(model) = &self.model {
            body["model"] = serde_json::Value::String(model.clone());
        }

        let response = self
            .client
            .post(format!(
                "{}/embeddings?api-version={}",
                self.host, API_VERSION
            ))
            .header("api-key", &self.token)
            .json(&body)
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

        let parsed: AzureEmbeddingResponse =
            response.json().await.map_err(ProviderError::Http)?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or_else(|| ProviderError::EmptyResponse.into())
    }
}
