//! Configuration loading: defaults, optional TOML file, environment overrides.

use crate::error::Result;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub index: IndexConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: ([127, 0, 0, 1], 8080).into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the LanceDB dataset. The index is rebuilt from the
    /// catalog on demand, so this is a cache, not durable state.
    pub data_dir: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        let base = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            data_dir: base.join("cinesearch"),
        }
    }
}

/// Which embedding backends are available and which one starts active.
///
/// A backend whose section is absent is simply not registered. The local
/// fastembed backend needs no credentials and is always registered.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Name of the provider active at startup.
    pub default: String,
    pub local: LocalProviderConfig,
    pub azure: Option<AzureProviderConfig>,
    pub ollama: Option<OllamaProviderConfig>,
    pub gemini: Option<GeminiProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            default: "local".to_string(),
            local: LocalProviderConfig::default(),
            azure: None,
            ollama: None,
            gemini: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LocalProviderConfig {
    /// Where fastembed caches downloaded model files. Defaults to a
    /// subdirectory of the index data dir.
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureProviderConfig {
    /// Inference endpoint, e.g. `https://<resource>.services.ai.azure.com/models`.
    pub host: String,
    pub token: String,
    /// Model deployment name; omitted from the request when unset.
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaProviderConfig {
    pub host: String,
    pub model: String,
}

impl Default for OllamaProviderConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiProviderConfig {
    pub token: String,
    #[serde(default = "GeminiProviderConfig::default_model")]
    pub model: String,
}

impl GeminiProviderConfig {
    fn default_model() -> String {
        "text-embedding-004".to_string()
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply
    /// `CINESEARCH_*` environment overrides (`__` separates nesting levels,
    /// e.g. `CINESEARCH_SERVER__BIND`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                builder = builder.add_source(config::File::with_name("cinesearch").required(false));
            }
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("CINESEARCH").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_local_provider() {
        let config = AppConfig::default();
        assert_eq!(config.providers.default, "local");
        assert!(config.providers.azure.is_none());
        assert!(config.providers.ollama.is_none());
        assert!(config.providers.gemini.is_none());
    }

    #[test]
    fn default_bind_is_loopback() {
        let config = AppConfig::default();
        assert!(config.server.bind.ip().is_loopback());
    }
}
