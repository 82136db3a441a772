//! Fixed name → provider registry built once at startup.

use crate::config::AppConfig;
use crate::embedding::{
    AzureProvider, EmbeddingProvider, GeminiProvider, LocalProvider, OllamaProvider,
    ProviderMetadata,
};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps provider names to registered backend instances.
///
/// The set of names is fixed after construction; switching providers at
/// runtime only ever selects among the entries registered here.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn EmbeddingProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from configuration. The local fastembed backend is
    /// always registered; remote backends only when their section is present.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut registry = Self::new();

        let cache_dir = config
            .providers
            .local
            .cache_dir
            .clone()
            .unwrap_or_else(|| config.index.data_dir.join("models"));
        registry.register(Arc::new(LocalProvider::new(&cache_dir)?));

        if let Some(azure) = &config.providers.azure {
            registry.register(Arc::new(AzureProvider::new(azure)?));
        }
        if let Some(ollama) = &config.providers.ollama {
            registry.register(Arc::new(OllamaProvider::new(ollama)));
        }
        if let Some(gemini) = &config.providers.gemini {
            registry.register(Arc::new(GeminiProvider::new(gemini)?));
        }

        Ok(registry)
    }

    /// Register a backend under its metadata name.
    pub fn register(&mut self, provider: Arc<dyn EmbeddingProvider>) {
        let name = provider.metadata().name.to_lowercase();
        self.providers.insert(name, provider);
    }

    /// Look up a backend by name. Names are matched case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn EmbeddingProvider>> {
        self.providers.get(&name.trim().to_lowercase()).cloned()
    }

    /// Metadata for every registered backend, sorted by name.
    pub fn metadata(&self) -> Vec<ProviderMetadata> {
        let mut entries: Vec<ProviderMetadata> = self
            .providers
            .values()
            .map(|provider| provider.metadata().clone())
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}
