//! The search orchestrator: provider selection, lazy index builds, queries.

use crate::catalog::Movie;
use crate::embedding::{EmbeddingProvider, ProviderMetadata, ProviderRegistry};
use crate::error::{Error, Result};
use crate::search::models::{IndexedMovie, MovieMatch, SearchOptions};
use crate::search::table::MovieTable;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mutable orchestrator state. Guarded by a single mutex; held only for
/// snapshots and commits, never across a provider or index call.
struct OrchestratorState {
    provider: Arc<dyn EmbeddingProvider>,
    initialized: bool,
}

/// Orchestrates embedding providers and the vector index behind a uniform
/// search/refresh/switch interface.
///
/// The index is built lazily: the first search after startup (or after a
/// provider switch) pays the cost of re-embedding the whole catalog. Rebuilds
/// are serialized; a request arriving while one is in flight waits for it and
/// coalesces into the finished build instead of starting a second one.
pub struct MovieSearch {
    connection: lancedb::Connection,
    registry: Arc<ProviderRegistry>,
    catalog: Vec<Movie>,
    state: Mutex<OrchestratorState>,
    rebuild_lock: Mutex<()>,
}

impl MovieSearch {
    /// Create the orchestrator with `default_provider` active and the index
    /// not yet built.
    pub fn new(
        connection: lancedb::Connection,
        registry: Arc<ProviderRegistry>,
        catalog: Vec<Movie>,
        default_provider: &str,
    ) -> Result<Self> {
        let provider = registry.lookup(default_provider).ok_or_else(|| {
            Error::Config(format!(
                "default provider '{default_provider}' is not registered"
            ))
        })?;

        Ok(Self {
            connection,
            registry,
            catalog,
            state: Mutex::new(OrchestratorState {
                provider,
                initialized: false,
            }),
            rebuild_lock: Mutex::new(()),
        })
    }

    /// Search the catalog by semantic similarity.
    ///
    /// A blank or whitespace-only query returns no results without touching
    /// the provider or the index; that is a success, not an error. `top`
    /// values below 1 are clamped to 1. Results come back in the ranking
    /// order produced by the index, closest first.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<MovieMatch>> {
        let query = query.trim();
        if query.is_empty() || self.catalog.is_empty() {
            return Ok(Vec::new());
        }

        if !self.is_initialized().await {
            self.rebuild_index(true).await?;
        }

        let provider = self.state.lock().await.provider.clone();
        let embedding = provider.embed(query).await?;

        let table = MovieTable::open(&self.connection).await?;
        table
            .nearest(&embedding, options.top.max(1), options.skip)
            .await
    }

    /// Rebuild the entire index from the catalog through the active provider.
    ///
    /// Every call re-embeds every movie; the previous table generation is
    /// dropped, never merged into. `initialized` flips to true only after
    /// the full rebuild lands, so a failure part-way leaves the orchestrator
    /// uninitialized and the next call starts over. Returns `false` when a
    /// concurrent provider switch superseded this generation before it could
    /// be committed.
    pub async fn refresh(&self) -> Result<bool> {
        self.rebuild_index(false).await
    }

    /// Activate the named provider and rebuild the index with it.
    ///
    /// Vectors from different providers are not comparable (dimension and
    /// embedding space differ), so a successful switch always pays a full
    /// reindex before returning `true`. An unregistered name returns `false`
    /// and mutates nothing.
    pub async fn switch_provider(&self, name: &str) -> Result<bool> {
        let Some(provider) = self.registry.lookup(name) else {
            tracing::warn!(provider = name, "provider is not registered");
            return Ok(false);
        };

        {
            let mut state = self.state.lock().await;
            state.provider = provider;
            state.initialized = false;
        }
        tracing::info!(provider = name, "switched embedding provider");

        self.rebuild_index(false).await
    }

    /// Metadata of the currently active provider.
    pub async fn active_provider(&self) -> ProviderMetadata {
        self.state.lock().await.provider.metadata().clone()
    }

    /// Whether the index has been built for the active provider.
    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.initialized
    }

    /// Number of rows in the current index generation; 0 before the first
    /// build.
    pub async fn indexed_count(&self) -> usize {
        match MovieTable::open(&self.connection).await {
            Ok(table) => table.count().await.unwrap_or(0),
            Err(_) => 0,
        }
    }

    /// Serialized full rebuild. With `only_if_uninitialized`, a caller that
    /// was waiting behind an in-flight rebuild skips its own once the flag
    /// is set, which is what coalesces concurrent cold searches into one
    /// build.
    async fn rebuild_index(&self, only_if_uninitialized: bool) -> Result<bool> {
        let _rebuild = self.rebuild_lock.lock().await;

        let provider = {
            let state = self.state.lock().await;
            if only_if_uninitialized && state.initialized {
                return Ok(true);
            }
            state.provider.clone()
        };

        let meta = provider.metadata().clone();
        tracing::info!(provider = %meta.name, model = %meta.model, "rebuilding movie index");

        let mut rows = Vec::with_capacity(self.catalog.len());
        for movie in &self.catalog {
            let vector = provider.embed(&movie.description).await?;
            rows.push(IndexedMovie {
                key: movie.key,
                title: movie.title.clone(),
                description: movie.description.clone(),
                provider: meta.name.clone(),
                vector,
            });
        }

        if !rows.is_empty() {
            let table = MovieTable::rebuild(&self.connection, &rows).await?;
            tracing::info!(
                indexed = rows.len(),
                dimension = table.dim(),
                provider = %meta.name,
                "movie index rebuilt"
            );
        }

        let mut state = self.state.lock().await;
        if Arc::ptr_eq(&state.provider, &provider) {
            state.initialized = true;
            Ok(true)
        } else {
            // A switch landed while this rebuild was embedding. Its own
            // rebuild is queued behind the lock and supersedes this
            // generation, so the flag stays down.
            Ok(false)
        }
    }
}
