use anyhow::Context;
use cinesearch::api::{self, ApiState};
use cinesearch::catalog;
use cinesearch::config::AppConfig;
use cinesearch::embedding::ProviderRegistry;
use cinesearch::search::MovieSearch;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cinesearch", about = "Semantic movie search service")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    tokio::fs::create_dir_all(&config.index.data_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create data dir {}",
                config.index.data_dir.display()
            )
        })?;

    let data_dir = config.index.data_dir.to_string_lossy().into_owned();
    let connection = lancedb::connect(&data_dir)
        .execute()
        .await
        .map_err(|e| anyhow::anyhow!("failed to open vector store at {data_dir}: {e}"))?;

    let registry = Arc::new(ProviderRegistry::from_config(&config)?);
    let search = Arc::new(MovieSearch::new(
        connection,
        registry.clone(),
        catalog::builtin(),
        &config.providers.default,
    )?);
    tracing::info!(
        provider = %search.active_provider().await.name,
        "orchestrator ready"
    );

    let state = Arc::new(ApiState::new(search, registry));
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let handle = api::start_http_server(config.server.bind, state, shutdown_rx).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    let _ = shutdown_tx.send(true);
    handle.await?;

    Ok(())
}
