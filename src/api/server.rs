//! HTTP server setup: router and API routes.

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::state::ApiState;
use super::{movies, providers};

/// Start the HTTP server on the given address.
///
/// Returns a handle that resolves when the server shuts down. The caller
/// passes a `tokio::sync::watch::Receiver<bool>` for graceful shutdown.
pub async fn start_http_server(
    bind: SocketAddr,
    state: Arc<ApiState>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/providers", get(providers::get_providers))
        .route("/movies/search", get(movies::search))
        .route("/movies/refresh", post(movies::refresh))
        .route("/movies/switch/{provider}", post(movies::switch_provider));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "HTTP server listening");

    let handle = tokio::spawn(async move {
        let mut shutdown = shutdown_rx;
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|v| *v).await;
            })
            .await
            .ok();
    });

    Ok(handle)
}

// -- Liveness handlers --

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn status(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    let uptime = state.started_at.elapsed();
    let active = state.search.active_provider().await;
    Json(serde_json::json!({
        "status": "running",
        "pid": std::process::id(),
        "uptime_seconds": uptime.as_secs(),
        "provider": active.name,
        "initialized": state.search.is_initialized().await,
        "indexed_movies": state.search.indexed_count().await,
    }))
}
