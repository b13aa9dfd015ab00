//! The HTTP surface: one generate route, the workflow catalog, and a health
//! probe. Handlers are stateless; concurrent requests share nothing but the
//! configuration and the outbound HTTP client.

mod generate;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};

use crate::config::Config;
use crate::features::{FEATURES, Feature};
use crate::generation::GenerationError;

pub use generate::GenerateResponse;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    http_client: reqwest::Client,
}

impl AppState {
    /// Builds the shared outbound client with the configured timeout.
    pub fn new(config: Config) -> Result<Self, GenerationError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate::generate))
        .route("/api/features", get(features))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves the router until ctrl-c.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let addr = state.config.addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}

async fn features() -> Json<&'static [Feature]> {
    Json(FEATURES)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
