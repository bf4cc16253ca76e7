mod config;
mod errors;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::settings::EngineSettings;
use crate::matching::MatchEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ranking API v{}", env!("CARGO_PKG_VERSION"));

    // Engine settings are validated once here; a bad file stops startup.
    let settings = match &config.settings_path {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("Failed to load engine settings from {}", path.display()))?,
        None => {
            info!("RANKER_SETTINGS_PATH not set; using built-in engine settings");
            EngineSettings::default()
        }
    };
    let engine = MatchEngine::new(settings).context("Invalid engine settings")?;
    info!(
        "Match engine ready (inclusion floor {}, top_k {}, max candidates {})",
        engine.settings().inclusion_floor,
        engine.settings().default_top_k,
        engine.settings().max_candidates
    );

    let state = AppState {
        config: config.clone(),
        engine: Arc::new(engine),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
