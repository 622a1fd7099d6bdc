mod analytics;
mod ats;
mod config;
mod decode;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod models;
mod render;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::decode::PdftoppmDecoder;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::{spawn_expiry_sweeper, SessionStore};
use crate::state::AppState;

const SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.google_api_key.clone(), config.gemini_model.clone());
    info!("LLM client initialized (model: {})", llm.model());

    let decoder = PdftoppmDecoder::new(&config.pdftoppm_path, config.preview_dpi);
    info!(
        "Preview decoder: {} at {} dpi",
        config.pdftoppm_path, config.preview_dpi
    );

    let sessions = SessionStore::new(config.session_ttl);
    spawn_expiry_sweeper(sessions.clone(), SWEEP_PERIOD);
    info!("Sessions expire after {}s idle", config.session_ttl.as_secs());

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        decoder: Arc::new(decoder),
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
