mod config;
mod errors;
mod generation;
mod intake;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::pdf::ChromiumPdfRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Report API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(&config.deepseek_base_url, config.llm_timeout)?;
    info!(
        "LLM client initialized (model: {}, base: {})",
        llm_client::MODEL,
        config.deepseek_base_url
    );
    if config.deepseek_api_key.is_none() {
        if config.allow_client_api_key {
            warn!("DEEPSEEK_API_KEY not set; generation requires a caller-supplied apiKey");
        } else {
            warn!("DEEPSEEK_API_KEY not set and caller keys disallowed; generation will fail");
        }
    }

    // Initialize PDF renderer (one browser per export)
    let pdf = ChromiumPdfRenderer::new(config.chrome_path.clone(), config.pdf_timeout);
    info!(
        "PDF renderer initialized (chrome: {}, timeout: {}s)",
        config
            .chrome_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "auto-detect".to_string()),
        config.pdf_timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        pdf: Arc::new(pdf),
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
