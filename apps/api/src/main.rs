mod config;
mod errors;
mod jobs;
mod matching;
mod models;
mod nlp;
mod pipeline;
mod routes;
mod sources;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::nlp::{EmbeddingLanguageModel, LanguageModel, LexicalModel};
use crate::routes::build_router;
use crate::sources::page_scraper::HttpPageScraper;
use crate::sources::search::DuckDuckGoSearch;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobScout v{}", env!("CARGO_PKG_VERSION"));

    // The model is loaded once; without it nothing can be scored.
    let model: Arc<dyn LanguageModel> = match &config.word_vectors_path {
        Some(path) => Arc::new(LexicalModel::load(path).context("Failed to load word vectors")?),
        None => Arc::new(
            EmbeddingLanguageModel::load(&config.embedding_model, config.model_cache_dir.as_deref())
                .context("Failed to load embedding model")?,
        ),
    };
    info!("Language model loaded ({}, {} dims)", model.name(), model.dims());

    let search = DuckDuckGoSearch::new(config.search_endpoint.clone(), config.fetch_timeout)
        .context("Failed to build search client")?;
    let scraper =
        HttpPageScraper::new(config.fetch_timeout).context("Failed to build page scraper")?;
    info!(
        "Job boards: {} (max {} results each, {} day window)",
        config.job_boards.join(", "),
        config.max_results_per_board,
        config.days_threshold
    );

    let state = AppState::new(config.clone(), model, Arc::new(search), Arc::new(scraper));

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
