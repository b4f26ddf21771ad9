mod config;
mod embedding;
mod errors;
mod llm_client;
mod matching;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::build_embedder;
use crate::llm_client::OpenAiClient;
use crate::matching::ranker::Ranker;
use crate::matching::summarizer::{SummarySettings, Summarizer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing API key stops the process here.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting candidate recommender v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by embeddings and summaries
    let client = OpenAiClient::new(config.openai_api_key.clone(), &config.openai_base_url)?
        .with_retry_policy(config.llm_max_retries, Duration::from_secs(1));
    info!(
        "OpenAI client initialized (embedding model: {}, summary model: {})",
        config.embedding_model, config.summary_model
    );

    let embedder = build_embedder(&config, client.clone());
    let ranker = Ranker::new(embedder, config.rank_concurrency);
    let summarizer = Summarizer::new(Arc::new(client), SummarySettings::from(&config));

    let state = AppState {
        config: config.clone(),
        ranker: Arc::new(ranker),
        summarizer: Arc::new(summarizer),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
