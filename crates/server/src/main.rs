//! Simple test harness for the recommendation orchestrator.
//!
//! Loads the configured data, connects to the embedding provider and runs
//! one query end to end.
//!
//! Usage: `server [config.toml] [query]`

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use embedding_client::HttpEmbeddingClient;
use server::{RecommendRequest, RecommendationOrchestrator, RecommenderConfig};

const SAMPLE_QUERY: &str = "카페에서 공부할 때 듣기 좋은 음악";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,pipeline=debug")),
        )
        .init();

    info!("Starting moodmix test harness");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RecommenderConfig::load(Path::new(&path))
            .with_context(|| format!("Failed to load config {}", path))?,
        None => RecommenderConfig::default(),
    };
    let query = args.next().unwrap_or_else(|| SAMPLE_QUERY.to_string());

    let provider = HttpEmbeddingClient::from_env(
        config.http_embedding_config(),
        &config.embedding.api_key_env,
    )
    .context("Failed to set up embedding provider")?;

    info!("Loading corpus and catalog...");
    let orchestrator = RecommendationOrchestrator::load(&config, Arc::new(provider))
        .await
        .context("Failed to load recommender data")?;

    info!("Query: {}", query);
    let recommendations = orchestrator
        .handle(&RecommendRequest::new(query))
        .await
        .context("Recommendation failed")?;

    info!("Received {} recommendations:", recommendations.len());
    for (i, rec) in recommendations.iter().enumerate() {
        info!(
            "{}. {} - {} (score {:.3}, {}, popularity {})",
            i + 1,
            rec.track_name,
            rec.artist_name,
            rec.recommend_score,
            rec.language.as_deref().unwrap_or("?"),
            rec.popularity.map(|p| p.to_string()).unwrap_or_else(|| "?".to_string())
        );
    }

    Ok(())
}
