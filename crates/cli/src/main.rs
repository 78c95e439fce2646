use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Catalog, ExemplarCorpus, FeatureName, Polarity};
use embedding_client::HttpEmbeddingClient;
use rand::seq::IndexedRandom;
use server::{
    DirectionInfo, RecommendRequest, RecommendationOrchestrator, RecommenderConfig, TrackInfo,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// moodmix - mood-based music recommendations
#[derive(Parser)]
#[command(name = "moodmix")]
#[command(about = "Recommend tracks for a free-text mood or situation", long_about = None)]
struct Cli {
    /// TOML config file (defaults are used when absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the corpus and catalog files (overrides the config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend tracks for a query
    Recommend {
        /// What you want to listen to, in any language
        #[arg(long)]
        query: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Show the feature directions and the exemplars behind them
        #[arg(long)]
        explain: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show how a query maps onto the audio features
    Resolve {
        #[arg(long)]
        query: String,
    },

    /// Find the exemplar sentences closest to a query
    Similar {
        #[arg(long)]
        query: String,

        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Summarize the exemplar corpus and the catalog
    Stats,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            query,
            limit,
            explain,
            json,
        } => handle_recommend(&config, query, limit, explain, json).await?,
        Commands::Resolve { query } => handle_resolve(&config, query).await?,
        Commands::Similar { query, limit } => handle_similar(&config, query, limit).await?,
        Commands::Stats => handle_stats(&config)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&config, requests, concurrent).await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<RecommenderConfig> {
    let config = match &cli.config {
        Some(path) => RecommenderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RecommenderConfig::default(),
    };
    Ok(match &cli.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    })
}

/// Load data and connect the embedding provider
async fn build_orchestrator(config: &RecommenderConfig) -> Result<RecommendationOrchestrator> {
    let provider = HttpEmbeddingClient::from_env(
        config.http_embedding_config(),
        &config.embedding.api_key_env,
    )
    .context("Failed to set up embedding provider")?;

    println!(
        "Loading corpus and catalog from {}...",
        config
            .data
            .catalog_path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );
    let start = Instant::now();
    let orchestrator = RecommendationOrchestrator::load(config, Arc::new(provider))
        .await
        .context("Failed to load recommender data")?;
    println!("{} Loaded data in {:?}", "✓".green(), start.elapsed());

    Ok(orchestrator)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    config: &RecommenderConfig,
    query: String,
    limit: usize,
    explain: bool,
    json: bool,
) -> Result<()> {
    let orchestrator = build_orchestrator(config).await?;

    if explain {
        let explained = orchestrator.explain(&query, limit).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&explained)?);
        } else {
            print_directions(&explained.directions);
            print_recommendations(&explained.tracks);
        }
        return Ok(());
    }

    let request = RecommendRequest::new(query).with_top_k(limit);
    let tracks = orchestrator.handle(&request).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tracks)?);
    } else {
        print_recommendations(&tracks);
    }
    Ok(())
}

/// Handle the 'resolve' command
async fn handle_resolve(config: &RecommenderConfig, query: String) -> Result<()> {
    let orchestrator = build_orchestrator(config).await?;
    let resolution = orchestrator.resolve(&query).await?;

    println!("{}", format!("Feature similarities for '{}':", query).bold().blue());
    for feature in FeatureName::ALL {
        match resolution.similarities.get(&feature) {
            Some(sim) => {
                let (polarity, _) = sim.dominant();
                println!(
                    "  {:<17} high {:>7.4}  low {:>7.4}  -> {}",
                    feature.as_str(),
                    sim.high,
                    sim.low,
                    colored_polarity(polarity)
                );
            }
            None => println!("  {:<17} {}", feature.as_str(), "no exemplar data".dimmed()),
        }
    }

    println!("{}", "Selected directions:".bold().blue());
    for (i, direction) in resolution.directions.iter().enumerate() {
        println!(
            "{}. {} {} (relevance {:.4})",
            (i + 1).to_string().green(),
            direction.feature,
            colored_polarity(direction.polarity),
            direction.relevance
        );
    }
    Ok(())
}

/// Handle the 'similar' command
async fn handle_similar(config: &RecommenderConfig, query: String, limit: usize) -> Result<()> {
    let orchestrator = build_orchestrator(config).await?;
    let matches = orchestrator.similar(&query, limit).await?;

    println!("{}", format!("Exemplars closest to '{}':", query).bold().blue());
    for (i, m) in matches.iter().enumerate() {
        println!(
            "{}. [{:.4}] {}_{}: {}",
            (i + 1).to_string().green(),
            m.similarity,
            m.feature,
            m.polarity,
            m.text
        );
    }
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(config: &RecommenderConfig) -> Result<()> {
    let corpus = ExemplarCorpus::load_from_files(
        &config.data.sentences_path,
        &config.data.embeddings_path,
    )
    .context("Failed to load exemplar corpus")?;
    let catalog =
        Catalog::load_from_file(&config.data.catalog_path).context("Failed to load catalog")?;

    println!("{}", "Exemplar corpus:".bold().blue());
    println!("{}Sentences: {}", "• ".green(), corpus.len());
    println!(
        "{}Embedding dimension: {}",
        "• ".green(),
        corpus
            .dimension()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    for stats in corpus.stats() {
        println!("  - {}_{}: {}", stats.feature, stats.polarity, stats.count);
    }
    let unresolvable: Vec<&str> = FeatureName::ALL
        .into_iter()
        .filter(|f| !corpus.is_resolvable(*f))
        .map(|f| f.as_str())
        .collect();
    if !unresolvable.is_empty() {
        println!("{}Skipped features: {}", "• ".yellow(), unresolvable.join(", "));
    }

    let schema = catalog.schema();
    println!("{}", "Track catalog:".bold().blue());
    println!("{}Tracks: {}", "• ".cyan(), catalog.len());
    println!("{}Language column: {}", "• ".cyan(), yes_no(schema.has_language));
    println!("{}Popularity column: {}", "• ".cyan(), yes_no(schema.has_popularity));
    println!("{}URI column: {}", "• ".cyan(), yes_no(schema.has_uri));
    println!(
        "{}Feature columns: {}/{}",
        "• ".cyan(),
        schema.feature_columns.len(),
        FeatureName::COUNT
    );
    println!("{}Unparsable numeric values: {}", "• ".cyan(), catalog.malformed_values());

    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    config: &RecommenderConfig,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("--requests and --concurrent must both be at least 1");
    }
    let orchestrator = build_orchestrator(config).await?;

    // Exemplar sentences make realistic queries
    let sentences: Vec<String> = orchestrator.corpus().iter().map(|e| e.text.clone()).collect();
    if sentences.is_empty() {
        bail!("Exemplar corpus is empty; nothing to sample queries from");
    }
    let queries: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| sentences.choose(&mut rng).cloned())
            .collect()
    };

    // Use tokio::spawn to make concurrent requests, bounded by a semaphore
    let limiter = Arc::new(Semaphore::new(concurrent));
    let wall_clock = Instant::now();
    let mut handles = vec![];
    let top_k = orchestrator.ranking().default_top_k;
    for query in queries {
        let orchestrator = orchestrator.clone();
        let limiter = limiter.clone();
        let handle = tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await?;
            let start = Instant::now();
            orchestrator.recommend(&query, top_k).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = vec![];
    let mut failures = 0usize;
    for handle in handles {
        match handle.await? {
            Ok(elapsed) => timings.push(elapsed),
            Err(e) => {
                debug!("Benchmark request failed: {:#}", e);
                failures += 1;
            }
        }
    }
    let wall_time = wall_clock.elapsed();

    if timings.is_empty() {
        bail!("All {} benchmark requests failed", failures);
    }

    let total_latency: Duration = timings.iter().sum();
    let avg_latency = total_latency / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ok, {} failed", timings.len(), failures);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn colored_polarity(polarity: Polarity) -> colored::ColoredString {
    match polarity {
        Polarity::High => polarity.as_str().red(),
        Polarity::Low => polarity.as_str().cyan(),
    }
}

fn yes_no(present: bool) -> colored::ColoredString {
    if present {
        "yes".green()
    } else {
        "no".yellow()
    }
}

/// Print the directions that drove scoring
fn print_directions(directions: &[DirectionInfo]) {
    println!("{}", "Feature directions:".bold().blue());
    for direction in directions {
        println!(
            "  {} {} (relevance {:.4})",
            direction.feature,
            colored_polarity(direction.polarity),
            direction.relevance
        );
        for example in &direction.examples {
            println!("     [{:.4}] {}", example.similarity, example.sentence.dimmed());
        }
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(tracks: &[TrackInfo]) {
    println!("{}", "Recommendations:".bold().blue());
    if tracks.is_empty() {
        println!("  (no tracks matched)");
        return;
    }
    for (i, track) in tracks.iter().enumerate() {
        println!(
            "{}. {} - {} [{}] - Score: {:.3}",
            (i + 1).to_string().green(),
            track.track_name,
            track.artist_name,
            track.language.as_deref().unwrap_or("?"),
            track.recommend_score
        );
        if let Some(uri) = &track.track_uri {
            println!("   {}", uri.dimmed());
        }
    }
}
