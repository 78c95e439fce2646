//! # Recommendation Orchestrator
//!
//! This module coordinates the entire recommendation pipeline:
//! 1. Validate the request
//! 2. Embed the query (the only network call)
//! 3. Compute per-feature similarities and pick the dominant directions
//! 4. Score every catalog track on those directions
//! 5. Filter, rank, dedup and cut to top-k
//!
//! Steps 3 to 5 are CPU-bound and run on the blocking pool via
//! `spawn_blocking`, using rayon inside. The corpus and catalog are loaded
//! once and shared through `Arc`; nothing mutates them afterwards, so the
//! orchestrator can be cloned into as many concurrent requests as needed.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use data_loader::{Catalog, ExemplarCorpus};
use embedding_client::EmbeddingProvider;
use pipeline::{ScoredTrack, TopKSelector, TrackScorer};
use resolver::{
    select_dominant, ExemplarMatch, FeatureDirection, FeatureDirectionResolver, FeatureExplanation,
    FeatureSimilarityMap, QueryEmbedding,
};

use crate::api::{DirectionInfo, ExplainedRecommendations, RecommendRequest, TrackInfo};
use crate::config::{RankingConfig, RecommenderConfig};
use crate::error::{RecommendError, Result};

/// Exemplar sentences shown per direction in explanations
const EXPLANATION_EXAMPLES: usize = 3;

/// How a query maps onto the feature space
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// (sim_high, sim_low) for every resolvable feature
    pub similarities: FeatureSimilarityMap,
    /// The directions that drive scoring, most relevant first
    pub directions: Vec<FeatureDirection>,
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    resolver: FeatureDirectionResolver,
    scorer: TrackScorer,
    selector: Arc<TopKSelector>,
    provider: Arc<dyn EmbeddingProvider>,
    catalog: Arc<Catalog>,
    ranking: RankingConfig,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over an already-loaded corpus and catalog.
    ///
    /// Filters are enabled from the catalog's schema: no language column,
    /// no language filter. Fails on ranking settings that would select no
    /// directions or candidates.
    pub fn new(
        corpus: Arc<ExemplarCorpus>,
        catalog: Arc<Catalog>,
        provider: Arc<dyn EmbeddingProvider>,
        ranking: RankingConfig,
    ) -> Result<Self> {
        ranking.validate()?;

        let resolver = FeatureDirectionResolver::new(corpus).with_top_n(ranking.top_n_exemplars);
        let scorer = TrackScorer::new(catalog.clone());
        let selector = Arc::new(TopKSelector::new(ranking.selection_config(catalog.schema())));

        info!(
            "Orchestrator ready: {} exemplars, {} tracks, provider {}",
            resolver.corpus().len(),
            catalog.len(),
            provider.name()
        );

        Ok(Self {
            resolver,
            scorer,
            selector,
            provider,
            catalog,
            ranking,
        })
    }

    /// Load the corpus and catalog named by `config` (in parallel) and build
    /// an orchestrator around them.
    ///
    /// Loading finishes before the orchestrator exists, so no request can
    /// observe a partly loaded data set.
    pub async fn load(
        config: &RecommenderConfig,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        config.ranking.validate()?;
        let start_time = Instant::now();

        let (corpus_result, catalog_result) = tokio::join!(
            tokio::task::spawn_blocking({
                let sentences = config.data.sentences_path.clone();
                let embeddings = config.data.embeddings_path.clone();
                move || ExemplarCorpus::load_from_files(&sentences, &embeddings)
            }),
            tokio::task::spawn_blocking({
                let catalog_path = config.data.catalog_path.clone();
                move || Catalog::load_from_file(&catalog_path)
            })
        );

        let corpus = corpus_result.map_err(|e| RecommendError::TaskFailed(e.to_string()))??;
        let catalog = catalog_result.map_err(|e| RecommendError::TaskFailed(e.to_string()))??;
        info!("Loaded corpus and catalog in {:.2?}", start_time.elapsed());

        Self::new(
            Arc::new(corpus),
            Arc::new(catalog),
            provider,
            config.ranking.clone(),
        )
    }

    pub fn corpus(&self) -> &ExemplarCorpus {
        self.resolver.corpus()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    /// Entry point: validate a request and return ranked tracks
    pub async fn handle(&self, request: &RecommendRequest) -> Result<Vec<TrackInfo>> {
        let top_k = request.top_k.unwrap_or(self.ranking.default_top_k);
        let recommendations = self.recommend(&request.query, top_k).await?;
        Ok(recommendations.iter().map(TrackInfo::from).collect())
    }

    /// Rank the catalog against `query` and return the best `top_k` tracks,
    /// most relevant first
    #[instrument(skip(self))]
    pub async fn recommend(&self, query: &str, top_k: usize) -> Result<Vec<ScoredTrack>> {
        let (_, tracks) = self.run(query, top_k).await?;
        Ok(tracks)
    }

    /// Like `recommend`, plus the directions used and the exemplars behind each
    #[instrument(skip(self))]
    pub async fn explain(&self, query: &str, top_k: usize) -> Result<ExplainedRecommendations> {
        let (explanations, tracks) = self.run(query, top_k).await?;
        Ok(ExplainedRecommendations {
            directions: explanations.iter().map(DirectionInfo::from).collect(),
            tracks: tracks.iter().map(TrackInfo::from).collect(),
        })
    }

    /// Per-feature similarities and the selected directions, without scoring
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &str) -> Result<Resolution> {
        let embedding = self.embed(query).await?;
        let resolver = self.resolver.clone();
        let limit = self.ranking.direction_limit;

        run_blocking(move || {
            let similarities = resolver.similarities(&embedding);
            let directions = select_dominant(&similarities, limit);
            Resolution {
                similarities,
                directions,
            }
        })
        .await
    }

    /// The `k` exemplar sentences closest to `query`, across all features
    #[instrument(skip(self))]
    pub async fn similar(&self, query: &str, k: usize) -> Result<Vec<ExemplarMatch>> {
        let embedding = self.embed(query).await?;
        let resolver = self.resolver.clone();

        run_blocking(move || resolver.nearest_exemplars(&embedding, k)).await
    }

    /// Full pipeline. Explanations are cheap next to scoring, so they are
    /// always computed and dropped by callers that don't need them.
    async fn run(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<(Vec<FeatureExplanation>, Vec<ScoredTrack>)> {
        // Start timing
        let start_time = Instant::now();

        let query = validate_query(query)?;
        if top_k == 0 {
            info!("top_k is 0, nothing to rank");
            return Ok((Vec::new(), Vec::new()));
        }

        let embedding = self.embed(query).await?;
        info!(
            "Embedded query ({} dims) in {:.2?}",
            embedding.dimension(),
            start_time.elapsed()
        );

        let resolver = self.resolver.clone();
        let scorer = self.scorer.clone();
        let selector = self.selector.clone();
        let limit = self.ranking.direction_limit;

        let (explanations, tracks) = run_blocking(move || {
            let similarities = resolver.similarities(&embedding);
            let directions = select_dominant(&similarities, limit);
            info!(
                "Resolved {} of {} features, scoring on {}",
                similarities.len(),
                data_loader::FeatureName::COUNT,
                describe(&directions)
            );

            let scored = scorer.score_all(&directions);
            info!("Scored {} tracks", scored.len());

            let tracks = selector.select_top_k(scored, top_k);
            info!("Selected {} recommendations (top_k {})", tracks.len(), top_k);

            let explanations = resolver.explain(&embedding, &directions, EXPLANATION_EXAMPLES);
            (explanations, tracks)
        })
        .await?;

        // Log total time
        info!("Total recommendation time: {:.2?}", start_time.elapsed());
        Ok((explanations, tracks))
    }

    async fn embed(&self, query: &str) -> Result<QueryEmbedding> {
        let query = validate_query(query)?;
        let embedding = self
            .resolver
            .embed_query(query, self.provider.as_ref())
            .await?;
        Ok(embedding)
    }
}

fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(RecommendError::InvalidRequest("query is empty".to_string()));
    }
    Ok(trimmed)
}

/// Run CPU-bound work on the blocking pool
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RecommendError::TaskFailed(e.to_string()))
}

fn describe(directions: &[FeatureDirection]) -> String {
    directions
        .iter()
        .map(|d| format!("{} {} ({:.3})", d.feature, d.polarity, d.relevance))
        .collect::<Vec<_>>()
        .join(", ")
}
