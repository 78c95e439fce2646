//! Top-K selection over scored tracks.
//!
//! The stage order is fixed:
//! 1. Language filter (only when the catalog has a language column)
//! 2. Popularity floor (only when the catalog has a popularity column)
//! 3. Stable sort by descending score, cut to the candidate window
//! 4. Title dedup, then artist dedup, first occurrence wins
//! 5. First `k` survivors

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{
    ArtistDedupFilter, LanguageFilter, MinimumPopularityFilter, RankWindowFilter, TitleDedupFilter,
};
use crate::scorer::ScoredTrack;
use data_loader::CatalogSchema;
use tracing::debug;

pub const DEFAULT_CANDIDATE_WINDOW: usize = 500;
pub const DEFAULT_MIN_POPULARITY: f32 = 20.0;
pub const DEFAULT_TOP_K: usize = 20;

/// Languages kept when the catalog has a language column
pub fn default_allowed_languages() -> Vec<String> {
    vec!["English".to_string(), "Korean".to_string()]
}

/// Settings for [`TopKSelector`]
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Apply the language filter (requires a language column)
    pub language_filter: bool,
    /// Apply the popularity floor (requires a popularity column)
    pub popularity_filter: bool,
    pub allowed_languages: Vec<String>,
    pub min_popularity: f32,
    pub candidate_window: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            language_filter: true,
            popularity_filter: true,
            allowed_languages: default_allowed_languages(),
            min_popularity: DEFAULT_MIN_POPULARITY,
            candidate_window: DEFAULT_CANDIDATE_WINDOW,
        }
    }
}

impl SelectionConfig {
    /// Enable each filter exactly when the catalog has its column
    pub fn from_schema(schema: &CatalogSchema) -> Self {
        Self {
            language_filter: schema.has_language,
            popularity_filter: schema.has_popularity,
            ..Self::default()
        }
    }

    pub fn with_allowed_languages(mut self, languages: Vec<String>) -> Self {
        self.allowed_languages = languages;
        self
    }

    pub fn with_min_popularity(mut self, min_popularity: f32) -> Self {
        self.min_popularity = min_popularity;
        self
    }

    pub fn with_candidate_window(mut self, window: usize) -> Self {
        self.candidate_window = window;
        self
    }
}

/// Runs the fixed selection pipeline.
pub struct TopKSelector {
    pipeline: FilterPipeline,
}

impl TopKSelector {
    pub fn new(config: SelectionConfig) -> Self {
        let mut pipeline = FilterPipeline::new();
        if config.language_filter {
            pipeline = pipeline.add_filter(LanguageFilter::new(config.allowed_languages));
        }
        if config.popularity_filter {
            pipeline = pipeline.add_filter(MinimumPopularityFilter::new(config.min_popularity));
        }
        let pipeline = pipeline
            .add_filter(RankWindowFilter::new(config.candidate_window))
            .add_filter(TitleDedupFilter)
            .add_filter(ArtistDedupFilter);

        debug!("Selection pipeline: {:?}", pipeline.filter_names());
        Self { pipeline }
    }

    /// The best `k` tracks, most relevant first. Returns fewer when fewer survive.
    pub fn select_top_k(&self, scored: Vec<ScoredTrack>, k: usize) -> Vec<ScoredTrack> {
        let mut selected = self.pipeline.apply(scored);
        selected.truncate(k);
        selected
    }
}
