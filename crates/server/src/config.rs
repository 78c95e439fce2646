//! Recommender configuration.
//!
//! Loaded from TOML; every field has a default, so an empty file (or no
//! file at all) gives a working setup against `data/`.
//!
//! ```toml
//! [data]
//! catalog_path = "data/spotify_tracknames_updated.csv"
//!
//! [embedding]
//! model = "embedding-passage"
//!
//! [ranking]
//! min_popularity = 30.0
//! ```

use data_loader::CatalogSchema;
use embedding_client::HttpEmbeddingConfig;
use pipeline::SelectionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors reading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A setting that would leave nothing to rank
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub data: DataConfig,
    pub embedding: EmbeddingConfig,
    pub ranking: RankingConfig,
}

/// Where the corpus and catalog live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub sentences_path: PathBuf,
    pub embeddings_path: PathBuf,
    pub catalog_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sentences_path: PathBuf::from("data/example_sentences.json"),
            embeddings_path: PathBuf::from("data/feature_embeddings.json"),
            catalog_path: PathBuf::from("data/spotify_tracknames_updated.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let client = HttpEmbeddingConfig::default();
        Self {
            base_url: client.base_url,
            model: client.model,
            api_key_env: "UPSTAGE_API_KEY".to_string(),
            timeout_secs: client.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Exemplar similarities averaged per polarity
    pub top_n_exemplars: usize,
    /// Feature directions used for scoring
    pub direction_limit: usize,
    /// Ranked tracks considered for dedup
    pub candidate_window: usize,
    pub min_popularity: f32,
    pub allowed_languages: Vec<String>,
    pub default_top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        let selection = SelectionConfig::default();
        Self {
            top_n_exemplars: resolver::DEFAULT_TOP_N,
            direction_limit: resolver::DEFAULT_DIRECTION_LIMIT,
            candidate_window: selection.candidate_window,
            min_popularity: selection.min_popularity,
            allowed_languages: selection.allowed_languages,
            default_top_k: pipeline::selection::DEFAULT_TOP_K,
        }
    }
}

impl RankingConfig {
    /// Reject settings under which no direction or candidate can survive.
    ///
    /// `default_top_k = 0` is allowed: it asks for an empty list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let must_be_positive = [
            ("ranking.top_n_exemplars", self.top_n_exemplars),
            ("ranking.direction_limit", self.direction_limit),
            ("ranking.candidate_window", self.candidate_window),
        ];
        for (field, value) in must_be_positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Selection settings for a catalog with the given columns
    pub fn selection_config(&self, schema: &CatalogSchema) -> SelectionConfig {
        SelectionConfig::from_schema(schema)
            .with_allowed_languages(self.allowed_languages.clone())
            .with_min_popularity(self.min_popularity)
            .with_candidate_window(self.candidate_window)
    }
}

impl RecommenderConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.ranking.validate()?;
        Ok(config)
    }

    /// Point the three data files at `dir`, keeping their file names
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        let rebase = |path: &PathBuf| match path.file_name() {
            Some(name) => dir.join(name),
            None => dir.to_path_buf(),
        };
        self.data = DataConfig {
            sentences_path: rebase(&self.data.sentences_path),
            embeddings_path: rebase(&self.data.embeddings_path),
            catalog_path: rebase(&self.data.catalog_path),
        };
        self
    }

    /// HTTP client settings; the API key is filled in from the environment
    /// by `HttpEmbeddingClient::from_env`
    pub fn http_embedding_config(&self) -> HttpEmbeddingConfig {
        HttpEmbeddingConfig {
            base_url: self.embedding.base_url.clone(),
            model: self.embedding.model.clone(),
            api_key: None,
            timeout: Duration::from_secs(self.embedding.timeout_secs),
        }
    }
}
