//! Errors surfaced by the recommendation entry point.

use data_loader::DataLoadError;
use embedding_client::EmbeddingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Why a recommendation request failed.
///
/// A failure is never turned into an empty result: an empty list always
/// means nothing matched.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// Corpus or catalog missing, unreadable or malformed
    #[error("Data unavailable: {0}")]
    DataUnavailable(#[from] DataLoadError),

    /// The query could not be embedded
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(#[from] EmbeddingError),

    /// Ranking settings that could only produce an unranked list
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A scoring task panicked or was cancelled
    #[error("Recommendation task failed: {0}")]
    TaskFailed(String),
}

impl RecommendError {
    /// True when the embedding provider, not this service, is at fault
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, RecommendError::EmbeddingUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
