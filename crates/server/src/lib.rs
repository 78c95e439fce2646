//! Server crate for the moodmix recommender.
//!
//! This crate contains the orchestrator that coordinates all components
//! of the recommendation pipeline, its configuration, and the typed
//! request/response contract callers program against.

pub mod api;
pub mod config;
pub mod error;
pub mod orchestrator;

pub use api::{DirectionInfo, ExemplarInfo, ExplainedRecommendations, RecommendRequest, TrackInfo};
pub use config::{ConfigError, DataConfig, EmbeddingConfig, RankingConfig, RecommenderConfig};
pub use error::RecommendError;
pub use orchestrator::{RecommendationOrchestrator, Resolution};
