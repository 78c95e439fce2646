//! Embedding client for turning query text into vectors.
//!
//! This crate provides the one boundary in the recommender that performs
//! network I/O. It handles:
//! - The `EmbeddingProvider` trait the orchestrator is constructed with
//! - An HTTP client for OpenAI-compatible `/embeddings` endpoints
//!   (Upstage Solar `embedding-passage` by default)
//! - Typed errors so callers can tell a provider failure from an empty result
//!
//! Timeouts live here, on the HTTP client. Retries are left to whoever wires
//! the provider in.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur when asking for an embedding
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Failed to reach embedding provider: {0}")]
    ConnectionError(String),

    #[error("Embedding provider returned status {status}: {message}")]
    ProviderError { status: u16, message: String },

    #[error("Invalid response from embedding provider: {0}")]
    InvalidResponse(String),

    #[error("Embedding provider returned an empty embedding")]
    EmptyEmbedding,

    #[error("Query embedding has dimension {found}, corpus expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Anything that can embed a piece of text.
///
/// Implementations must never fabricate a vector: an empty or failed
/// response is an error.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the name of this provider (for logging/debugging)
    fn name(&self) -> &str;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Settings for [`HttpEmbeddingClient`]
#[derive(Debug, Clone)]
pub struct HttpEmbeddingConfig {
    /// Base URL of the API, e.g. `https://api.upstage.ai/v1`
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for HttpEmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.upstage.ai/v1".to_string(),
            model: "embedding-passage".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible embeddings endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbeddingClient {
    /// Build a client from explicit settings.
    ///
    /// No request is made here; the first call to `embed` is the first
    /// contact with the provider.
    pub fn new(config: HttpEmbeddingConfig) -> Result<Self, EmbeddingError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::ConnectionError(e.to_string()))?;

        let endpoint = format!("{}/embeddings", config.base_url.trim_end_matches('/'));
        info!("Embedding provider at {} (model {})", endpoint, config.model);

        Ok(Self {
            http,
            endpoint,
            model: config.model,
            api_key: config.api_key,
        })
    }

    /// Build a client whose API key is read from the environment variable `api_key_env`
    pub fn from_env(mut config: HttpEmbeddingConfig, api_key_env: &str) -> Result<Self, EmbeddingError> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| EmbeddingError::MissingApiKey(api_key_env.to_string()))?;
        config.api_key = Some(api_key);
        Self::new(config)
    }

    /// Get the embeddings URL this client posts to.
    pub fn service_address(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    fn name(&self) -> &str {
        "HttpEmbeddingClient"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!("Embedding {} chars with model {}", text.chars().count(), self.model);

        let mut request = self.http.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: [text],
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!("Embedding request failed: {}", e);
            EmbeddingError::ConnectionError(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Embedding provider returned {}: {}", status, message);
            return Err(EmbeddingError::ProviderError {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .unwrap_or_default();

        if embedding.is_empty() {
            error!("Embedding provider returned no vector");
            return Err(EmbeddingError::EmptyEmbedding);
        }
        Ok(embedding)
    }
}
