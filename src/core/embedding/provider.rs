//! Embedding Provider Module
//!
//! Defines the EmbeddingProvider trait, its error type and the provider
//! configuration block.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hashing::HashingEmbeddings;
use super::ollama::OllamaEmbeddings;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, EmbeddingError>;

// ============================================================================
// Embedding Configuration
// ============================================================================

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";

/// Configuration for embedding providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider type: "ollama" or "hashing"
    pub provider: String,
    /// Model name for embeddings (Ollama only)
    pub model: String,
    /// API endpoint (Ollama only)
    pub endpoint: Option<String>,
    /// Embedding dimensions; inferred from the model when unset
    pub dimensions: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            endpoint: Some(DEFAULT_OLLAMA_ENDPOINT.to_string()),
            dimensions: None,
        }
    }
}

// ============================================================================
// Embedding Provider Trait
// ============================================================================

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, one vector per input, in order
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get provider name
    fn name(&self) -> &str;

    /// Check if provider is healthy/available
    async fn health_check(&self) -> bool;
}

/// Build the provider named by `config.provider`.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.trim().to_lowercase().as_str() {
        "ollama" => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                EmbeddingError::NotConfigured("ollama provider requires an endpoint".to_string())
            })?;
            Ok(Box::new(OllamaEmbeddings::new(
                endpoint,
                &config.model,
                config.dimensions,
            )))
        }
        "hashing" => Ok(Box::new(HashingEmbeddings::new(
            config.dimensions.unwrap_or(HashingEmbeddings::DEFAULT_DIMENSIONS),
        ))),
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider '{other}'"
        ))),
    }
}
