//! Ollama Embeddings Provider
//!
//! Generates embeddings using a local Ollama instance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::{EmbeddingError, EmbeddingProvider, Result};

// ============================================================================
// Ollama API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct OllamaBatchEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct OllamaBatchEmbeddingResponse {
    embeddings: Vec<Vec<f32>>,
}

// ============================================================================
// Ollama Provider
// ============================================================================

/// Ollama-based embedding provider for local embeddings
pub struct OllamaEmbeddings {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbeddings {
    /// Create a new Ollama embeddings provider
    ///
    /// # Arguments
    /// * `base_url` - Ollama API endpoint (e.g., "http://localhost:11434")
    /// * `model` - Model name (e.g., "nomic-embed-text", "all-minilm")
    /// * `dimensions` - Expected embedding dimensions (None to infer from the model)
    pub fn new(base_url: &str, model: &str, dimensions: Option<usize>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dimensions: dimensions.unwrap_or_else(|| Self::model_dimensions(model)),
        }
    }

    /// Get dimensions for common Ollama embedding models
    fn model_dimensions(model: &str) -> usize {
        match model {
            "nomic-embed-text" => 768,
            "mxbai-embed-large" => 1024,
            "all-minilm" => 384,
            "snowflake-arctic-embed" => 1024,
            _ => 768,
        }
    }

    async fn embed_sequential(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let request = OllamaEmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiError(format!(
                "Ollama API error {}: {}",
                status, error_text
            )));
        }

        let result: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        Ok(result.embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Batch endpoint on recent Ollama; older servers only have /api/embeddings
        let url = format!("{}/api/embed", self.base_url);
        let request = OllamaBatchEmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        match self.client.post(&url).json(&request).send().await {
            Ok(resp) if resp.status().is_success() => {
                let result: OllamaBatchEmbeddingResponse = resp
                    .json()
                    .await
                    .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;
                if result.embeddings.len() != texts.len() {
                    return Err(EmbeddingError::InvalidResponse(format!(
                        "expected {} embeddings, got {}",
                        texts.len(),
                        result.embeddings.len()
                    )));
                }
                Ok(result.embeddings)
            }
            Ok(resp) => {
                log::debug!(
                    "Ollama batch endpoint returned {}; embedding sequentially",
                    resp.status()
                );
                self.embed_sequential(texts).await
            }
            Err(e) => {
                log::debug!("Ollama batch request failed ({e}); embedding sequentially");
                self.embed_sequential(texts).await
            }
        }
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
