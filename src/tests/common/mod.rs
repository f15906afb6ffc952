//! Common Test Utilities
//!
//! Shared fixtures and a deterministic embedding provider used across the
//! unit and property tests.

pub mod fixtures;

pub use fixtures::*;

use async_trait::async_trait;

use crate::core::embedding::{EmbeddingProvider, Result};

/// Embeds text as a keyword presence vector.
///
/// Component `i` is 1.0 when the lowercased text contains keyword `i`.
/// Exact-text overrides return a fixed vector instead.
#[derive(Debug, Clone, Default)]
pub struct KeywordEmbeddings {
    keywords: Vec<String>,
    overrides: Vec<(String, Vec<f32>)>,
}

impl KeywordEmbeddings {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.overrides.push((text.to_string(), vector));
        self
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        if let Some((_, v)) = self.overrides.iter().find(|(t, _)| t == text) {
            return v.clone();
        }
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .map(|k| if lower.contains(k.as_str()) { 1.0 } else { 0.0 })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.keywords.len()
    }

    fn name(&self) -> &str {
        "keyword"
    }

    async fn health_check(&self) -> bool {
        true
    }
}
