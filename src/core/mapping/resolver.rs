//! Embedding similarity resolver.
//!
//! Trope catalogs carry a free-text `parent_archetype` hint that rarely
//! matches a canonical archetype id. The resolver embeds a descriptor for
//! every parent and every trope, then assigns each trope to the parent with
//! the highest cosine similarity.

use serde::{Deserialize, Serialize};

use super::error::{MappingError, Result};
use super::table::{MappingRow, MappingTable};
use crate::core::catalog::{ArchetypeParent, TropeChild};
use crate::core::embedding::{EmbeddingError, EmbeddingProvider};

/// Similarity below which a resolution is flagged for review.
pub const DEFAULT_MAPPING_THRESHOLD: f64 = 0.35;

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Stand-in for tropes whose descriptor would otherwise be empty.
const EMPTY_DESCRIPTOR: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub threshold: f64,
    /// Tropes embedded per provider call.
    pub batch_size: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MAPPING_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// `"{name}. {goal} {fear}"`, leaving out missing parts.
pub fn parent_descriptor(parent: &ArchetypeParent) -> String {
    let mut text = format!("{}.", parent.name);
    for part in [&parent.primary_goal, &parent.primary_fear].into_iter().flatten() {
        text.push(' ');
        text.push_str(part);
    }
    text.trim().to_string()
}

/// Non-empty parts of `[hint, name, description]`, space-joined.
pub fn child_descriptor(child: &TropeChild) -> String {
    [
        child.parent_archetype.as_deref(),
        Some(child.name.as_str()),
        child.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// L2-normalize into `f64`. A zero vector stays zero.
fn normalize(vector: &[f32]) -> Vec<f64> {
    let norm = vector
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 {
        return vec![0.0; vector.len()];
    }
    vector.iter().map(|v| f64::from(*v) / norm).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub struct TropeResolver {
    provider: Box<dyn EmbeddingProvider>,
    config: MappingConfig,
}

impl TropeResolver {
    pub fn new(provider: Box<dyn EmbeddingProvider>, config: MappingConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Map every trope to its most similar parent archetype.
    ///
    /// Rows follow trope catalog order. Ties go to the parent that comes
    /// first in catalog order.
    pub async fn resolve(
        &self,
        parents: &[ArchetypeParent],
        children: &[TropeChild],
    ) -> Result<MappingTable> {
        if parents.is_empty() {
            return Err(MappingError::NoParents);
        }

        log::info!(
            "Resolving {} tropes against {} parent archetypes with {} embeddings",
            children.len(),
            parents.len(),
            self.provider.name()
        );

        let parent_texts: Vec<String> = parents.iter().map(parent_descriptor).collect();
        let parent_vectors = self.embed_normalized(&parent_texts, None).await?;
        let dimension = parent_vectors.first().map(Vec::len).unwrap_or(0);

        let mut rows = Vec::with_capacity(children.len());
        for chunk in children.chunks(self.config.batch_size.max(1)) {
            let texts: Vec<String> = chunk
                .iter()
                .map(|child| {
                    let text = child_descriptor(child);
                    if text.is_empty() {
                        EMPTY_DESCRIPTOR.to_string()
                    } else {
                        text
                    }
                })
                .collect();
            let vectors = self.embed_normalized(&texts, Some(dimension)).await?;

            for (child, vector) in chunk.iter().zip(&vectors) {
                let (best, score) = best_match(&parent_vectors, vector);
                rows.push(MappingRow::new(child, &parents[best], score, self.config.threshold));
            }
            log::debug!("Resolved {}/{} tropes", rows.len(), children.len());
        }

        let table = MappingTable::from_rows(rows);
        let summary = table.summary();
        log::info!(
            "Resolved {} tropes; {} below confidence threshold {}",
            summary.total,
            summary.review_needed,
            self.config.threshold
        );
        Ok(table)
    }

    /// Embed a batch and normalize it, checking count, dimensions and that
    /// every component is finite.
    ///
    /// With `expected` unset the first vector fixes the dimension.
    async fn embed_normalized(&self, texts: &[String], expected: Option<usize>) -> Result<Vec<Vec<f64>>> {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let raw = self.provider.embed_batch(&refs).await?;
        if raw.len() != texts.len() {
            return Err(MappingError::Embedding(EmbeddingError::InvalidResponse(format!(
                "provider returned {} vectors for {} texts",
                raw.len(),
                texts.len()
            ))));
        }

        let expected = expected.or_else(|| raw.first().map(Vec::len));
        let mut normalized = Vec::with_capacity(raw.len());
        for (text, vector) in texts.iter().zip(&raw) {
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(MappingError::Embedding(EmbeddingError::InvalidResponse(format!(
                    "non-finite embedding component for '{text}'"
                ))));
            }
            if let Some(expected) = expected {
                if vector.len() != expected {
                    return Err(MappingError::DimensionMismatch {
                        text: text.clone(),
                        expected,
                        actual: vector.len(),
                    });
                }
            }
            normalized.push(normalize(vector));
        }
        Ok(normalized)
    }
}

/// Index and score of the best parent. Strict comparison keeps the first
/// parent on ties.
fn best_match(parents: &[Vec<f64>], child: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, parent) in parents.iter().enumerate() {
        let score = dot(parent, child);
        if score > best.1 {
            best = (i, score);
        }
    }
    best
}
