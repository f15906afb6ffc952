//! Offline feature-hashing embeddings.
//!
//! Tokens are lowercased alphanumeric words plus their character trigrams.
//! Each token is hashed (FNV-1a, 64 bit) into one of `dimensions` buckets with
//! a sign taken from the top hash bit. The output is stable across platforms
//! and releases, so mapping artifacts built with it are reproducible.

use async_trait::async_trait;

use super::provider::{EmbeddingProvider, Result};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct HashingEmbeddings {
    dimensions: usize,
}

impl HashingEmbeddings {
    pub const DEFAULT_DIMENSIONS: usize = 256;

    /// `dimensions` of zero is bumped to one.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Unnormalized hashed feature vector for `text`.
    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for word in words(text) {
            self.add(&mut vector, word.as_bytes(), WORD_WEIGHT);

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                self.add(&mut vector, gram.as_bytes(), TRIGRAM_WEIGHT);
            }
        }
        vector
    }

    fn add(&self, vector: &mut [f32], token: &[u8], weight: f32) {
        let hash = fnv1a(token);
        let bucket = (hash % self.dimensions as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashingEmbeddings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }

    async fn health_check(&self) -> bool {
        true
    }
}
