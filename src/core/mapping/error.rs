//! Trope mapping errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::embedding::EmbeddingError;

pub type Result<T> = std::result::Result<T, MappingError>;

#[derive(Error, Debug)]
pub enum MappingError {
    /// Nothing to map onto.
    #[error("Cannot resolve tropes: the parent archetype catalog is empty")]
    NoParents,

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Provider returned vectors of inconsistent length.
    #[error("Embedding dimension mismatch for '{text}': expected {expected}, got {actual}")]
    DimensionMismatch {
        text: String,
        expected: usize,
        actual: usize,
    },

    #[error("Mapping artifact I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mapping artifact {path} is not valid: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
