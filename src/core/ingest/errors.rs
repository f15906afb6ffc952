//! Ingestion Error Types
//!
//! Fatal failures while reading catalog and terrain files. Row-level defects
//! (missing ids, bad coordinates) are not errors: loaders drop those rows and
//! log a warning.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the catalog and terrain loaders.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Input file or directory does not exist.
    #[error("{what} not found: {path}")]
    NotFound { what: String, path: PathBuf },

    /// File exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid JSON, even after repair when repair applies.
    #[error("Failed to parse {path} at line {line} column {column}: {source}")]
    ParseFailed {
        path: PathBuf,
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },

    /// JSON parsed but has the wrong top-level shape.
    #[error("Malformed input in {path}: expected {expected}, got {actual}")]
    Malformed {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl IngestError {
    pub fn not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ParseFailed {
            path: path.into(),
            line: source.line(),
            column: source.column(),
            source,
        }
    }

    pub fn malformed(
        path: impl Into<PathBuf>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// True when the resource itself is missing, as opposed to present but bad.
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
