//! Persistence for the mapping artifact.
//!
//! Resolution is the only expensive step of the pipeline, so its output is
//! written once (`config_archetypes_mapped.json`) and reloaded afterwards.

use std::future::Future;
use std::path::{Path, PathBuf};

use super::error::{MappingError, Result};
use super::table::MappingTable;

pub const DEFAULT_MAPPING_FILE: &str = "config_archetypes_mapped.json";

#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
    threshold: Option<f64>,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            threshold: None,
        }
    }

    /// Re-flag loaded rows against `threshold` instead of trusting the
    /// `review_needed` values saved with the artifact.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<MappingTable> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| MappingError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut table: MappingTable =
            serde_json::from_str(&text).map_err(|source| MappingError::Serialization {
                path: self.path.clone(),
                source,
            })?;
        log::info!("Loaded {} mapping rows from {}", table.len(), self.path.display());

        if let Some(threshold) = self.threshold {
            let changed = table.apply_threshold(threshold);
            if changed > 0 {
                log::info!("Re-flagged {changed} mapping rows for threshold {threshold}");
            }
        }
        Ok(table)
    }

    /// Write the table as pretty JSON, creating parent directories.
    pub fn save(&self, table: &MappingTable) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| MappingError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(table).map_err(|source| MappingError::Serialization {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| MappingError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Saved {} mapping rows to {}", table.len(), self.path.display());
        Ok(())
    }

    /// Reuse the saved artifact, or run `build` and save its result when the
    /// artifact is missing or `force` is set.
    pub async fn load_or_build<F, Fut>(&self, force: bool, build: F) -> Result<MappingTable>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MappingTable>>,
    {
        if !force && self.exists() {
            log::info!("Reusing mapping artifact {}", self.path.display());
            return self.load();
        }
        if force {
            log::info!("Rebuilding mapping artifact (forced)");
        }
        let table = build().await?;
        self.save(&table)?;
        Ok(table)
    }
}
