//! Terrain map loader.
//!
//! Expected document shape:
//!
//! ```text
//! {
//!   "meta": { "project_name": "...", "bbox": { "north": 35.8, ... }, ... },
//!   "grid": [
//!     { "x": 0, "y": 0,
//!       "geo_data": { "biome_code": 50, "human_density": 0.9, ... },
//!       "game_heuristics": { ... } },
//!     ...
//!   ]
//! }
//! ```
//!
//! The polar latitude patch runs here, once per load.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::errors::{IngestError, Result};
use super::json;
use crate::core::terrain::{GeoData, TerrainGrid, WorldCell};

#[derive(Debug, Default, Clone, Copy)]
pub struct TerrainLoader;

impl TerrainLoader {
    pub fn load_map(&self, path: impl AsRef<Path>) -> Result<TerrainGrid> {
        let path = path.as_ref();
        log::info!("Loading terrain map from {}", path.display());

        let text = json::read_text(path, "Terrain map")?;
        let data = json::parse(&text, path)?;
        let mut root = match data {
            Value::Object(root) => root,
            other => return Err(IngestError::malformed(path, "object", json::type_name(&other))),
        };

        let meta = match root.remove("meta") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(meta)) => meta,
            Some(_) => {
                log::warn!("meta is not a dict in {}; forcing empty meta", path.display());
                Map::new()
            }
        };

        let rows = match root.remove("grid") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(IngestError::malformed(path, "grid list", json::type_name(&other)));
            }
        };

        let cells: Vec<WorldCell> = rows.into_iter().filter_map(cell_from_row).collect();

        let name = json::opt_str(meta.get("project_name")).unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        let (grid, patched) = TerrainGrid::new(name, meta, cells).with_latitude_patch();
        if patched > 0 {
            log::warn!(
                "Applied latitude override patch to {} cells in {}",
                patched,
                grid.name()
            );
        }

        log::info!("Loaded terrain map '{}' with {} cells", grid.name(), grid.len());
        Ok(grid)
    }

    /// Load every `*.json` map in a directory, in file-name order.
    ///
    /// Individual map failures are logged and skipped.
    pub fn load_folder(&self, folder: impl AsRef<Path>) -> Result<Vec<TerrainGrid>> {
        let folder = folder.as_ref();
        let entries = std::fs::read_dir(folder).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IngestError::not_found("Terrain folder", folder)
            } else {
                IngestError::read_failed(folder, e)
            }
        })?;

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut maps = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_map(&path) {
                Ok(map) => maps.push(map),
                Err(e) => log::error!("Failed to load map {}: {e}", path.display()),
            }
        }

        log::info!("Loaded {} terrain maps from {}", maps.len(), folder.display());
        Ok(maps)
    }
}

/// Build a cell from a grid row. Rows without integer `x`/`y` are dropped.
fn cell_from_row(row: Value) -> Option<WorldCell> {
    let Value::Object(mut row) = row else {
        return None;
    };

    let x = row.get("x").and_then(Value::as_i64)?;
    let y = row.get("y").and_then(Value::as_i64)?;

    let geo_data = match row.remove("geo_data") {
        Some(Value::Object(geo)) => GeoData::from_json(geo),
        _ => GeoData::default(),
    };
    let game_heuristics = match row.remove("game_heuristics") {
        Some(Value::Object(h)) => Some(h),
        _ => None,
    };

    Some(WorldCell {
        x,
        y,
        geo_data,
        game_heuristics,
    })
}
