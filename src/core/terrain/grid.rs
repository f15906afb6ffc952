//! In-memory terrain grid indexed by `(x, y)`.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::cell::WorldCell;
use super::latitude;
use crate::core::rules::BiomeCode;

/// Immutable terrain snapshot.
///
/// Cells keep the order in which they were ingested, so scans such as
/// [`TerrainGrid::find_cell_with_biome`] are reproducible.
#[derive(Debug, Clone, Default)]
pub struct TerrainGrid {
    name: String,
    meta: Map<String, Value>,
    cells: IndexMap<(i64, i64), WorldCell>,
}

impl TerrainGrid {
    /// Build a grid. A later cell at an already-seen coordinate replaces the
    /// earlier one.
    pub fn new(
        name: impl Into<String>,
        meta: Map<String, Value>,
        cells: impl IntoIterator<Item = WorldCell>,
    ) -> Self {
        let cells = cells.into_iter().map(|c| (c.coords(), c)).collect();
        Self {
            name: name.into(),
            meta,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn get_cell(&self, x: i64, y: i64) -> Option<&WorldCell> {
        self.cells.get(&(x, y))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &WorldCell> {
        self.cells.values()
    }

    /// First coordinate, in ingestion order, whose cell carries `biome_code`.
    pub fn find_cell_with_biome(&self, biome_code: BiomeCode) -> Option<(i64, i64)> {
        self.cells
            .values()
            .find(|c| c.biome_code() == Some(biome_code))
            .map(WorldCell::coords)
    }

    /// Cell count per biome code. Cells without a code are not counted.
    pub fn biome_histogram(&self) -> BTreeMap<BiomeCode, usize> {
        let mut histogram = BTreeMap::new();
        for code in self.cells.values().filter_map(WorldCell::biome_code) {
            *histogram.entry(code).or_insert(0) += 1;
        }
        histogram
    }

    /// Northern boundary latitude declared in the map metadata, if any.
    pub fn north_latitude(&self) -> Option<f64> {
        latitude::read_north_latitude(&self.meta)
    }

    /// Apply the polar tree-cover correction and return the patched grid with
    /// the number of rewritten cells.
    ///
    /// Maps whose northern boundary lies beyond the polar thresholds have
    /// their tree-cover cells reclassified as tundra moss/lichen. Applying
    /// the patch to an already patched grid rewrites nothing.
    pub fn with_latitude_patch(mut self) -> (Self, usize) {
        let patched = match self.north_latitude() {
            Some(north) if latitude::is_polar(north) => {
                latitude::patch_cells(self.cells.values_mut())
            }
            _ => 0,
        };
        (self, patched)
    }
}
