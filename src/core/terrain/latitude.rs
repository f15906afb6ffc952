//! Polar misclassification patch.
//!
//! Land-cover sources report lichen/moss tundra near the poles as tree cover.
//! When a map's northern boundary is beyond the polar thresholds, every
//! tree-cover cell is rewritten to tundra moss/lichen.

use serde_json::{Map, Value};

use super::cell::WorldCell;
use crate::core::ingest::json::as_f64;
use crate::core::rules::BiomeCode;

/// Northern boundary above which a map counts as polar.
pub const POLAR_NORTH_LATITUDE: f64 = 65.0;

/// Northern boundary below which a map counts as (ant)arctic.
pub const POLAR_SOUTH_LATITUDE: f64 = -60.0;

pub const TREE_COVER: BiomeCode = 10;
pub const TUNDRA_MOSS_LICHEN: BiomeCode = 100;

/// Read `meta.bounding_box.north`, falling back to `meta.bbox.north`.
pub fn read_north_latitude(meta: &Map<String, Value>) -> Option<f64> {
    ["bounding_box", "bbox"].iter().find_map(|key| {
        meta.get(*key)
            .and_then(Value::as_object)
            .and_then(|bb| bb.get("north"))
            .and_then(as_f64)
    })
}

pub fn is_polar(north: f64) -> bool {
    north > POLAR_NORTH_LATITUDE || north < POLAR_SOUTH_LATITUDE
}

/// Rewrite tree-cover cells to tundra. Returns the number of cells changed.
pub fn patch_cells<'a>(cells: impl Iterator<Item = &'a mut WorldCell>) -> usize {
    let mut patched = 0;
    for cell in cells {
        if cell.geo_data.biome_code == Some(TREE_COVER) {
            cell.geo_data.biome_code = Some(TUNDRA_MOSS_LICHEN);
            patched += 1;
        }
    }
    patched
}
