//! A single terrain grid cell.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::ingest::json::{as_bool, as_f64, as_i64};
use crate::core::rules::BiomeCode;

/// Geography attributes of a cell.
///
/// Known keys are typed; anything else from `geo_data` is kept verbatim in
/// `extra` so exported cells round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biome_code: Option<BiomeCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_water: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeoData {
    pub fn with_biome(biome_code: BiomeCode) -> Self {
        Self {
            biome_code: Some(biome_code),
            ..Self::default()
        }
    }

    /// Lenient conversion from a raw `geo_data` object. Values of the wrong
    /// type for a known key are treated as absent.
    pub fn from_json(mut raw: Map<String, Value>) -> Self {
        let mut take = |key: &str| raw.remove(key);

        let biome_code = take("biome_code").as_ref().and_then(as_i64);
        let human_density = take("human_density").as_ref().and_then(as_f64);
        let elevation = take("elevation").as_ref().and_then(as_f64);
        let roughness = take("roughness").as_ref().and_then(as_f64);
        let is_water = take("is_water").as_ref().and_then(as_bool);

        Self {
            biome_code,
            human_density,
            elevation,
            roughness,
            is_water,
            extra: raw,
        }
    }
}

/// One `(x, y)` position of a terrain grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldCell {
    pub x: i64,
    pub y: i64,
    pub geo_data: GeoData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_heuristics: Option<Map<String, Value>>,
}

impl WorldCell {
    pub fn new(x: i64, y: i64, geo_data: GeoData) -> Self {
        Self {
            x,
            y,
            geo_data,
            game_heuristics: None,
        }
    }

    #[inline]
    pub fn coords(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    #[inline]
    pub fn biome_code(&self) -> Option<BiomeCode> {
        self.geo_data.biome_code
    }
}
