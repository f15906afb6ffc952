//! NPC Generation Error Types
//!
//! Failures of the synthesis pipeline. All of them mean the inputs (terrain,
//! rule tables, catalogs, mapping) do not fit together; none is transient.

use thiserror::Error;

use crate::core::catalog::ArchetypeId;
use crate::core::rules::BiomeCode;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NpcGenError {
    /// No terrain cell at the requested coordinate.
    #[error("No terrain cell at ({x}, {y})")]
    CellNotFound { x: i64, y: i64 },

    /// The configured fallback biome is not in the registry.
    #[error("Fallback biome {code} is not registered")]
    FallbackBiomeMissing { code: BiomeCode },

    /// The resolved biome has no archetype pool.
    #[error("No archetype pool for biome {biome}")]
    EmptyArchetypePool { biome: BiomeCode },

    /// None of the pool's archetype ids exist in the catalog.
    #[error("No valid archetypes available for this biome (pool: {})", join_ids(pool))]
    NoValidArchetypes { pool: Vec<ArchetypeId> },

    /// No trope in the mapping table resolves to the chosen archetype.
    #[error("No child tropes mapped to parent {parent_id}")]
    NoTropesForParent { parent_id: ArchetypeId },

    /// The map has no cell with the requested biome.
    #[error("No cell with biome {biome} in map '{map}'")]
    BiomeNotPresent { map: String, biome: BiomeCode },
}

impl NpcGenError {
    pub fn cell_not_found(x: i64, y: i64) -> Self {
        Self::CellNotFound { x, y }
    }

    pub fn no_tropes_for_parent(parent_id: impl Into<ArchetypeId>) -> Self {
        Self::NoTropesForParent {
            parent_id: parent_id.into(),
        }
    }

    /// True when the request pointed at something the map does not have,
    /// as opposed to rule or catalog data that does not fit together.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::CellNotFound { .. } | Self::BiomeNotPresent { .. })
    }
}

fn join_ids(ids: &[ArchetypeId]) -> String {
    ids.iter().map(ArchetypeId::as_str).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, NpcGenError>;
