//! NPC synthesis orchestrator.
//!
//! One call turns a coordinate and a seed into one [`NpcRecord`]:
//!
//! ```text
//! cell -> biome (fallback if unknown) -> archetype pool -> archetype
//!      -> trait deltas -> OCEAN scores -> dominant trait
//!      -> trope (mapped to archetype, theme-aware) -> record
//! ```
//!
//! Each call seeds its own `ChaCha8Rng`; the archetype is drawn before the
//! trope. Identical inputs give identical records on every platform.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::errors::{NpcGenError, Result};
use super::ocean::{apply_modifiers, dominant_label};
use super::record::{Coordinates, Narrative, NpcRecord, Origin, Psychometrics};
use super::selection::{select_archetype, select_trope, ExclusionFallback};
use crate::core::catalog::{ArchetypeIndex, TropeChild};
use crate::core::mapping::MappingTable;
use crate::core::rules::{BiomeCode, BiomeDefinition, RuleSet};
use crate::core::terrain::{TerrainGrid, WorldCell};

/// "Mixed Rural / Peri-Urban", theme "Frontier Hinterland".
pub const DEFAULT_FALLBACK_BIOME: BiomeCode = 40;

pub const DEFAULT_SEED: u64 = 1337;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Biome used for cells with a missing or unregistered code.
    pub fallback_biome: BiomeCode,
    /// Seed used when the caller does not give one.
    pub default_seed: u64,
    pub exclusion_fallback: ExclusionFallback,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fallback_biome: DEFAULT_FALLBACK_BIOME,
            default_seed: DEFAULT_SEED,
            exclusion_fallback: ExclusionFallback::default(),
        }
    }
}

/// Read-only view over everything synthesis needs.
#[derive(Debug, Clone)]
pub struct NpcGenerator<'a> {
    rules: &'a RuleSet,
    index: &'a ArchetypeIndex,
    tropes: &'a [TropeChild],
    mapping: &'a MappingTable,
    config: GeneratorConfig,
}

impl<'a> NpcGenerator<'a> {
    pub fn new(
        rules: &'a RuleSet,
        index: &'a ArchetypeIndex,
        tropes: &'a [TropeChild],
        mapping: &'a MappingTable,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            rules,
            index,
            tropes,
            mapping,
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the NPC living at `(x, y)`.
    pub fn generate(&self, grid: &TerrainGrid, x: i64, y: i64, seed: u64) -> Result<NpcRecord> {
        let cell = grid
            .get_cell(x, y)
            .ok_or_else(|| NpcGenError::cell_not_found(x, y))?;
        let biome = self.resolve_biome(cell)?;

        let pool = self.rules.archetype_pool(biome.code);
        if pool.is_empty() {
            return Err(NpcGenError::EmptyArchetypePool { biome: biome.code });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let parent = select_archetype(self.index, pool, &mut rng)?;

        let deltas = self.rules.trait_modifiers(biome.code);
        let (ocean_stats, environmental_influence) = apply_modifiers(parent, &deltas);
        let dominant_trait = dominant_label(&ocean_stats);

        let trope = select_trope(
            self.tropes,
            self.mapping,
            &parent.id,
            &biome.theme,
            self.rules,
            self.config.exclusion_fallback,
            &mut rng,
        )?;

        log::debug!(
            "Generated NPC at ({x}, {y}) in biome {}: {} / {}",
            biome.code,
            parent.id,
            trope.id
        );

        Ok(NpcRecord {
            npc_id: NpcRecord::npc_id_for(x, y),
            name: trope.name.clone(),
            archetype_parent: parent.id.clone(),
            archetype_name: parent.name.clone(),
            trope_child: trope.id.clone(),
            trope_name: trope.name.clone(),
            origin: Origin {
                coordinates: Coordinates { x, y },
                biome_id: biome.code,
                mapped_theme: biome.theme.clone(),
            },
            psychometrics: Psychometrics {
                ocean_stats,
                dominant_trait,
                environmental_influence,
            },
            narrative: Narrative {
                goal: parent.primary_goal.clone(),
                fear: parent.primary_fear.clone(),
                visual_description: trope.description.clone(),
                dialogue_voice: biome.theme.clone(),
            },
        })
    }

    /// Generate at the first cell (file order) holding `biome`.
    pub fn generate_for_biome(&self, grid: &TerrainGrid, biome: BiomeCode, seed: u64) -> Result<NpcRecord> {
        let (x, y) = grid
            .find_cell_with_biome(biome)
            .ok_or_else(|| NpcGenError::BiomeNotPresent {
                map: grid.name().to_string(),
                biome,
            })?;
        self.generate(grid, x, y, seed)
    }

    fn resolve_biome(&self, cell: &WorldCell) -> Result<&'a BiomeDefinition> {
        if let Some(biome) = cell.biome_code().and_then(|code| self.rules.biome(code)) {
            return Ok(biome);
        }

        let fallback = self.config.fallback_biome;
        match cell.biome_code() {
            Some(code) => log::warn!(
                "Biome {code} at ({}, {}) is not registered; using fallback biome {fallback}",
                cell.x,
                cell.y
            ),
            None => log::warn!(
                "Cell ({}, {}) has no biome code; using fallback biome {fallback}",
                cell.x,
                cell.y
            ),
        }
        self.rules
            .biome(fallback)
            .ok_or(NpcGenError::FallbackBiomeMissing { code: fallback })
    }
}

/// One-shot generation with the default [`GeneratorConfig`].
#[allow(clippy::too_many_arguments)]
pub fn generate_npc(
    x: i64,
    y: i64,
    grid: &TerrainGrid,
    rules: &RuleSet,
    index: &ArchetypeIndex,
    tropes: &[TropeChild],
    mapping: &MappingTable,
    seed: u64,
) -> Result<NpcRecord> {
    NpcGenerator::new(rules, index, tropes, mapping, GeneratorConfig::default()).generate(grid, x, y, seed)
}
