//! Test fixtures: a small world of catalogs, rules and terrain.

use serde_json::Map;

use crate::core::catalog::{ArchetypeIndex, ArchetypeParent, OceanTrait, TraitDeltas, TropeChild};
use crate::core::mapping::{MappingRow, MappingTable};
use crate::core::rules::{BiomeCode, BiomeDefinition, RuleSet};
use crate::core::terrain::{GeoData, TerrainGrid, WorldCell};

pub const FIXTURE_THRESHOLD: f64 = 0.35;

pub fn sample_parents() -> Vec<ArchetypeParent> {
    vec![
        ArchetypeParent::new("ARCH_MENTOR_01", "Wise Hermit")
            .with_bias(OceanTrait::Openness, 0.8)
            .with_goal("Preserve forbidden knowledge")
            .with_fear("Knowledge falling into wrong hands"),
        ArchetypeParent::new("ARCH_LEADER_06", "Populist")
            .with_bias(OceanTrait::Extroversion, 0.9)
            .with_goal("Win the crowd"),
        ArchetypeParent::new("ARCH_SURVIVOR_03", "Scavenger").with_fear("Starvation"),
    ]
}

pub fn sample_tropes() -> Vec<TropeChild> {
    vec![
        TropeChild::new("T_NEON_SAGE", "Neon Sage")
            .with_description("Chrome-eyed archivist")
            .with_genre_tag("Cyberpunk"),
        TropeChild::new("T_HEDGE_SAGE", "Hedge Sage").with_genre_tag("Fantasy"),
        TropeChild::new("T_STREET_VOICE", "Street Voice").with_genre_tag("Cyberpunk Noir"),
        TropeChild::new("T_RUST_PICKER", "Rust Picker").with_genre_tag("Post-Apocalyptic"),
        TropeChild::new("T_ODD_ONE", "Odd One"),
    ]
}

/// Mapping that pairs each fixture trope with the fixture parent it was
/// written for.
pub fn sample_mapping(parents: &[ArchetypeParent], tropes: &[TropeChild]) -> MappingTable {
    let pairs = [(0, 0, 0.91), (1, 0, 0.52), (2, 1, 0.77), (3, 2, 0.66), (4, 2, 0.12)];
    MappingTable::from_rows(
        pairs
            .iter()
            .map(|&(t, p, score)| MappingRow::new(&tropes[t], &parents[p], score, FIXTURE_THRESHOLD))
            .collect(),
    )
}

pub fn sample_rules() -> RuleSet {
    RuleSet::empty()
        .with_biome(BiomeDefinition::new(50, "Built-up Urban", "Cyberpunk Sprawl"))
        .with_biome(BiomeDefinition::new(40, "Mixed Rural / Peri-Urban", "Frontier Hinterland"))
        .with_biome(BiomeDefinition::new(60, "Bare / Sparse Vegetation", "Post-Apocalyptic Wasteland"))
        .with_pool(50, ["ARCH_MENTOR_01", "ARCH_LEADER_06"])
        .with_pool(40, ["ARCH_MENTOR_01"])
        .with_pool(60, ["ARCH_SURVIVOR_03"])
        .with_modifiers(
            50,
            TraitDeltas::new()
                .with(OceanTrait::Conscientiousness, 0.15)
                .with(OceanTrait::Agreeableness, -0.1),
        )
        .with_theme_hints("Cyberpunk Sprawl", ["cyberpunk", "neon"])
        .with_theme_exclusions("Cyberpunk Sprawl", ["noir"])
        .with_theme_hints("Post-Apocalyptic Wasteland", ["post-apocalyptic"])
}

/// One row of cells along y = 0 with the given biome codes.
pub fn strip_grid(name: &str, biomes: &[Option<BiomeCode>]) -> TerrainGrid {
    let cells: Vec<WorldCell> = biomes
        .iter()
        .enumerate()
        .map(|(x, code)| {
            let geo = code.map(GeoData::with_biome).unwrap_or_default();
            WorldCell::new(x as i64, 0, geo)
        })
        .collect();
    TerrainGrid::new(name, Map::new(), cells)
}

/// Catalogs, rules and mapping bundled for generator tests.
pub struct Fixture {
    pub rules: RuleSet,
    pub index: ArchetypeIndex,
    pub tropes: Vec<TropeChild>,
    pub mapping: MappingTable,
}

impl Fixture {
    pub fn new() -> Self {
        let parents = sample_parents();
        let tropes = sample_tropes();
        let mapping = sample_mapping(&parents, &tropes);
        Self {
            rules: sample_rules(),
            index: ArchetypeIndex::from_parents(parents),
            tropes,
            mapping,
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
