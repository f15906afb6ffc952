//! End-to-end pipeline tests: on-disk catalogs and terrain through mapping,
//! generation and export.

use std::path::{Path, PathBuf};

use npcforge::core::catalog::{ArchetypeIndex, ArchetypeParent, TropeChild};
use npcforge::core::embedding::HashingEmbeddings;
use npcforge::core::export::write_npc;
use npcforge::core::ingest::{ArchetypeLoader, TerrainLoader, TropeLoader};
use npcforge::core::mapping::{
    MappingConfig, MappingError, MappingRow, MappingStore, MappingTable, TropeResolver,
};
use npcforge::core::npc_gen::{generate_npc, GeneratorConfig, NpcGenError, NpcGenerator, NpcRecord};
use npcforge::core::rules::RuleSet;
use tempfile::TempDir;

const PARENTS: &str = r#"[
    {"id": "A1", "name": "Charismatic Populist", "primary_goal": "Win the crowd",
     "primary_fear": "Irrelevance"},
    {"id": "A2", "name": "Wise Hermit", "ocean_bias": {"openness": 0.8},
     "primary_goal": "Preserve knowledge"},
    {"name": "Missing Id"}
]"#;

// Trailing commas are repaired on load.
const TROPES: &str = r#"[
    {"id": "T1", "name": "Street Preacher", "description": "Neon halo, cracked voice",},
    {"id": "T2", "name": "Ice Hermit", "genre_tag": "Survival",},
    {"id": "T3", "name": "Hedge Druid", "genre_tag": "Nature Fantasy",},
]"#;

const RULES: &str = r#"
biomes:
  - { code: 40, name: "Mixed Rural", theme: "Frontier Hinterland" }
  - { code: 50, name: "Built-up Urban", theme: "Cyberpunk Sprawl" }
  - { code: 10, name: "Tree Cover", theme: "Wildlands" }
  - { code: 100, name: "Moss / Lichen (Tundra)", theme: "Frozen Expanse" }
archetype_pools:
  50: [A1]
  40: [A2]
  10: [A2]
  100: [A2]
trait_modifiers:
  50: { conscientiousness: 0.15, neuroticism: 0.10, agreeableness: -0.10 }
  100: { conscientiousness: 0.20, extroversion: -0.20, neuroticism: 0.20 }
theme_hints:
  "Frozen Expanse": [survival, hermit]
  "Wildlands": [nature, druid]
theme_exclusions:
  "Frozen Expanse": [neon]
"#;

const URBAN_MAP: &str = r#"{
    "meta": {"project_name": "Tokyo_MegaCity", "bbox": {"north": 35.8}},
    "grid": [
        {"x": 0, "y": 0, "geo_data": {"biome_code": 50, "human_density": 0.95}},
        {"x": 1, "y": 0, "geo_data": {"biome_code": 999}},
        {"x": 2, "y": 0, "geo_data": {"biome_code": 10}}
    ]
}"#;

const POLAR_MAP: &str = r#"{
    "meta": {"project_name": "Yakutsk_FrozenTundra", "bbox": {"north": 66.2}},
    "grid": [
        {"x": 0, "y": 0, "geo_data": {"biome_code": 10}},
        {"x": 0, "y": 1, "geo_data": {"biome_code": 100}}
    ]
}"#;

struct Project {
    dir: TempDir,
    rules: RuleSet,
    parents: Vec<ArchetypeParent>,
    index: ArchetypeIndex,
    tropes: Vec<TropeChild>,
}

impl Project {
    fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }
}

fn write(dir: &Path, file: &str, content: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, content).unwrap();
    path
}

fn project() -> Project {
    let dir = tempfile::tempdir().unwrap();
    let parents_path = write(dir.path(), "parent archetypes.json", PARENTS);
    let tropes_path = write(dir.path(), "tropes_child.json", TROPES);
    let rules_path = write(dir.path(), "rules.yaml", RULES);
    write(dir.path(), "Tokyo_MegaCity.json", URBAN_MAP);
    write(dir.path(), "Yakutsk_FrozenTundra.json", POLAR_MAP);

    let parents = ArchetypeLoader.load(&parents_path).unwrap();
    let tropes = TropeLoader.load(&tropes_path).unwrap();
    let rules = RuleSet::load(Some(rules_path.as_path())).unwrap();
    rules.validate(40).unwrap();

    Project {
        dir,
        rules,
        index: ArchetypeIndex::from_parents(parents.clone()),
        parents,
        tropes,
    }
}

/// T1 → A1, T2 and T3 → A2.
fn fixed_mapping(p: &Project) -> MappingTable {
    MappingTable::from_rows(vec![
        MappingRow::new(&p.tropes[0], &p.parents[0], 0.71, 0.35),
        MappingRow::new(&p.tropes[1], &p.parents[1], 0.64, 0.35),
        MappingRow::new(&p.tropes[2], &p.parents[1], 0.22, 0.35),
    ])
}

#[test]
fn test_catalogs_load_from_disk() {
    let p = project();
    assert_eq!(p.parents.len(), 2);
    assert_eq!(p.tropes.len(), 3);
    assert!(p.rules.unknown_archetypes(&p.index).is_empty());
}

#[test]
fn test_urban_cell_scenario() {
    let p = project();
    let mapping = fixed_mapping(&p);
    let grid = TerrainLoader.load_map(p.path("Tokyo_MegaCity.json")).unwrap();

    let npc = generate_npc(0, 0, &grid, &p.rules, &p.index, &p.tropes, &mapping, 42).unwrap();

    assert_eq!(npc.npc_id, "NPC_GEN_x0y0");
    assert_eq!(npc.archetype_parent.as_str(), "A1");
    assert_eq!(npc.archetype_name, "Charismatic Populist");
    // The only trope mapped to A1 has no genre tag and is still chosen.
    assert_eq!(npc.trope_child.as_str(), "T1");
    assert_eq!(npc.name, "Street Preacher");
    assert_eq!(npc.origin.biome_id, 50);
    assert_eq!(npc.origin.mapped_theme, "Cyberpunk Sprawl");

    let ocean = &npc.psychometrics.ocean_stats;
    assert_eq!(ocean.conscientiousness, 0.65);
    assert_eq!(ocean.neuroticism, 0.6);
    assert_eq!(ocean.agreeableness, 0.4);
    assert_eq!(ocean.openness, 0.5);
    assert_eq!(npc.psychometrics.dominant_trait, "High Conscientiousness");

    assert_eq!(npc.narrative.goal.as_deref(), Some("Win the crowd"));
    assert_eq!(npc.narrative.fear.as_deref(), Some("Irrelevance"));
    assert_eq!(npc.narrative.visual_description.as_deref(), Some("Neon halo, cracked voice"));
    assert_eq!(npc.narrative.dialogue_voice, "Cyberpunk Sprawl");
}

#[test]
fn test_generation_is_deterministic() {
    let p = project();
    let mapping = fixed_mapping(&p);
    let grid = TerrainLoader.load_map(p.path("Tokyo_MegaCity.json")).unwrap();

    for x in 0..3 {
        let a = generate_npc(x, 0, &grid, &p.rules, &p.index, &p.tropes, &mapping, 7).unwrap();
        let b = generate_npc(x, 0, &grid, &p.rules, &p.index, &p.tropes, &mapping, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string_pretty(&a).unwrap(),
            serde_json::to_string_pretty(&b).unwrap()
        );
    }
}

#[test]
fn test_unregistered_biome_uses_fallback() {
    let p = project();
    let mapping = fixed_mapping(&p);
    let grid = TerrainLoader.load_map(p.path("Tokyo_MegaCity.json")).unwrap();

    let npc = generate_npc(1, 0, &grid, &p.rules, &p.index, &p.tropes, &mapping, 42).unwrap();
    assert_eq!(npc.origin.biome_id, 40);
    assert_eq!(npc.origin.mapped_theme, "Frontier Hinterland");
    assert_eq!(npc.archetype_parent.as_str(), "A2");
    assert_eq!(
        npc.psychometrics.environmental_influence,
        "Minimal environmental influence."
    );
}

#[test]
fn test_missing_cell_is_an_error() {
    let p = project();
    let mapping = fixed_mapping(&p);
    let grid = TerrainLoader.load_map(p.path("Tokyo_MegaCity.json")).unwrap();

    let err = generate_npc(9, 9, &grid, &p.rules, &p.index, &p.tropes, &mapping, 42).unwrap_err();
    assert_eq!(err, NpcGenError::CellNotFound { x: 9, y: 9 });
}

#[test]
fn test_theme_hint_prefers_tagged_trope() {
    let p = project();
    let mapping = fixed_mapping(&p);
    let grid = TerrainLoader.load_map(p.path("Tokyo_MegaCity.json")).unwrap();

    // Wildlands hints "druid"; only T3 qualifies among A2's tropes.
    for seed in 0..20 {
        let npc = generate_npc(2, 0, &grid, &p.rules, &p.index, &p.tropes, &mapping, seed).unwrap();
        assert_eq!(npc.trope_child.as_str(), "T3");
    }
}

#[test]
fn test_polar_map_is_patched_to_tundra() {
    let p = project();
    let mapping = fixed_mapping(&p);
    let grid = TerrainLoader.load_map(p.path("Yakutsk_FrozenTundra.json")).unwrap();
    assert_eq!(grid.get_cell(0, 0).unwrap().biome_code(), Some(100));

    let generator = NpcGenerator::new(&p.rules, &p.index, &p.tropes, &mapping, GeneratorConfig::default());
    let npc = generator.generate_for_biome(&grid, 100, 42).unwrap();
    assert_eq!(npc.npc_id, "NPC_GEN_x0y0");
    assert_eq!(npc.origin.mapped_theme, "Frozen Expanse");
    assert_eq!(npc.trope_child.as_str(), "T2");
    assert_eq!(npc.psychometrics.dominant_trait, "High Openness");
}

#[test]
fn test_export_writes_loadable_json() {
    let p = project();
    let mapping = fixed_mapping(&p);
    let grid = TerrainLoader.load_map(p.path("Tokyo_MegaCity.json")).unwrap();
    let npc = generate_npc(0, 0, &grid, &p.rules, &p.index, &p.tropes, &mapping, 42).unwrap();

    let out = p.path("output/tokyo_urban_npc.json");
    write_npc(&out, &npc).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let loaded: NpcRecord = serde_json::from_str(&text).unwrap();
    assert_eq!(loaded, npc);
    assert!(text.find("\"npc_id\"").unwrap() < text.find("\"psychometrics\"").unwrap());
}

#[tokio::test]
async fn test_mapping_artifact_is_built_once_then_reused() {
    let p = project();
    let store = MappingStore::new(p.path("config_archetypes_mapped.json"));
    assert!(!store.exists());

    let built = store
        .load_or_build(false, || async {
            TropeResolver::new(Box::new(HashingEmbeddings::default()), MappingConfig::default())
                .resolve(&p.parents, &p.tropes)
                .await
        })
        .await
        .unwrap();
    assert_eq!(built.len(), p.tropes.len());
    assert!(built.check_against(&p.index, &p.tropes).is_empty());
    assert!(store.exists());

    let reused = store
        .load_or_build(false, || async { Err::<MappingTable, _>(MappingError::NoParents) })
        .await
        .unwrap();
    assert_eq!(reused.rows(), built.rows());
}
