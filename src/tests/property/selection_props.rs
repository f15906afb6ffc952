//! Property-based tests for seeded NPC selection
//!
//! Tests invariants:
//! - Chosen archetype is in the allowed pool and the catalog
//! - Chosen trope is mapped to the chosen archetype
//! - Same seed and cell give the same NPC

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::catalog::ArchetypeId;
use crate::core::npc_gen::{select_archetype, GeneratorConfig, NpcGenError, NpcGenerator};
use crate::tests::common::{strip_grid, Fixture};

const KNOWN_IDS: [&str; 3] = ["ARCH_MENTOR_01", "ARCH_LEADER_06", "ARCH_SURVIVOR_03"];

fn arb_pool() -> impl Strategy<Value = Vec<ArchetypeId>> {
    let mut ids: Vec<&'static str> = KNOWN_IDS.to_vec();
    ids.push("ARCH_MISSING_99");
    prop::sample::subsequence(ids, 0..=4)
        .prop_map(|ids| ids.into_iter().map(ArchetypeId::new).collect())
}

proptest! {
    #[test]
    fn prop_archetype_drawn_from_pool(pool in arb_pool(), seed in any::<u64>()) {
        let fixture = Fixture::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let known = pool.iter().any(|id| fixture.index.contains(id));

        match select_archetype(&fixture.index, &pool, &mut rng) {
            Ok(parent) => {
                prop_assert!(known);
                prop_assert!(pool.contains(&parent.id));
            }
            Err(e) => {
                prop_assert!(!known);
                prop_assert!(
                    matches!(e, NpcGenError::NoValidArchetypes { .. }),
                    "unexpected error: {e}"
                );
            }
        }
    }

    #[test]
    fn prop_trope_maps_to_archetype(seed in any::<u64>(), x in 0i64..3) {
        let fixture = Fixture::new();
        let grid = strip_grid("Props", &[Some(50), Some(60), Some(40)]);
        let generator = NpcGenerator::new(
            &fixture.rules,
            &fixture.index,
            &fixture.tropes,
            &fixture.mapping,
            GeneratorConfig::default(),
        );

        let npc = generator.generate(&grid, x, 0, seed).unwrap();
        let pool = fixture.rules.archetype_pool(npc.origin.biome_id);
        prop_assert!(pool.contains(&npc.archetype_parent));
        prop_assert_eq!(
            fixture.mapping.resolved_parent(&npc.trope_child),
            Some(&npc.archetype_parent)
        );
    }

    #[test]
    fn prop_same_seed_same_npc(seed in any::<u64>(), x in 0i64..3) {
        let fixture = Fixture::new();
        let grid = strip_grid("Props", &[Some(50), Some(60), Some(40)]);
        let generator = NpcGenerator::new(
            &fixture.rules,
            &fixture.index,
            &fixture.tropes,
            &fixture.mapping,
            GeneratorConfig::default(),
        );

        let first = generator.generate(&grid, x, 0, seed).unwrap();
        let second = generator.generate(&grid, x, 0, seed).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
