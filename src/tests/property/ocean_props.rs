//! Property-based tests for biome trait modifiers

use proptest::prelude::*;

use crate::core::catalog::{ArchetypeParent, OceanScores, OceanTrait, TraitDeltas};
use crate::core::npc_gen::ocean::{apply_modifiers, dominant_trait, MINIMAL_INFLUENCE};

fn arb_trait() -> impl Strategy<Value = OceanTrait> {
    prop::sample::select(OceanTrait::ALL.to_vec())
}

fn arb_scores() -> impl Strategy<Value = OceanScores> {
    prop::array::uniform5(0.0f64..=1.0).prop_map(|v| OceanScores {
        openness: v[0],
        conscientiousness: v[1],
        extroversion: v[2],
        agreeableness: v[3],
        neuroticism: v[4],
    })
}

proptest! {
    #[test]
    fn prop_scores_clamped_to_unit_interval(
        t in arb_trait(),
        baseline in -0.5f64..=1.5,
        delta in -1.0f64..=1.0,
    ) {
        let parent = ArchetypeParent::new("A1", "Anyone").with_bias(t, baseline);
        let (scores, _) = apply_modifiers(&parent, &TraitDeltas::new().with(t, delta));

        for (_, value) in scores.iter() {
            prop_assert!((0.0..=1.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn prop_scores_on_thousandths_grid(
        t in arb_trait(),
        baseline in 0.0f64..=1.0,
        delta in -0.5f64..=0.5,
    ) {
        let parent = ArchetypeParent::new("A1", "Anyone").with_bias(t, baseline);
        let (scores, _) = apply_modifiers(&parent, &TraitDeltas::new().with(t, delta));

        let value = scores.get(t);
        let snapped = (value * 1000.0).round() / 1000.0;
        prop_assert!((value - snapped).abs() < 1e-12);
    }

    #[test]
    fn prop_no_deltas_means_minimal_influence(t in arb_trait(), baseline in 0.0f64..=1.0) {
        let parent = ArchetypeParent::new("A1", "Anyone").with_bias(t, baseline);
        let (_, explanation) = apply_modifiers(&parent, &TraitDeltas::new());
        prop_assert_eq!(explanation, MINIMAL_INFLUENCE);
    }

    #[test]
    fn prop_dominant_trait_holds_maximum(scores in arb_scores()) {
        let best = scores.get(dominant_trait(&scores));
        for (_, value) in scores.iter() {
            prop_assert!(best >= value);
        }
    }
}
