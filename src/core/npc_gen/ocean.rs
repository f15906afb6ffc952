//! Biome-conditioned OCEAN trait computation.

use crate::core::catalog::{ArchetypeParent, OceanScores, OceanTrait, TraitDeltas};

const TRAIT_PRECISION: f64 = 1_000.0;

pub const MINIMAL_INFLUENCE: &str = "Minimal environmental influence.";

/// Apply biome deltas to an archetype's baseline.
///
/// Each trait is `clamp(baseline + delta, 0, 1)` rounded to 3 decimals.
/// Returns the scores and a human-readable account of the non-zero deltas.
pub fn apply_modifiers(parent: &ArchetypeParent, deltas: &TraitDeltas) -> (OceanScores, String) {
    let scores = OceanScores::from_fn(|t| {
        let value = (parent.baseline(t) + deltas.get(t)).clamp(0.0, 1.0);
        (value * TRAIT_PRECISION).round() / TRAIT_PRECISION
    });

    let fragments: Vec<String> = OceanTrait::ALL
        .iter()
        .filter_map(|t| {
            let delta = deltas.get(*t);
            if delta == 0.0 {
                return None;
            }
            let sign = if delta > 0.0 { "+" } else { "" };
            Some(format!("{t} {sign}{delta}"))
        })
        .collect();

    let explanation = if fragments.is_empty() {
        MINIMAL_INFLUENCE.to_string()
    } else {
        format!("Biome influence: {}", fragments.join(", "))
    };

    (scores, explanation)
}

/// Highest-scoring trait; ties go to the earliest trait in canonical order.
pub fn dominant_trait(scores: &OceanScores) -> OceanTrait {
    let mut best = OceanTrait::Openness;
    for t in OceanTrait::ALL {
        if scores.get(t) > scores.get(best) {
            best = t;
        }
    }
    best
}

/// `"High <Trait>"`.
pub fn dominant_label(scores: &OceanScores) -> String {
    format!("High {}", dominant_trait(scores).label())
}
