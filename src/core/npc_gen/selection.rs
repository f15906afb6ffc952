//! Seeded archetype and trope selection.
//!
//! Candidate lists always follow catalog order, so a given RNG state picks
//! the same element on every run.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::errors::{NpcGenError, Result};
use crate::core::catalog::{ArchetypeId, ArchetypeIndex, ArchetypeParent, TropeChild};
use crate::core::mapping::MappingTable;
use crate::core::rules::RuleSet;

/// What to do when theme exclusions remove every themed trope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionFallback {
    /// Choose from every trope mapped to the archetype.
    #[default]
    FullCandidates,
    /// Ignore the exclusions and choose from the themed tropes.
    KeepThemed,
}

/// Uniform choice among the pool ids that exist in the catalog.
pub fn select_archetype<'a, R: Rng + ?Sized>(
    index: &'a ArchetypeIndex,
    allowed_ids: &[ArchetypeId],
    rng: &mut R,
) -> Result<&'a ArchetypeParent> {
    let candidates: Vec<&ArchetypeParent> =
        allowed_ids.iter().filter_map(|id| index.get(id)).collect();

    candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| NpcGenError::NoValidArchetypes {
            pool: allowed_ids.to_vec(),
        })
}

fn tag_contains_any(tag: &str, keywords: &[String]) -> bool {
    let tag = tag.to_lowercase();
    keywords.iter().any(|k| tag.contains(k.as_str()))
}

/// Pick a trope mapped to `parent_id`, preferring ones whose genre tag fits
/// the biome theme.
///
/// Themed tropes are those whose tag contains a theme hint keyword. Tags that
/// contain an exclusion keyword are then removed from the themed set; if that
/// empties it, `policy` decides what to choose from.
pub fn select_trope<'a, R: Rng + ?Sized>(
    tropes: &'a [TropeChild],
    mapping: &MappingTable,
    parent_id: &ArchetypeId,
    theme: &str,
    rules: &RuleSet,
    policy: ExclusionFallback,
    rng: &mut R,
) -> Result<&'a TropeChild> {
    let candidates: Vec<&TropeChild> = tropes
        .iter()
        .filter(|t| mapping.resolved_parent(&t.id) == Some(parent_id))
        .collect();

    if candidates.is_empty() {
        return Err(NpcGenError::no_tropes_for_parent(parent_id.clone()));
    }

    let hints = rules.theme_hints(theme);
    let themed: Vec<&TropeChild> = candidates
        .iter()
        .copied()
        .filter(|t| t.genre_tag.as_deref().is_some_and(|tag| tag_contains_any(tag, hints)))
        .collect();

    let exclusions = rules.theme_exclusions(theme);
    let pool = if themed.is_empty() || exclusions.is_empty() {
        themed
    } else {
        let kept: Vec<&TropeChild> = themed
            .iter()
            .copied()
            .filter(|t| !t.genre_tag.as_deref().is_some_and(|tag| tag_contains_any(tag, exclusions)))
            .collect();
        if kept.is_empty() && policy == ExclusionFallback::KeepThemed {
            log::debug!("Theme exclusions removed every themed trope for '{theme}'; keeping themed set");
            themed
        } else {
            kept
        }
    };

    let pool = if pool.is_empty() { &candidates } else { &pool };
    pool.choose(rng)
        .copied()
        .ok_or_else(|| NpcGenError::no_tropes_for_parent(parent_id.clone()))
}
