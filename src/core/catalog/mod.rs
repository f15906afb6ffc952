//! Catalog data model: parent archetypes, child tropes and the OCEAN traits
//! that tie them to biome rules.

pub mod ocean;
pub mod types;

pub use ocean::{OceanScores, OceanTrait, TraitDeltas};
pub use types::{
    ArchetypeId, ArchetypeIndex, ArchetypeParent, TropeChild, TropeId, DEFAULT_TRAIT_BASELINE,
};
