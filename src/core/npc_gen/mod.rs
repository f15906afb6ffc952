//! NPC Generation Module
//!
//! Biome-aware NPC synthesis:
//! - `ocean`: biome trait modifiers and dominant-trait labelling
//! - `selection`: seeded archetype and trope choice
//! - `generator`: the per-coordinate orchestrator
//! - `record`: the generated NPC document

pub mod errors;
pub mod generator;
pub mod ocean;
pub mod record;
pub mod selection;

pub use errors::{NpcGenError, Result};
pub use generator::{generate_npc, GeneratorConfig, NpcGenerator, DEFAULT_FALLBACK_BIOME, DEFAULT_SEED};
pub use ocean::{apply_modifiers, dominant_label, dominant_trait};
pub use record::{Coordinates, Narrative, NpcRecord, Origin, Psychometrics};
pub use selection::{select_archetype, select_trope, ExclusionFallback};
