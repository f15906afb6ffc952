//! Biome registry and designer rule tables.

pub mod biome;
pub mod error;
pub mod ruleset;

pub use biome::{BiomeCode, BiomeDefinition, BiomeRegistry};
pub use error::{Result, RuleError};
pub use ruleset::RuleSet;
