//! npcforge - biome-aware NPC synthesis
//!
//! Resolves free-text trope hints to canonical parent archetypes by embedding
//! similarity, then generates reproducible NPC profiles from terrain cells,
//! designer rule tables and a seed.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
