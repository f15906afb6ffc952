//! Property-based tests for npcforge
//!
//! Properties are checked with proptest over generated inputs rather than
//! fixed cases.
//!
//! ## Test Modules
//!
//! - `ocean_props`: trait scores stay in `[0, 1]` on a 0.001 grid; the
//!   dominant trait holds the maximum score
//! - `selection_props`: chosen archetypes come from the biome pool, chosen
//!   tropes map to the chosen archetype, equal seeds give equal NPCs
//! - `mapping_props`: every trope gets exactly one row; `review_needed`
//!   agrees with the stored score

mod mapping_props;
mod ocean_props;
mod selection_props;
