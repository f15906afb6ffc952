//! File ingestion for catalogs and terrain maps.
//!
//! Loaders recover locally from row-level defects (drop and warn) and fail
//! only on missing files or wrong document shapes.

pub mod catalogs;
pub mod errors;
pub mod json;
pub mod terrain;

pub use catalogs::{ArchetypeLoader, TropeLoader};
pub use errors::{IngestError, Result};
pub use terrain::TerrainLoader;
