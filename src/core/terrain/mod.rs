//! Terrain grid: the coordinate → geography lookup consumed by NPC synthesis.

pub mod cell;
pub mod grid;
pub mod latitude;

pub use cell::{GeoData, WorldCell};
pub use grid::TerrainGrid;
