//! Trope → parent archetype resolution and its cached artifact.

pub mod error;
pub mod resolver;
pub mod store;
pub mod table;

pub use error::{MappingError, Result};
pub use resolver::{
    child_descriptor, parent_descriptor, MappingConfig, TropeResolver, DEFAULT_BATCH_SIZE,
    DEFAULT_MAPPING_THRESHOLD,
};
pub use store::{MappingStore, DEFAULT_MAPPING_FILE};
pub use table::{MappingRow, MappingSummary, MappingTable};
