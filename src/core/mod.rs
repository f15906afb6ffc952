pub mod catalog;
pub mod embedding;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod mapping;
pub mod npc_gen;
pub mod rules;
pub mod terrain;
