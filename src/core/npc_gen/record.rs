//! Generated NPC record.
//!
//! Field names and nesting match the JSON documents consumed downstream.

use serde::{Deserialize, Serialize};

use crate::core::catalog::{ArchetypeId, OceanScores, TropeId};
use crate::core::rules::BiomeCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcRecord {
    /// `NPC_GEN_x{x}y{y}`
    pub npc_id: String,
    pub name: String,
    pub archetype_parent: ArchetypeId,
    pub archetype_name: String,
    pub trope_child: TropeId,
    pub trope_name: String,
    pub origin: Origin,
    pub psychometrics: Psychometrics,
    pub narrative: Narrative,
}

impl NpcRecord {
    pub fn npc_id_for(x: i64, y: i64) -> String {
        format!("NPC_GEN_x{x}y{y}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub coordinates: Coordinates,
    pub biome_id: BiomeCode,
    pub mapped_theme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psychometrics {
    pub ocean_stats: OceanScores,
    /// `High <Trait>`
    pub dominant_trait: String,
    pub environmental_influence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub goal: Option<String>,
    pub fear: Option<String>,
    pub visual_description: Option<String>,
    pub dialogue_voice: String,
}
