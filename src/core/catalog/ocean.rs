//! OCEAN (five-factor) trait model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five personality factors.
///
/// Declaration order is the canonical enumeration order used for dominant-trait
/// tie-breaking and for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OceanTrait {
    Openness,
    Conscientiousness,
    Extroversion,
    Agreeableness,
    Neuroticism,
}

impl OceanTrait {
    pub const ALL: [OceanTrait; 5] = [
        OceanTrait::Openness,
        OceanTrait::Conscientiousness,
        OceanTrait::Extroversion,
        OceanTrait::Agreeableness,
        OceanTrait::Neuroticism,
    ];

    /// Catalog key for this trait.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openness => "openness",
            Self::Conscientiousness => "conscientiousness",
            Self::Extroversion => "extroversion",
            Self::Agreeableness => "agreeableness",
            Self::Neuroticism => "neuroticism",
        }
    }

    /// Capitalized display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Openness => "Openness",
            Self::Conscientiousness => "Conscientiousness",
            Self::Extroversion => "Extroversion",
            Self::Agreeableness => "Agreeableness",
            Self::Neuroticism => "Neuroticism",
        }
    }

    /// Parse a catalog key, case-insensitively. Accepts the "extraversion"
    /// spelling as well.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openness" => Some(Self::Openness),
            "conscientiousness" => Some(Self::Conscientiousness),
            "extroversion" | "extraversion" => Some(Self::Extroversion),
            "agreeableness" => Some(Self::Agreeableness),
            "neuroticism" => Some(Self::Neuroticism),
            _ => None,
        }
    }
}

impl fmt::Display for OceanTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// OceanScores
// ============================================================================

/// Final trait values for one NPC, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OceanScores {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extroversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl OceanScores {
    pub fn from_fn(mut f: impl FnMut(OceanTrait) -> f64) -> Self {
        Self {
            openness: f(OceanTrait::Openness),
            conscientiousness: f(OceanTrait::Conscientiousness),
            extroversion: f(OceanTrait::Extroversion),
            agreeableness: f(OceanTrait::Agreeableness),
            neuroticism: f(OceanTrait::Neuroticism),
        }
    }

    pub fn get(&self, ocean_trait: OceanTrait) -> f64 {
        match ocean_trait {
            OceanTrait::Openness => self.openness,
            OceanTrait::Conscientiousness => self.conscientiousness,
            OceanTrait::Extroversion => self.extroversion,
            OceanTrait::Agreeableness => self.agreeableness,
            OceanTrait::Neuroticism => self.neuroticism,
        }
    }

    /// `(trait, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (OceanTrait, f64)> + '_ {
        OceanTrait::ALL.iter().map(move |t| (*t, self.get(*t)))
    }
}

// ============================================================================
// TraitDeltas
// ============================================================================

/// Signed per-trait adjustments contributed by a biome. Absent traits are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitDeltas(BTreeMap<OceanTrait, f64>);

impl TraitDeltas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ocean_trait: OceanTrait, delta: f64) -> Self {
        self.0.insert(ocean_trait, delta);
        self
    }

    pub fn get(&self, ocean_trait: OceanTrait) -> f64 {
        self.0.get(&ocean_trait).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|d| *d == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OceanTrait, &f64)> {
        self.0.iter()
    }
}
