//! Biome registry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Land-cover class code as used in terrain files.
pub type BiomeCode = i64;

/// Descriptive attributes of one biome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeDefinition {
    pub code: BiomeCode,
    pub name: String,
    /// Narrative theme used for trope hints and exclusions.
    pub theme: String,
    #[serde(default = "default_attribute")]
    pub harshness: f64,
    #[serde(default = "default_attribute")]
    pub population_density: f64,
    #[serde(default = "default_attribute")]
    pub isolation: f64,
}

fn default_attribute() -> f64 {
    0.5
}

impl BiomeDefinition {
    pub fn new(code: BiomeCode, name: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            theme: theme.into(),
            harshness: default_attribute(),
            population_density: default_attribute(),
            isolation: default_attribute(),
        }
    }

    pub fn with_attributes(mut self, harshness: f64, population_density: f64, isolation: f64) -> Self {
        self.harshness = harshness;
        self.population_density = population_density;
        self.isolation = isolation;
        self
    }

    /// Attributes that fall outside `[0, 1]`, by name.
    pub(crate) fn out_of_range(&self) -> Vec<&'static str> {
        [
            ("harshness", self.harshness),
            ("population_density", self.population_density),
            ("isolation", self.isolation),
        ]
        .into_iter()
        .filter(|(_, v)| !(0.0..=1.0).contains(v))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Code → definition lookup, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiomeRegistry {
    biomes: IndexMap<BiomeCode, BiomeDefinition>,
}

impl BiomeRegistry {
    /// Build a registry. Returns the codes that were declared more than once;
    /// the first declaration of each wins.
    pub fn from_definitions(defs: Vec<BiomeDefinition>) -> (Self, Vec<BiomeCode>) {
        let mut biomes = IndexMap::with_capacity(defs.len());
        let mut duplicates = Vec::new();
        for def in defs {
            if biomes.contains_key(&def.code) {
                duplicates.push(def.code);
                continue;
            }
            biomes.insert(def.code, def);
        }
        (Self { biomes }, duplicates)
    }

    pub fn get(&self, code: BiomeCode) -> Option<&BiomeDefinition> {
        self.biomes.get(&code)
    }

    pub fn contains(&self, code: BiomeCode) -> bool {
        self.biomes.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BiomeDefinition> {
        self.biomes.values()
    }

    pub(crate) fn insert(&mut self, def: BiomeDefinition) {
        self.biomes.insert(def.code, def);
    }
}
