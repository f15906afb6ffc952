//! Designer rule tables: archetype pools, trait modifiers and theme keywords.
//!
//! The built-in tables live in `data/rules.yaml` and are compiled into the
//! binary. A replacement document with the same shape can be loaded from disk.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::biome::{BiomeCode, BiomeDefinition, BiomeRegistry};
use super::error::{Result, RuleError};
use crate::core::catalog::{ArchetypeId, ArchetypeIndex, OceanTrait, TraitDeltas};

const BUILTIN_RULES: &str = include_str!("../../../data/rules.yaml");

/// On-disk shape of a rules document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RuleDocument {
    #[serde(default)]
    biomes: Vec<BiomeDefinition>,
    #[serde(default)]
    archetype_pools: BTreeMap<BiomeCode, Vec<String>>,
    #[serde(default)]
    trait_modifiers: BTreeMap<BiomeCode, BTreeMap<String, f64>>,
    #[serde(default)]
    theme_hints: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    theme_exclusions: BTreeMap<String, Vec<String>>,
}

/// Parsed rule tables.
///
/// Theme keywords are stored lowercased. Problems found while converting the
/// document (duplicate codes, unknown trait names) are kept and reported by
/// [`RuleSet::validate`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    biomes: BiomeRegistry,
    archetype_pools: BTreeMap<BiomeCode, Vec<ArchetypeId>>,
    trait_modifiers: BTreeMap<BiomeCode, TraitDeltas>,
    theme_hints: BTreeMap<String, Vec<String>>,
    theme_exclusions: BTreeMap<String, Vec<String>>,
    load_problems: Vec<String>,
}

impl RuleSet {
    /// The compiled-in rule tables.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_RULES, "built-in rules")
    }

    /// Built-in tables, or the given file when set.
    pub fn load(rules_file: Option<&Path>) -> Result<Self> {
        match rules_file {
            Some(path) => Self::from_yaml_file(path),
            None => Self::builtin(),
        }
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading rule tables from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text, &path.display().to_string())
    }

    pub fn from_yaml_str(text: &str, source_name: &str) -> Result<Self> {
        let doc: RuleDocument = serde_yaml_ng::from_str(text).map_err(|source| RuleError::Parse {
            source_name: source_name.to_string(),
            source,
        })?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: RuleDocument) -> Self {
        let mut load_problems = Vec::new();

        let (biomes, duplicates) = BiomeRegistry::from_definitions(doc.biomes);
        for code in duplicates {
            load_problems.push(format!("biome code {code} is declared more than once"));
        }

        let archetype_pools = doc
            .archetype_pools
            .into_iter()
            .map(|(code, ids)| (code, ids.into_iter().map(ArchetypeId::from).collect()))
            .collect();

        let mut trait_modifiers = BTreeMap::new();
        for (code, raw) in doc.trait_modifiers {
            let mut deltas = TraitDeltas::new();
            for (name, delta) in raw {
                match OceanTrait::parse(&name) {
                    Some(t) => deltas = deltas.with(t, delta),
                    None => load_problems.push(format!(
                        "trait modifiers for biome {code} name unknown trait '{name}'"
                    )),
                }
            }
            trait_modifiers.insert(code, deltas);
        }

        Self {
            biomes,
            archetype_pools,
            trait_modifiers,
            theme_hints: lowercase_keywords(doc.theme_hints),
            theme_exclusions: lowercase_keywords(doc.theme_exclusions),
            load_problems,
        }
    }

    /// Empty tables, for assembling rules in code.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_biome(mut self, biome: BiomeDefinition) -> Self {
        self.biomes.insert(biome);
        self
    }

    pub fn with_pool<I, S>(mut self, code: BiomeCode, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ArchetypeId>,
    {
        self.archetype_pools
            .insert(code, ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_modifiers(mut self, code: BiomeCode, deltas: TraitDeltas) -> Self {
        self.trait_modifiers.insert(code, deltas);
        self
    }

    pub fn with_theme_hints<I, S>(mut self, theme: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.theme_hints.insert(theme.into(), lowercase_all(keywords));
        self
    }

    pub fn with_theme_exclusions<I, S>(mut self, theme: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.theme_exclusions.insert(theme.into(), lowercase_all(keywords));
        self
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn biomes(&self) -> &BiomeRegistry {
        &self.biomes
    }

    pub fn biome(&self, code: BiomeCode) -> Option<&BiomeDefinition> {
        self.biomes.get(code)
    }

    /// Allowed archetype ids for a biome, in designer order. Empty when the
    /// biome has no pool.
    pub fn archetype_pool(&self, code: BiomeCode) -> &[ArchetypeId] {
        self.archetype_pools
            .get(&code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Trait deltas for a biome; all zero when none are defined.
    pub fn trait_modifiers(&self, code: BiomeCode) -> TraitDeltas {
        self.trait_modifiers.get(&code).cloned().unwrap_or_default()
    }

    pub fn theme_hints(&self, theme: &str) -> &[String] {
        self.theme_hints.get(theme).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn theme_exclusions(&self, theme: &str) -> &[String] {
        self.theme_exclusions
            .get(theme)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Check the tables for structural problems.
    ///
    /// `fallback_biome` must be registered and have a non-empty pool.
    pub fn validate(&self, fallback_biome: BiomeCode) -> Result<()> {
        let problems = self.problems(fallback_biome);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(RuleError::Invalid { problems })
        }
    }

    pub fn problems(&self, fallback_biome: BiomeCode) -> Vec<String> {
        let mut problems = self.load_problems.clone();

        for biome in self.biomes.iter() {
            let bad = biome.out_of_range();
            if !bad.is_empty() {
                problems.push(format!(
                    "biome {} has attributes outside [0, 1]: {}",
                    biome.code,
                    bad.join(", ")
                ));
            }
            if self.archetype_pool(biome.code).is_empty() {
                problems.push(format!("biome {} has no archetype pool", biome.code));
            }
        }

        for (code, pool) in &self.archetype_pools {
            if !self.biomes.contains(*code) {
                problems.push(format!("archetype pool defined for unregistered biome {code}"));
            }
            if pool.is_empty() {
                problems.push(format!("archetype pool for biome {code} is empty"));
            }
        }

        for code in self.trait_modifiers.keys() {
            if !self.biomes.contains(*code) {
                problems.push(format!("trait modifiers defined for unregistered biome {code}"));
            }
        }

        if !self.biomes.contains(fallback_biome) {
            problems.push(format!("fallback biome {fallback_biome} is not registered"));
        }

        problems
    }

    /// Pool entries that do not name an archetype in the catalog.
    pub fn unknown_archetypes(&self, index: &ArchetypeIndex) -> Vec<(BiomeCode, ArchetypeId)> {
        self.archetype_pools
            .iter()
            .flat_map(|(code, pool)| {
                pool.iter()
                    .filter(|id| !index.contains(id))
                    .map(move |id| (*code, id.clone()))
            })
            .collect()
    }

    /// Render the tables back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        let doc = RuleDocument {
            biomes: self.biomes.iter().cloned().collect(),
            archetype_pools: self
                .archetype_pools
                .iter()
                .map(|(code, ids)| (*code, ids.iter().map(|id| id.as_str().to_string()).collect()))
                .collect(),
            trait_modifiers: self
                .trait_modifiers
                .iter()
                .map(|(code, deltas)| {
                    let raw = deltas
                        .iter()
                        .map(|(t, d)| (t.as_str().to_string(), *d))
                        .collect();
                    (*code, raw)
                })
                .collect(),
            theme_hints: self.theme_hints.clone(),
            theme_exclusions: self.theme_exclusions.clone(),
        };
        serde_yaml_ng::to_string(&doc).map_err(|source| RuleError::Parse {
            source_name: "rule tables".to_string(),
            source,
        })
    }
}

fn lowercase_all<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().to_lowercase())
        .collect()
}

fn lowercase_keywords(table: BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
    table
        .into_iter()
        .map(|(theme, kws)| (theme, lowercase_all(kws)))
        .collect()
}
