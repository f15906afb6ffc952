//! Catalog records for parent archetypes and child tropes.
//!
//! - [`ArchetypeId`] / [`TropeId`]: type-safe identifiers
//! - [`ArchetypeParent`]: canonical personality template
//! - [`TropeChild`]: narrative concept with an unreliable parent hint
//! - [`ArchetypeIndex`]: id-keyed archetype lookup that keeps catalog order
//!
//! Records are immutable once loaded. Identity is the `id` field.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ocean::OceanTrait;

/// Baseline used for any trait an archetype does not declare.
pub const DEFAULT_TRAIT_BASELINE: f64 = 0.5;

// ============================================================================
// Identifiers
// ============================================================================

/// Type-safe wrapper for parent archetype identifiers (e.g. `ARCH_MENTOR_01`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeId(String);

impl ArchetypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArchetypeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ArchetypeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ArchetypeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Type-safe wrapper for child trope identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TropeId(String);

impl TropeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TropeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TropeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TropeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// ArchetypeParent
// ============================================================================

/// A canonical personality template with baseline OCEAN biases and a
/// narrative goal/fear pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeParent {
    pub id: ArchetypeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_category: Option<String>,
    /// Trait name to baseline value. Keys outside the five OCEAN traits are
    /// kept as loaded but never read.
    #[serde(default)]
    pub ocean_bias: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_fear: Option<String>,
}

impl ArchetypeParent {
    pub fn new(id: impl Into<ArchetypeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            function_category: None,
            ocean_bias: BTreeMap::new(),
            primary_goal: None,
            primary_fear: None,
        }
    }

    pub fn with_bias(mut self, ocean_trait: OceanTrait, value: f64) -> Self {
        self.ocean_bias.insert(ocean_trait.as_str().to_string(), value);
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.primary_goal = Some(goal.into());
        self
    }

    pub fn with_fear(mut self, fear: impl Into<String>) -> Self {
        self.primary_fear = Some(fear.into());
        self
    }

    pub fn with_function_category(mut self, category: impl Into<String>) -> Self {
        self.function_category = Some(category.into());
        self
    }

    /// Baseline value for a trait, [`DEFAULT_TRAIT_BASELINE`] when undeclared.
    pub fn baseline(&self, ocean_trait: OceanTrait) -> f64 {
        self.ocean_bias
            .get(ocean_trait.as_str())
            .copied()
            .unwrap_or(DEFAULT_TRAIT_BASELINE)
    }
}

// ============================================================================
// TropeChild
// ============================================================================

/// A concrete narrative character concept.
///
/// `parent_archetype` is the raw hint from the catalog. It is free text
/// (synonyms, abbreviations, prose) and must never be treated as an
/// [`ArchetypeId`]; resolution goes through the mapping table instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TropeChild {
    pub id: TropeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_archetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_tag: Option<String>,
}

impl TropeChild {
    pub fn new(id: impl Into<TropeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_archetype: None,
            description: None,
            genre_tag: None,
        }
    }

    pub fn with_parent_hint(mut self, hint: impl Into<String>) -> Self {
        self.parent_archetype = Some(hint.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_genre_tag(mut self, tag: impl Into<String>) -> Self {
        self.genre_tag = Some(tag.into());
        self
    }
}

// ============================================================================
// ArchetypeIndex
// ============================================================================

/// Archetypes keyed by id, iterated in catalog load order.
#[derive(Debug, Clone, Default)]
pub struct ArchetypeIndex {
    by_id: IndexMap<ArchetypeId, ArchetypeParent>,
}

impl ArchetypeIndex {
    /// Build an index from catalog rows. The first row wins on duplicate ids.
    pub fn from_parents(parents: impl IntoIterator<Item = ArchetypeParent>) -> Self {
        let mut by_id = IndexMap::new();
        for parent in parents {
            if by_id.contains_key(&parent.id) {
                log::warn!("Duplicate archetype id '{}' ignored", parent.id);
                continue;
            }
            by_id.insert(parent.id.clone(), parent);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &ArchetypeId) -> Option<&ArchetypeParent> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &ArchetypeId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Archetypes in load order.
    pub fn iter(&self) -> impl Iterator<Item = &ArchetypeParent> {
        self.by_id.values()
    }
}
