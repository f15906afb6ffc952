//! Parent archetype and child trope catalog loaders.
//!
//! Both catalogs are JSON arrays of objects. Loading is tolerant at the row
//! level and strict at the document level:
//!
//! | Defect | Handling |
//! |--------|----------|
//! | file missing | [`IngestError::NotFound`] |
//! | top level is not an array | [`IngestError::Malformed`] |
//! | row is not an object | skipped, warning per row |
//! | row without `id` or `name` | dropped, one warning with the count |
//! | trailing commas (tropes only) | repaired, warning |

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use super::errors::{IngestError, Result};
use super::json::{self, opt_str};
use crate::core::catalog::{ArchetypeParent, OceanTrait, TropeChild};

// ============================================================================
// Archetypes
// ============================================================================

/// Loads the parent archetype catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<ArchetypeParent>> {
        let path = path.as_ref();
        log::info!("Loading parent archetypes from {}", path.display());

        let text = json::read_text(path, "Parent archetypes file")?;
        let data = json::parse(&text, path)?;
        let rows = object_rows(data, path, "archetype")?;

        let parsed: Vec<ArchetypeParent> = rows.iter().map(archetype_from_row).collect();
        let archetypes = drop_incomplete(parsed, "archetypes", |a| {
            !a.id.is_empty() && !a.name.is_empty()
        });

        log::info!("Loaded {} parent archetypes", archetypes.len());
        Ok(archetypes)
    }
}

fn archetype_from_row(row: &Map<String, Value>) -> ArchetypeParent {
    ArchetypeParent {
        id: opt_str(row.get("id")).unwrap_or_default().into(),
        name: opt_str(row.get("name")).unwrap_or_default(),
        function_category: opt_str(row.get("function_category")),
        ocean_bias: ocean_bias(row.get("ocean_bias")),
        primary_goal: opt_str(row.get("primary_goal")),
        primary_fear: opt_str(row.get("primary_fear")),
    }
}

/// Numeric entries of an `ocean_bias` object, keyed by canonical trait name.
///
/// Keys go through [`OceanTrait::parse`], so catalogs accept the same
/// spellings as the rule tables. Unknown traits and non-numeric values are
/// dropped.
fn ocean_bias(value: Option<&Value>) -> BTreeMap<String, f64> {
    let Some(obj) = value.and_then(Value::as_object) else {
        return BTreeMap::new();
    };

    let mut bias = BTreeMap::new();
    for (key, raw) in obj {
        let Some(v) = json::as_f64(raw) else {
            continue;
        };
        match OceanTrait::parse(key) {
            Some(t) => {
                bias.insert(t.as_str().to_string(), v);
            }
            None => log::warn!("Ignoring unknown ocean_bias trait '{key}'"),
        }
    }
    bias
}

// ============================================================================
// Tropes
// ============================================================================

/// Loads the child trope catalog, repairing trailing commas if needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TropeLoader;

impl TropeLoader {
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<TropeChild>> {
        let path = path.as_ref();
        log::info!("Loading child tropes from {}", path.display());

        let text = json::read_text(path, "Child tropes file")?;
        let data = json::parse_with_repair(&text, path)?;
        let rows = object_rows(data, path, "trope")?;

        let parsed: Vec<TropeChild> = rows.iter().map(trope_from_row).collect();
        let tropes = drop_incomplete(parsed, "tropes", |t| !t.id.is_empty() && !t.name.is_empty());

        log::info!("Loaded {} child tropes", tropes.len());
        Ok(tropes)
    }
}

fn trope_from_row(row: &Map<String, Value>) -> TropeChild {
    TropeChild {
        id: opt_str(row.get("id")).unwrap_or_default().into(),
        name: opt_str(row.get("name")).unwrap_or_default(),
        parent_archetype: opt_str(row.get("parent_archetype")),
        description: opt_str(row.get("description")),
        genre_tag: opt_str(row.get("genre_tag")),
    }
}

// ============================================================================
// Shared row handling
// ============================================================================

fn object_rows(data: Value, path: &Path, row_kind: &str) -> Result<Vec<Map<String, Value>>> {
    let items = match data {
        Value::Array(items) => items,
        other => return Err(IngestError::malformed(path, "list", json::type_name(&other))),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Value::Object(obj) => Some(obj),
            other => {
                log::warn!("Skipping non-dict {row_kind} row {i}: {other}");
                None
            }
        })
        .collect())
}

fn drop_incomplete<T>(rows: Vec<T>, label: &str, keep: impl Fn(&T) -> bool) -> Vec<T> {
    let total = rows.len();
    let kept: Vec<T> = rows.into_iter().filter(|r| keep(r)).collect();
    if kept.len() != total {
        log::warn!("Dropped {} {label} missing id/name", total - kept.len());
    }
    kept
}
