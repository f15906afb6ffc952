//! Trope → parent archetype mapping table.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::catalog::{ArchetypeId, ArchetypeIndex, ArchetypeParent, TropeChild, TropeId};

/// Decimal places kept for confidence scores.
const SCORE_PRECISION: f64 = 10_000.0;

/// Resolution of one trope to its nearest parent archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRow {
    pub child_id: TropeId,
    pub child_name: String,
    pub resolved_parent_id: ArchetypeId,
    pub resolved_parent_name: String,
    /// Cosine similarity, rounded to 4 decimals.
    pub confidence_score: f64,
    pub review_needed: bool,
}

impl MappingRow {
    /// Build a row, rounding the score first so that `review_needed` agrees
    /// with the stored value.
    pub fn new(child: &TropeChild, parent: &ArchetypeParent, score: f64, threshold: f64) -> Self {
        let confidence_score = (score * SCORE_PRECISION).round() / SCORE_PRECISION;
        Self {
            child_id: child.id.clone(),
            child_name: child.name.clone(),
            resolved_parent_id: parent.id.clone(),
            resolved_parent_name: parent.name.clone(),
            confidence_score,
            review_needed: confidence_score < threshold,
        }
    }
}

/// Counts reported after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    pub total: usize,
    pub review_needed: usize,
}

/// Ordered mapping rows with lookup by child id.
///
/// Serializes as a plain JSON array of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MappingRow>", into = "Vec<MappingRow>")]
pub struct MappingTable {
    rows: Vec<MappingRow>,
    by_child: HashMap<TropeId, usize>,
}

impl From<Vec<MappingRow>> for MappingTable {
    fn from(rows: Vec<MappingRow>) -> Self {
        Self::from_rows(rows)
    }
}

impl From<MappingTable> for Vec<MappingRow> {
    fn from(table: MappingTable) -> Self {
        table.rows
    }
}

impl MappingTable {
    /// Index rows. On duplicate child ids the first row wins the lookup.
    pub fn from_rows(rows: Vec<MappingRow>) -> Self {
        let mut by_child = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            by_child.entry(row.child_id.clone()).or_insert(i);
        }
        Self { rows, by_child }
    }

    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, child_id: &TropeId) -> Option<&MappingRow> {
        self.by_child.get(child_id).map(|i| &self.rows[*i])
    }

    pub fn resolved_parent(&self, child_id: &TropeId) -> Option<&ArchetypeId> {
        self.get(child_id).map(|row| &row.resolved_parent_id)
    }

    /// Recompute `review_needed` from the stored scores. Returns how many
    /// flags changed.
    pub fn apply_threshold(&mut self, threshold: f64) -> usize {
        let mut changed = 0;
        for row in &mut self.rows {
            let flagged = row.confidence_score < threshold;
            if row.review_needed != flagged {
                row.review_needed = flagged;
                changed += 1;
            }
        }
        changed
    }

    pub fn summary(&self) -> MappingSummary {
        MappingSummary {
            total: self.rows.len(),
            review_needed: self.rows.iter().filter(|r| r.review_needed).count(),
        }
    }

    /// Compare a (possibly cached) table with the current catalogs.
    ///
    /// Returns one message per problem and logs each as a warning. An empty
    /// result means every trope has exactly one row and every row points at a
    /// known archetype.
    pub fn check_against(&self, index: &ArchetypeIndex, tropes: &[TropeChild]) -> Vec<String> {
        let mut problems = Vec::new();

        let mut seen = HashSet::new();
        for row in &self.rows {
            if !seen.insert(&row.child_id) {
                problems.push(format!("trope {} has more than one mapping row", row.child_id));
            }
            if !index.contains(&row.resolved_parent_id) {
                problems.push(format!(
                    "trope {} maps to unknown archetype {}",
                    row.child_id, row.resolved_parent_id
                ));
            }
        }

        let known: HashSet<&TropeId> = tropes.iter().map(|t| &t.id).collect();
        for trope in tropes {
            if !self.by_child.contains_key(&trope.id) {
                problems.push(format!("trope {} has no mapping row", trope.id));
            }
        }
        for row in &self.rows {
            if !known.contains(&row.child_id) {
                problems.push(format!("mapping row for unknown trope {}", row.child_id));
            }
        }

        for problem in &problems {
            log::warn!("Stale mapping: {problem}");
        }
        problems
    }
}
