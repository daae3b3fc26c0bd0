//! Combining field rows into one output row per submission.
//!
//! ```text
//! field rows                          buckets              combined row
//! ┌──────────┐                       ┌───────────┐        ┌───────────────┐
//! │ 1: [X]   │──────────────────────▶│ 0: X      │───────▶│ X             │
//! │ 2: [A]   │──┐                    │           │        │               │
//! │    [B]   │──┼───────────────────▶│ 1: A,B,C  │─fold──▶│ A\n---\nB\n.. │
//! │    [C]   │──┘                    │           │        │               │
//! └──────────┘                       └───────────┘        └───────────────┘
//! ```
//!
//! Cells are bucketed by absolute column: a transformer's local column `i`
//! lands in bucket `offset + i`, where `offset` comes from the catalogue's
//! declared widths. A bucket with one value keeps it as is; a bucket with
//! several is folded into a single text value with a join string chosen by a
//! [`JoinPolicy`].

pub mod policy;

pub use policy::{ConfiguredJoin, DefaultJoin, JoinPolicy};

use log::{debug, trace, warn};
use serde::Serialize;

use crate::error::{CatalogueError, CatalogueResult};
use crate::field::{field_rows, Catalogue};
use crate::models::Submission;
use crate::values::{CellValue, FieldRef, RawValue};

// =============================================================================
// Combined row
// =============================================================================

/// The single, aligned output row for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    /// The host's entry id, when the submission carried one
    pub entry_id: Option<String>,
    cells: Vec<CellValue>,
}

impl CombinedRow {
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Raw payloads, in column order.
    pub fn raw_values(&self) -> impl Iterator<Item = &RawValue> {
        self.cells.iter().map(CellValue::raw)
    }

    /// Text form of every cell, in column order.
    pub fn rendered(&self) -> Vec<String> {
        self.cells.iter().map(CellValue::render).collect()
    }

    pub fn into_cells(self) -> Vec<CellValue> {
        self.cells
    }
}

/// Serializes as a plain array of raw scalars.
impl Serialize for CombinedRow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.raw_values())
    }
}

// =============================================================================
// Combiner
// =============================================================================

/// Accumulates one combined row per processed submission.
///
/// A combiner serves a single export pass: rows are only ever appended, in
/// the order [`Combiner::parse_entry`] is called.
#[derive(Debug)]
pub struct Combiner<P = DefaultJoin> {
    policy: P,
    rows: Vec<CombinedRow>,
}

impl Combiner<DefaultJoin> {
    pub fn new() -> Self {
        Self::with_policy(DefaultJoin::default())
    }
}

impl Default for Combiner<DefaultJoin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: JoinPolicy> Combiner<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            policy,
            rows: Vec::new(),
        }
    }

    /// Combine every field's row(s) for `submission` into one row and store it.
    ///
    /// Fails without storing anything when a transformer emits a row whose
    /// width differs from what it declared.
    pub fn parse_entry(
        &mut self,
        catalogue: &Catalogue,
        submission: &Submission,
    ) -> CatalogueResult<()> {
        let mut buckets: Vec<Vec<CellValue>> = vec![Vec::new(); catalogue.width()];
        let mut owners: Vec<&FieldRef> = Vec::with_capacity(catalogue.width());

        for (offset, width, transformer) in catalogue.entries() {
            owners.extend(std::iter::repeat(transformer.field()).take(width));

            for cells in field_rows(transformer, submission) {
                if cells.len() != width {
                    return Err(CatalogueError::RowWidth {
                        field: transformer.field().id.clone(),
                        expected: width,
                        actual: cells.len(),
                    });
                }
                for (i, cell) in cells.into_iter().enumerate() {
                    buckets[offset + i].push(cell);
                }
            }
        }

        let cells = buckets
            .into_iter()
            .zip(owners)
            .enumerate()
            .map(|(column, (values, owner))| self.fold(column, values, owner))
            .collect();

        let row = CombinedRow {
            entry_id: submission.id(),
            cells,
        };
        debug!(
            "Combined entry {} into {} columns",
            row.entry_id.as_deref().unwrap_or("-"),
            row.len()
        );
        self.rows.push(row);
        Ok(())
    }

    /// Reduce one bucket to a single cell.
    fn fold(&self, column: usize, values: Vec<CellValue>, owner: &FieldRef) -> CellValue {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            warn!("Column {} received no value from field {}", column, owner.id);
            return CellValue::empty(owner.clone());
        };

        let rest: Vec<CellValue> = values.collect();
        if rest.is_empty() {
            return first;
        }

        trace!("Folding {} values in column {}", rest.len() + 1, column);

        let mut output = String::new();
        for value in std::iter::once(&first).chain(rest.iter()) {
            if !output.is_empty() {
                output.push_str(&self.policy.glue(value.field_category(), value.field_id(), value));
            }
            output.push_str(&value.render());
        }

        CellValue::text(output, first.field().clone())
    }

    /// All combined rows so far, in processing order. Can be iterated again.
    pub fn rows(&self) -> std::slice::Iter<'_, CombinedRow> {
        self.rows.iter()
    }

    /// Drain the combiner, ending the export pass.
    pub fn into_rows(self) -> std::vec::IntoIter<CombinedRow> {
        self.rows.into_iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column count of the combined rows; `0` until an entry is parsed.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, CombinedRow::len)
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<P> IntoIterator for Combiner<P> {
    type Item = CombinedRow;
    type IntoIter = std::vec::IntoIter<CombinedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
