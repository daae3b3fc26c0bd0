//! Field transformers.
//!
//! A field transformer turns one logical form field into a fixed number of
//! output columns. Every transformer can produce a single row for a
//! submission; transformers whose field can hold several sub-items may also
//! expose the multi-row capability through [`FieldTransformer::as_multi_row`].
//!
//! ```text
//! catalogue:   [ name (1) ][ address (3)      ][ likert (1) ]
//! offsets:       0           1                  4
//! ```
//!
//! A transformer's first absolute column is the sum of the column counts of
//! every transformer before it; [`Catalogue`] is the only place that sum is
//! computed.
//!
//! - [`base`] - scalar fields
//! - [`separable`] - fields that may split their sub-items into rows
//! - [`likert`] - survey likert fields with optional score output
//! - [`factory`] - builds a catalogue from form definitions and settings

pub mod base;
pub mod factory;
pub mod likert;
pub mod separable;

pub use base::BaseField;
pub use factory::build_catalogue;
pub use likert::{LikertConfig, SurveyLikertField};
pub use separable::{Separable, SeparableField, SeparationConfig};

use crate::error::{CatalogueError, CatalogueResult};
use crate::models::Submission;
use crate::values::{CellValue, FieldId, FieldRef};

/// One row of cells produced by a single transformer.
pub type Row = Vec<CellValue>;

/// Lazy sequence of rows from a multi-row transformer.
pub type Rows<'a> = Box<dyn Iterator<Item = Row> + 'a>;

/// Translates one form field into output cells.
pub trait FieldTransformer {
    /// The field this transformer represents.
    fn field(&self) -> &FieldRef;

    /// Column labels; their count is fixed for the transformer's lifetime.
    fn columns(&self) -> Vec<String>;

    fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Exactly one row, one cell per column. Missing data yields default cells.
    fn row(&self, submission: &Submission) -> Row;

    /// The multi-row capability, when this transformer currently has it.
    fn as_multi_row(&self) -> Option<&dyn MultiRowTransformer> {
        None
    }
}

/// Transformers that emit zero or more rows per submission.
///
/// The order of the rows is the order their values are folded in.
pub trait MultiRowTransformer: FieldTransformer {
    fn rows<'a>(&'a self, submission: &'a Submission) -> Rows<'a>;
}

/// Rows of `transformer` for `submission`, dispatched on capability.
pub fn field_rows<'a>(
    transformer: &'a dyn FieldTransformer,
    submission: &'a Submission,
) -> Rows<'a> {
    match transformer.as_multi_row() {
        Some(multi) => multi.rows(submission),
        None => Box::new(std::iter::once(transformer.row(submission))),
    }
}

// =============================================================================
// Catalogue
// =============================================================================

/// The ordered list of transformers for one export pass.
///
/// Column counts are captured once at construction, so offsets can never
/// drift from what the transformers declared.
pub struct Catalogue {
    transformers: Vec<Box<dyn FieldTransformer>>,
    widths: Vec<usize>,
}

impl Catalogue {
    /// Build a catalogue, rejecting transformers that declare no columns.
    pub fn new(transformers: Vec<Box<dyn FieldTransformer>>) -> CatalogueResult<Self> {
        let mut widths = Vec::with_capacity(transformers.len());
        for transformer in &transformers {
            let width = transformer.column_count();
            if width == 0 {
                return Err(CatalogueError::EmptyColumns {
                    field: transformer.field().id.clone(),
                });
            }
            widths.push(width);
        }

        Ok(Self {
            transformers,
            widths,
        })
    }

    pub fn transformers(&self) -> impl Iterator<Item = &dyn FieldTransformer> {
        self.transformers.iter().map(|t| t.as_ref())
    }

    /// Each transformer with its first absolute column and its width.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, &dyn FieldTransformer)> {
        self.widths
            .iter()
            .scan(0usize, |offset, &width| {
                let start = *offset;
                *offset += width;
                Some((start, width))
            })
            .zip(self.transformers())
            .map(|((start, width), t)| (start, width, t))
    }

    /// First absolute column of every transformer.
    pub fn offsets(&self) -> Vec<usize> {
        self.entries().map(|(offset, _, _)| offset).collect()
    }

    /// Total number of output columns.
    pub fn width(&self) -> usize {
        self.widths.iter().sum()
    }

    /// All column labels in output order.
    pub fn columns(&self) -> Vec<String> {
        self.transformers().flat_map(|t| t.columns()).collect()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl std::fmt::Debug for Catalogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&FieldId> = self.transformers().map(|t| &t.field().id).collect();
        f.debug_struct("Catalogue")
            .field("fields", &fields)
            .field("widths", &self.widths)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Hand-rolled transformers for combiner and catalogue tests.

    use super::*;
    use crate::values::RawValue;

    /// Scalar transformer emitting fixed cells.
    pub struct Fixed {
        pub field: FieldRef,
        pub cells: Vec<RawValue>,
        pub declared: usize,
    }

    impl Fixed {
        pub fn new(id: &str, cells: Vec<RawValue>) -> Self {
            let declared = cells.len();
            Self {
                field: FieldRef::new(id, "text"),
                cells,
                declared,
            }
        }
    }

    impl FieldTransformer for Fixed {
        fn field(&self) -> &FieldRef {
            &self.field
        }

        fn columns(&self) -> Vec<String> {
            (0..self.declared).map(|i| format!("{} #{}", self.field.id, i)).collect()
        }

        fn row(&self, _submission: &Submission) -> Row {
            self.cells
                .iter()
                .map(|raw| CellValue::new(raw.clone(), self.field.clone()))
                .collect()
        }
    }

    /// Multi-row transformer emitting fixed rows.
    pub struct Repeater {
        pub field: FieldRef,
        pub rows: Vec<Vec<RawValue>>,
        pub width: usize,
    }

    impl Repeater {
        pub fn new(id: &str, width: usize, rows: Vec<Vec<RawValue>>) -> Self {
            Self {
                field: FieldRef::new(id, "list"),
                rows,
                width,
            }
        }
    }

    impl FieldTransformer for Repeater {
        fn field(&self) -> &FieldRef {
            &self.field
        }

        fn columns(&self) -> Vec<String> {
            (0..self.width).map(|i| format!("{} #{}", self.field.id, i)).collect()
        }

        fn row(&self, _submission: &Submission) -> Row {
            (0..self.width).map(|_| CellValue::empty(self.field.clone())).collect()
        }

        fn as_multi_row(&self) -> Option<&dyn MultiRowTransformer> {
            Some(self)
        }
    }

    impl MultiRowTransformer for Repeater {
        fn rows<'a>(&'a self, _submission: &'a Submission) -> Rows<'a> {
            Box::new(self.rows.iter().map(move |cells| {
                cells
                    .iter()
                    .map(|raw| CellValue::new(raw.clone(), self.field.clone()))
                    .collect()
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Fixed, Repeater};
    use super::*;

    fn text(s: &str) -> crate::values::RawValue {
        s.into()
    }

    #[test]
    fn test_offsets_follow_declared_widths() {
        let catalogue = Catalogue::new(vec![
            Box::new(Fixed::new("1", vec![text("a")])),
            Box::new(Fixed::new("2", vec![text("b"), text("c"), text("d")])),
            Box::new(Repeater::new("3", 2, vec![])),
        ])
        .unwrap();

        assert_eq!(catalogue.offsets(), vec![0, 1, 4]);
        assert_eq!(catalogue.width(), 6);
        assert_eq!(catalogue.columns().len(), 6);
        assert_eq!(catalogue.len(), 3);
    }

    #[test]
    fn test_zero_width_rejected() {
        let result = Catalogue::new(vec![
            Box::new(Fixed::new("1", vec![text("a")])),
            Box::new(Fixed::new("2", vec![])),
        ]);

        assert_eq!(
            result.unwrap_err(),
            CatalogueError::EmptyColumns {
                field: "2".into()
            }
        );
    }

    #[test]
    fn test_field_rows_dispatch() {
        let entry = Submission::new();

        let scalar = Fixed::new("1", vec![text("x")]);
        assert_eq!(field_rows(&scalar, &entry).count(), 1);

        let multi = Repeater::new("2", 1, vec![vec![text("a")], vec![text("b")]]);
        assert_eq!(field_rows(&multi, &entry).count(), 2);

        let none = Repeater::new("3", 1, vec![]);
        assert_eq!(field_rows(&none, &entry).count(), 0);
    }
}
