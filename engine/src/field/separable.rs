//! Fields that may separate their sub-items into rows.
//!
//! Checkbox, multi-select and list answers hold several sub-items. When
//! separation is enabled the transformer emits one row per sub-item and the
//! combiner folds them; otherwise the sub-items are joined into a single row
//! right here.
//!
//! Separation never produces extra output rows per submission. It only
//! decides whether sub-items reach the combiner as distinct values.

use serde_json::Value;

use super::base::BaseField;
use super::{FieldTransformer, MultiRowTransformer, Row, Rows};
use crate::config::DEFAULT_SUB_ITEM_SEPARATOR;
use crate::models::{is_blank, FieldDefinition, Submission};
use crate::values::{CellValue, FieldRef, RawValue};

/// Separation settings resolved for one field before the export pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparationConfig {
    pub enabled: bool,
    pub sub_item_separator: String,
}

impl SeparationConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.sub_item_separator = separator.into();
        self
    }
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sub_item_separator: DEFAULT_SUB_ITEM_SEPARATOR.to_string(),
        }
    }
}

/// A field transformer whose row cardinality depends on its own configuration.
pub trait Separable: FieldTransformer {
    fn is_separation_enabled(&self) -> bool;
}

/// Separable field over inputs, arrays and list rows.
#[derive(Debug, Clone)]
pub struct SeparableField {
    base: BaseField,
    config: SeparationConfig,
    width: usize,
}

impl SeparableField {
    pub fn new(definition: FieldDefinition, config: SeparationConfig) -> Self {
        let width = if has_list_columns(&definition) {
            definition.choices.len()
        } else {
            1
        };
        Self {
            base: BaseField::new(definition),
            config,
            width,
        }
    }

    pub fn config(&self) -> &SeparationConfig {
        &self.config
    }

    fn definition(&self) -> &FieldDefinition {
        self.base.definition()
    }

    fn has_list_columns(&self) -> bool {
        has_list_columns(self.definition())
    }

    /// Answered sub-items, each already `column_count()` cells wide.
    ///
    /// Sources, in order of preference: the field's sub-inputs, an array
    /// answer (or a JSON encoded one), a single scalar answer.
    pub fn sub_items(&self, submission: &Submission) -> Vec<Row> {
        let definition = self.definition();
        let field = self.field();

        if !definition.inputs.is_empty() {
            return definition
                .inputs
                .iter()
                .filter_map(|input| self.base.input_value(submission, &input.key()))
                .map(|raw| self.pad(vec![CellValue::new(raw, field.clone())]))
                .collect();
        }

        let Some(value) = submission.get_present(definition.id.as_str()) else {
            return Vec::new();
        };

        match decode_items(value) {
            Some(items) => items
                .iter()
                .filter(|item| !is_blank(item))
                .map(|item| self.item_cells(item))
                .collect(),
            None => vec![self.item_cells(value)],
        }
    }

    fn item_cells(&self, item: &Value) -> Row {
        let field = self.field();
        match item {
            Value::Object(map) if self.has_list_columns() => self
                .definition()
                .choices
                .iter()
                .map(|choice| {
                    map.get(&choice.text)
                        .or_else(|| map.get(&choice.value))
                        .filter(|v| !is_blank(v))
                        .map(|v| CellValue::new(RawValue::from_json(v), field.clone()))
                        .unwrap_or_else(|| CellValue::empty(field.clone()))
                })
                .collect(),
            other => self.pad(vec![CellValue::new(RawValue::from_json(other), field.clone())]),
        }
    }

    fn pad(&self, mut cells: Row) -> Row {
        cells.resize_with(self.width, || CellValue::empty(self.field().clone()));
        cells
    }
}

impl FieldTransformer for SeparableField {
    fn field(&self) -> &FieldRef {
        self.base.field()
    }

    fn columns(&self) -> Vec<String> {
        if self.has_list_columns() {
            self.definition()
                .choices
                .iter()
                .map(|choice| format!("{} ({})", self.definition().display_label(), choice.text))
                .collect()
        } else {
            self.base.columns()
        }
    }

    fn column_count(&self) -> usize {
        self.width
    }

    fn row(&self, submission: &Submission) -> Row {
        collapse(
            self.field(),
            self.column_count(),
            self.sub_items(submission),
            &self.config.sub_item_separator,
        )
    }

    fn as_multi_row(&self) -> Option<&dyn MultiRowTransformer> {
        if self.is_separation_enabled() {
            Some(self)
        } else {
            None
        }
    }
}

impl MultiRowTransformer for SeparableField {
    fn rows<'a>(&'a self, submission: &'a Submission) -> Rows<'a> {
        if !self.is_separation_enabled() {
            return Box::new(std::iter::once(self.row(submission)));
        }
        Box::new(self.sub_items(submission).into_iter())
    }
}

impl Separable for SeparableField {
    fn is_separation_enabled(&self) -> bool {
        self.config.enabled
    }
}

fn has_list_columns(definition: &FieldDefinition) -> bool {
    definition.enable_columns && !definition.choices.is_empty()
}

/// Join sub-items column by column into one row.
///
/// A single sub-item passes through with its types intact; blank cells are
/// skipped when joining so absent list cells leave no stray separators.
pub(crate) fn collapse(field: &FieldRef, width: usize, items: Vec<Row>, separator: &str) -> Row {
    match items.len() {
        0 => (0..width).map(|_| CellValue::empty(field.clone())).collect(),
        1 => items.into_iter().next().unwrap_or_default(),
        _ => (0..width)
            .map(|column| {
                let joined = items
                    .iter()
                    .filter_map(|cells| cells.get(column))
                    .filter(|cell| !cell.is_empty())
                    .map(CellValue::render)
                    .collect::<Vec<_>>()
                    .join(separator);
                CellValue::text(joined, field.clone())
            })
            .collect(),
    }
}

/// Array answers, including arrays stored as JSON text.
fn decode_items(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) if s.trim_start().starts_with('[') => {
            serde_json::from_str::<Vec<Value>>(s).ok()
        }
        _ => None,
    }
}
