//! Scalar field transformer.
//!
//! One column, one cell per submission. This is the fallback for every field
//! type without dedicated handling.

use serde_json::Value;

use super::{FieldTransformer, Row};
use crate::models::{is_blank, FieldDefinition, InputKey, Submission};
use crate::values::{CellValue, FieldRef, RawValue};

/// Field categories whose text answers are converted to numbers.
const NUMERIC_TYPES: &[&str] = &["number", "quantity", "total", "calculation"];

/// Separator for fields whose answer is spread over several inputs.
const INPUT_JOIN: &str = " ";

/// Separator for list answers rendered into a single cell.
const LIST_JOIN: &str = ", ";

/// Scalar transformer for a single field.
#[derive(Debug, Clone)]
pub struct BaseField {
    definition: FieldDefinition,
    field: FieldRef,
}

impl BaseField {
    pub fn new(definition: FieldDefinition) -> Self {
        let field = definition.field_ref();
        Self { definition, field }
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    /// Typed value stored under `key`, or `None` when unanswered.
    pub fn input_value(&self, submission: &Submission, key: &InputKey) -> Option<RawValue> {
        let value = submission.get_input(key).filter(|v| !is_blank(v))?;
        Some(self.convert(value))
    }

    /// The value of the field as a whole.
    ///
    /// Uses the field id key first, then the answered sub-inputs joined by a
    /// space (name and address style fields), and finally empty text.
    pub fn field_value(&self, submission: &Submission) -> RawValue {
        if let Some(value) = self.input_value(submission, &InputKey::field(&self.definition.id)) {
            return value;
        }

        let parts: Vec<String> = self
            .definition
            .inputs
            .iter()
            .filter_map(|input| self.input_value(submission, &input.key()))
            .map(|raw| raw.render())
            .collect();

        RawValue::Text(parts.join(INPUT_JOIN))
    }

    fn convert(&self, value: &Value) -> RawValue {
        match value {
            Value::String(s) if self.is_numeric() => {
                parse_number(s).unwrap_or_else(|| RawValue::Text(s.clone()))
            }
            Value::Array(items) => RawValue::Text(
                items
                    .iter()
                    .filter(|v| !is_blank(v))
                    .map(|v| RawValue::from_json(v).render())
                    .collect::<Vec<_>>()
                    .join(LIST_JOIN),
            ),
            other => RawValue::from_json(other),
        }
    }

    fn is_numeric(&self) -> bool {
        NUMERIC_TYPES.contains(&self.definition.field_type.as_str())
    }
}

/// Parse a submitted number, keeping integers integral.
pub(crate) fn parse_number(text: &str) -> Option<RawValue> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(RawValue::Integer(n));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(RawValue::Float)
}

impl FieldTransformer for BaseField {
    fn field(&self) -> &FieldRef {
        &self.field
    }

    fn columns(&self) -> Vec<String> {
        vec![self.definition.display_label()]
    }

    fn column_count(&self) -> usize {
        1
    }

    fn row(&self, submission: &Submission) -> Row {
        vec![CellValue::new(self.field_value(submission), self.field.clone())]
    }
}
