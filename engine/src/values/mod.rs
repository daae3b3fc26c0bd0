//! Typed cell values.
//!
//! A [`CellValue`] is what a field transformer produces for one cell. It keeps
//! its raw type (number, text, boolean) so a renderer can write a typed cell,
//! and it remembers which field it belongs to so the combiner can pick a join
//! string when several values end up in the same column.
//!
//! Values are immutable: folding never edits a value, it builds a new text one.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Field identity
// =============================================================================

/// Identity of a logical form field, e.g. `"3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u32> for FieldId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// The owning field of a value: its id plus its category (`"text"`, `"likert"`, ...).
///
/// The category is only used to choose a join string while folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub id: FieldId,
    pub category: String,
}

impl FieldRef {
    pub fn new(id: impl Into<FieldId>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
        }
    }
}

// =============================================================================
// Raw payload
// =============================================================================

/// The raw scalar held by a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Locale independent text form.
    ///
    /// Floats without a fractional part render without a trailing `.0`, so a
    /// score of `2.0` reads `2` once folded into text.
    pub fn render(&self) -> String {
        match self {
            RawValue::Bool(b) => b.to_string(),
            RawValue::Integer(n) => n.to_string(),
            RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            RawValue::Float(f) => f.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, RawValue::Text(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, RawValue::Integer(_) | RawValue::Float(_))
    }

    /// Convert a JSON scalar from a submission.
    ///
    /// Arrays and objects are not scalars; they are rendered as compact JSON
    /// text. `null` becomes empty text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => RawValue::Text(String::new()),
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Integer(i),
                None => RawValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => RawValue::Text(s.clone()),
            other => RawValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Integer(n)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

// =============================================================================
// Cell value
// =============================================================================

/// One cell's content plus the field it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellValue {
    raw: RawValue,
    field: FieldRef,
}

impl CellValue {
    pub fn new(raw: impl Into<RawValue>, field: FieldRef) -> Self {
        Self {
            raw: raw.into(),
            field,
        }
    }

    /// Empty text owned by `field`; the default for missing data.
    pub fn empty(field: FieldRef) -> Self {
        Self::text(String::new(), field)
    }

    pub fn text(text: impl Into<String>, field: FieldRef) -> Self {
        Self::new(RawValue::Text(text.into()), field)
    }

    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn field_id(&self) -> &FieldId {
        &self.field.id
    }

    pub fn field_category(&self) -> &str {
        &self.field.category
    }

    pub fn render(&self) -> String {
        self.raw.render()
    }

    pub fn is_empty(&self) -> bool {
        matches!(&self.raw, RawValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
