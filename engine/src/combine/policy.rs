//! Join strings for folded cells.

use std::collections::HashMap;

use crate::config::{ExportSettings, DEFAULT_GLUE};
use crate::values::{CellValue, FieldId};

/// Chooses the string placed before `value` when it is appended to a folded cell.
///
/// Only consulted for buckets holding two or more values, and never before
/// the first one.
pub trait JoinPolicy {
    fn glue(&self, category: &str, field: &FieldId, value: &CellValue) -> String;
}

impl<F> JoinPolicy for F
where
    F: Fn(&str, &FieldId, &CellValue) -> String,
{
    fn glue(&self, category: &str, field: &FieldId, value: &CellValue) -> String {
        self(category, field, value)
    }
}

/// The same join string everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultJoin(pub String);

impl Default for DefaultJoin {
    fn default() -> Self {
        Self(DEFAULT_GLUE.to_string())
    }
}

impl JoinPolicy for DefaultJoin {
    fn glue(&self, _category: &str, _field: &FieldId, _value: &CellValue) -> String {
        self.0.clone()
    }
}

/// Join strings from settings: per field id, then per field category, then the default.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredJoin {
    default: DefaultJoin,
    by_type: HashMap<String, String>,
    by_field: HashMap<FieldId, String>,
}

impl ConfiguredJoin {
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            default: DefaultJoin(settings.default_glue.clone()),
            by_type: settings.glue_by_type.clone(),
            by_field: settings.glue_by_field.clone(),
        }
    }
}

impl JoinPolicy for ConfiguredJoin {
    fn glue(&self, category: &str, field: &FieldId, value: &CellValue) -> String {
        self.by_field
            .get(field)
            .or_else(|| self.by_type.get(category))
            .cloned()
            .unwrap_or_else(|| self.default.glue(category, field, value))
    }
}
