//! Export settings.
//!
//! Settings are read once per export pass and resolved into each field
//! transformer's own configuration when the catalogue is built; nothing in
//! here is consulted again while submissions are being folded.
//!
//! ```json
//! {
//!   "separate_fields": false,
//!   "separated": { "5": true },
//!   "likert_use_score": ["7"],
//!   "glue_by_type": { "list": " | " },
//!   "glue_by_field": { "5": "; " },
//!   "enabled_fields": ["1", "5", "7"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::FormDefinition;
use crate::values::FieldId;

/// Join string used between folded values when nothing more specific applies.
pub const DEFAULT_GLUE: &str = "\n---\n";

/// Join string between sub-items of a field that is not separated.
pub const DEFAULT_SUB_ITEM_SEPARATOR: &str = "\n";

/// Settings for one export pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Join string for folded cells
    #[serde(default = "default_glue")]
    pub default_glue: String,

    /// Join string per field category
    #[serde(default)]
    pub glue_by_type: HashMap<String, String>,

    /// Join string per field id; wins over `glue_by_type`
    #[serde(default)]
    pub glue_by_field: HashMap<FieldId, String>,

    /// Whether separable fields split their sub-items into rows by default
    #[serde(default)]
    pub separate_fields: bool,

    /// Per-field override of `separate_fields`
    #[serde(default)]
    pub separated: HashMap<FieldId, bool>,

    /// Likert fields that output the choice score instead of its text
    #[serde(default)]
    pub likert_use_score: HashSet<FieldId>,

    /// Fields to export, in output order; all form fields when absent
    #[serde(default)]
    pub enabled_fields: Option<Vec<FieldId>>,

    /// Join string between sub-items of a non-separated field
    #[serde(default = "default_sub_item_separator")]
    pub sub_item_separator: String,
}

fn default_glue() -> String {
    DEFAULT_GLUE.to_string()
}

fn default_sub_item_separator() -> String {
    DEFAULT_SUB_ITEM_SEPARATOR.to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_glue: default_glue(),
            glue_by_type: HashMap::new(),
            glue_by_field: HashMap::new(),
            separate_fields: false,
            separated: HashMap::new(),
            likert_use_score: HashSet::new(),
            enabled_fields: None,
            sub_item_separator: default_sub_item_separator(),
        }
    }
}

impl ExportSettings {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Whether `field` should separate its sub-items.
    pub fn is_separated(&self, field: &FieldId) -> bool {
        self.separated
            .get(field)
            .copied()
            .unwrap_or(self.separate_fields)
    }

    pub fn use_score(&self, field: &FieldId) -> bool {
        self.likert_use_score.contains(field)
    }

    /// Check that every field id the per-field maps mention exists on `form`.
    ///
    /// `enabled_fields` is not checked here; the catalogue skips unknown ids.
    pub fn validate(&self, form: &FormDefinition) -> ConfigResult<()> {
        let known = |id: &FieldId| form.field(id).is_some();

        let mentioned = self
            .separated
            .keys()
            .chain(self.likert_use_score.iter())
            .chain(self.glue_by_field.keys());

        for id in mentioned {
            if !known(id) {
                return Err(ConfigError::UnknownField(id.clone()));
            }
        }
        Ok(())
    }

    pub fn with_separation(mut self, enabled: bool) -> Self {
        self.separate_fields = enabled;
        self
    }

    pub fn with_field_separation(mut self, field: impl Into<FieldId>, enabled: bool) -> Self {
        self.separated.insert(field.into(), enabled);
        self
    }

    pub fn with_score_output(mut self, field: impl Into<FieldId>) -> Self {
        self.likert_use_score.insert(field.into());
        self
    }

    pub fn with_type_glue(mut self, category: impl Into<String>, glue: impl Into<String>) -> Self {
        self.glue_by_type.insert(category.into(), glue.into());
        self
    }

    pub fn with_field_glue(mut self, field: impl Into<FieldId>, glue: impl Into<String>) -> Self {
        self.glue_by_field.insert(field.into(), glue.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldDefinition;

    #[test]
    fn test_defaults_from_empty_json() {
        let settings = ExportSettings::from_json("{}").unwrap();
        assert_eq!(settings.default_glue, "\n---\n");
        assert_eq!(settings.sub_item_separator, "\n");
        assert!(!settings.separate_fields);
        assert!(settings.enabled_fields.is_none());
    }

    #[test]
    fn test_field_override_wins() {
        let settings = ExportSettings::default()
            .with_separation(true)
            .with_field_separation("4", false);

        assert!(settings.is_separated(&FieldId::from("1")));
        assert!(!settings.is_separated(&FieldId::from("4")));
    }

    #[test]
    fn test_parse_full_settings() {
        let settings = ExportSettings::from_json(
            r#"{
                "separated": {"5": true},
                "likert_use_score": ["7"],
                "glue_by_type": {"list": " | "},
                "enabled_fields": ["7", "5"]
            }"#,
        )
        .unwrap();

        assert!(settings.is_separated(&FieldId::from("5")));
        assert!(settings.use_score(&FieldId::from("7")));
        assert_eq!(settings.glue_by_type["list"], " | ");
        assert_eq!(settings.enabled_fields.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_validate_unknown_field() {
        let form = FormDefinition {
            id: None,
            title: String::new(),
            fields: vec![FieldDefinition::new("1", "text")],
        };

        assert!(ExportSettings::default().validate(&form).is_ok());

        let mut selected = ExportSettings::default();
        selected.enabled_fields = Some(vec!["1".into(), "9".into()]);
        assert!(selected.validate(&form).is_ok());

        let settings = ExportSettings::default().with_score_output("9");
        match settings.validate(&form) {
            Err(ConfigError::UnknownField(id)) => assert_eq!(id.as_str(), "9"),
            other => panic!("expected unknown field, got {:?}", other),
        }
    }
}
