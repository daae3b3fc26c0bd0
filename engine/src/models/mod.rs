//! Domain models handed to the engine by the host form platform.
//!
//! - [`Submission`] - one received set of answers, keyed by input key
//! - [`InputKey`] - a field id with an optional sub-input suffix (`"3"`, `"3.1"`)
//! - [`FormDefinition`] - the form's ordered field catalogue
//! - [`FieldDefinition`] - one field: id, type, label, inputs and choices
//! - [`Choice`] - a selectable option with its stored value and optional score
//!
//! These mirror what the host stores; the engine only reads them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::values::{FieldId, FieldRef};

// =============================================================================
// Input keys
// =============================================================================

/// Key of a submission value: field id plus optional sub-input suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputKey {
    pub field: FieldId,
    pub suffix: Option<String>,
}

impl InputKey {
    /// Key addressing the field as a whole.
    pub fn field(field: &FieldId) -> Self {
        Self {
            field: field.clone(),
            suffix: None,
        }
    }

    /// Split `"3.1"` into field `3` and suffix `1`.
    pub fn parse(key: &str) -> Self {
        match key.split_once('.') {
            Some((field, suffix)) if !suffix.is_empty() => Self {
                field: FieldId::from(field),
                suffix: Some(suffix.to_string()),
            },
            _ => Self {
                field: FieldId::from(key.trim_end_matches('.')),
                suffix: None,
            },
        }
    }
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "{}.{}", self.field, suffix),
            None => write!(f, "{}", self.field),
        }
    }
}

// =============================================================================
// Submission
// =============================================================================

/// One submission ("entry"): a flat JSON object of input key to scalar.
///
/// Keys no transformer asks for are simply never read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(Map<String, Value>);

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value; anything but an object yields an empty submission.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The host's entry id, when present.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_input(&self, key: &InputKey) -> Option<&Value> {
        self.0.get(&key.to_string())
    }

    /// Value for `key` unless it is missing, null or blank text.
    pub fn get_present(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !is_blank(v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Submission {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Null, blank text and empty containers count as "no answer".
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

// =============================================================================
// Form catalogue
// =============================================================================

/// A form with its ordered fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: String,

    pub fields: Vec<FieldDefinition>,
}

impl FormDefinition {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| &f.id == id)
    }
}

/// One field of the form as the host describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldId,

    /// Field category (`"text"`, `"number"`, `"checkbox"`, `"list"`, `"likert"`, ...)
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub label: String,

    /// Sub-inputs (`"5.1"`, `"5.2"`, ...); for likert fields these are its rows.
    #[serde(default)]
    pub inputs: Vec<InputDefinition>,

    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Likert only: whether the question has several rows.
    #[serde(default, alias = "gsurveyLikertEnableMultipleRows")]
    pub multiple_rows: bool,

    /// List only: each list row holds one value per choice (the choices are the columns).
    #[serde(default, alias = "enableColumns")]
    pub enable_columns: bool,
}

impl FieldDefinition {
    pub fn new(id: impl Into<FieldId>, field_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: field_type.into(),
            label: String::new(),
            inputs: Vec::new(),
            choices: Vec::new(),
            multiple_rows: false,
            enable_columns: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_input(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.inputs.push(InputDefinition {
            id: id.into(),
            label: label.into(),
        });
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_multiple_rows(mut self, enabled: bool) -> Self {
        self.multiple_rows = enabled;
        self
    }

    pub fn with_columns(mut self, enabled: bool) -> Self {
        self.enable_columns = enabled;
        self
    }

    pub fn field_ref(&self) -> FieldRef {
        FieldRef::new(self.id.clone(), self.field_type.clone())
    }

    /// Label used for column headers; falls back to the field id.
    pub fn display_label(&self) -> String {
        if self.label.trim().is_empty() {
            format!("Field {}", self.id)
        } else {
            self.label.clone()
        }
    }
}

/// A sub-input of a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

impl InputDefinition {
    pub fn key(&self) -> InputKey {
        InputKey::parse(&self.id)
    }
}

/// A selectable option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub text: String,

    /// Stored value; what the submission actually contains.
    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub score: Option<serde_json::Number>,
}

impl Choice {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_key_parse() {
        let key = InputKey::parse("3.1");
        assert_eq!(key.field.as_str(), "3");
        assert_eq!(key.suffix.as_deref(), Some("1"));
        assert_eq!(key.to_string(), "3.1");

        let key = InputKey::parse("12");
        assert_eq!(key.field.as_str(), "12");
        assert!(key.suffix.is_none());
    }

    #[test]
    fn test_submission_lookup() {
        let entry = Submission::from_value(json!({
            "id": 42,
            "1": "Alice",
            "2": "  ",
            "3.1": "x"
        }));

        assert_eq!(entry.id().as_deref(), Some("42"));
        assert_eq!(entry.get("1"), Some(&json!("Alice")));
        assert!(entry.get_present("2").is_none());
        assert!(entry.get_input(&InputKey::parse("3.1")).is_some());
        assert!(entry.get_input(&InputKey::field(&FieldId::from("3"))).is_none());
        assert!(entry.get("missing").is_none());
    }

    #[test]
    fn test_field_definition_from_json() {
        let form = FormDefinition::from_json(
            r#"{
                "title": "Survey",
                "fields": [
                    {"id": "1", "type": "text", "label": "Name"},
                    {
                        "id": "2",
                        "type": "likert",
                        "gsurveyLikertEnableMultipleRows": true,
                        "inputs": [{"id": "2.1", "label": "Food"}],
                        "choices": [{"text": "Good", "value": "glikertcol2", "score": 3}]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(form.fields.len(), 2);
        let likert = form.field(&FieldId::from("2")).unwrap();
        assert!(likert.multiple_rows);
        assert_eq!(likert.choices[0].score.as_ref().and_then(|s| s.as_i64()), Some(3));
        assert_eq!(form.fields[0].display_label(), "Name");
    }
}
