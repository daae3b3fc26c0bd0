//! High-level export API.
//!
//! Combines every step of an export pass: validating settings, building the
//! field catalogue, combining each submission and collecting the rows.
//!
//! # Example
//!
//! ```rust,ignore
//! use formfold::{export_entries, ExportSettings, FormDefinition, Submission};
//!
//! let form = FormDefinition::from_json(&form_json)?;
//! let entries: Vec<Submission> = serde_json::from_str(&entries_json)?;
//!
//! let output = export_entries(&form, &entries, &ExportSettings::default())?;
//! println!("{} rows x {} columns", output.rows.len(), output.columns.len());
//! ```

use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::combine::{CombinedRow, Combiner, ConfiguredJoin};
use crate::config::ExportSettings;
use crate::error::{ConfigError, ConfigResult, ExportResult};
use crate::field::build_catalogue;
use crate::models::{FormDefinition, Submission};

/// Result of an export pass, ready for a tabular renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    /// Column labels in output order
    pub columns: Vec<String>,

    /// One row per submission, in submission order
    pub rows: Vec<CombinedRow>,

    /// Number of submissions processed
    pub entry_count: usize,
}

impl ExportOutput {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Pretty JSON; `columns` is left out unless `headers` is set.
    pub fn to_json(&self, headers: bool) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if !headers {
            if let Some(map) = value.as_object_mut() {
                map.remove("columns");
            }
        }
        serde_json::to_string_pretty(&value)
    }
}

/// Export `entries` of `form` into aligned rows.
///
/// Settings are validated against the form first. The pass stops at the
/// first catalogue inconsistency; no partial output is returned then.
pub fn export_entries(
    form: &FormDefinition,
    entries: &[Submission],
    settings: &ExportSettings,
) -> ExportResult<ExportOutput> {
    settings.validate(form)?;

    let catalogue = build_catalogue(form, settings)?;
    let mut combiner = Combiner::with_policy(ConfiguredJoin::from_settings(settings));

    info!(
        "Exporting {} entries of form '{}' ({} columns)",
        entries.len(),
        form.title,
        catalogue.width()
    );

    for (index, entry) in entries.iter().enumerate() {
        debug!("Processing entry #{}", index);
        combiner.parse_entry(&catalogue, entry)?;
    }

    let output = ExportOutput {
        columns: catalogue.columns(),
        entry_count: entries.len(),
        rows: combiner.into_rows().collect(),
    };
    info!("Exported {} rows", output.row_count());
    Ok(output)
}

/// Read a form definition from a JSON file.
pub fn load_form(path: &Path) -> ConfigResult<FormDefinition> {
    let content = fs::read_to_string(path)?;
    Ok(FormDefinition::from_json(&content)?)
}

/// Read submissions from a JSON file holding an array of entry objects.
pub fn load_entries(path: &Path) -> ConfigResult<Vec<Submission>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(ConfigError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::models::{Choice, FieldDefinition};
    use crate::values::RawValue;
    use serde_json::json;

    fn survey() -> FormDefinition {
        FormDefinition {
            id: Some("2".into()),
            title: "Feedback".into(),
            fields: vec![
                FieldDefinition::new("1", "text").with_label("Name"),
                FieldDefinition::new("2", "likert")
                    .with_label("Rating")
                    .with_multiple_rows(true)
                    .with_input("2.1", "Food")
                    .with_input("2.2", "Service")
                    .with_choice(Choice::new("Bad", "c1").with_score(1))
                    .with_choice(Choice::new("Good", "c2").with_score(5)),
                FieldDefinition::new("3", "number").with_label("Visits"),
            ],
        }
    }

    fn entries() -> Vec<Submission> {
        vec![
            Submission::from_value(json!({
                "id": 10, "1": "Ann", "2.1": "r1:c2", "2.2": "r2:c1", "3": "4"
            })),
            Submission::from_value(json!({"id": 11, "1": "Bob"})),
        ]
    }

    #[test]
    fn test_export_separated_scores() {
        let settings = ExportSettings::default()
            .with_field_separation("2", true)
            .with_score_output("2")
            .with_field_glue("2", " / ");

        let output = export_entries(&survey(), &entries(), &settings).unwrap();

        assert_eq!(output.columns, vec!["Name", "Rating", "Visits"]);
        assert_eq!(output.row_count(), 2);
        assert_eq!(output.entry_count, 2);

        let first = &output.rows[0];
        assert_eq!(first.entry_id.as_deref(), Some("10"));
        assert_eq!(first.rendered(), vec!["Ann", "5 / 1", "4"]);
        assert_eq!(first.cells()[2].raw(), &RawValue::Integer(4));

        let second = &output.rows[1];
        assert_eq!(second.len(), 3);
        assert_eq!(second.rendered(), vec!["Bob", "", ""]);
    }

    #[test]
    fn test_export_unseparated_text() {
        let output = export_entries(&survey(), &entries(), &ExportSettings::default()).unwrap();
        assert_eq!(output.rows[0].rendered()[1], "Food: Good\nService: Bad");
    }

    #[test]
    fn test_unknown_settings_field_fails() {
        let settings = ExportSettings::default().with_score_output("42");
        let err = export_entries(&survey(), &entries(), &settings).unwrap_err();
        assert!(matches!(err, ExportError::Config(ConfigError::UnknownField(_))));
    }

    #[test]
    fn test_output_json_shape() {
        let settings = ExportSettings::default();
        let output = export_entries(&survey(), &entries()[1..], &settings).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&output.to_json(true).unwrap()).unwrap();
        assert_eq!(json["columns"][0], "Name");
        assert_eq!(json["entry_count"], 1);
        assert_eq!(json["rows"][0], json!(["Bob", "", ""]));

        let json: serde_json::Value =
            serde_json::from_str(&output.to_json(false).unwrap()).unwrap();
        assert!(json.get("columns").is_none());
        assert_eq!(json["rows"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_unknown_enabled_field_is_skipped() {
        let mut settings = ExportSettings::default();
        settings.enabled_fields = Some(vec!["3".into(), "99".into(), "1".into()]);

        let output = export_entries(&survey(), &entries(), &settings).unwrap();
        assert_eq!(output.columns, vec!["Visits", "Name"]);
        assert_eq!(output.rows[0].rendered(), vec!["4", "Ann"]);
        assert_eq!(output.entry_count, 2);
    }
}
