//! Survey likert field.
//!
//! Likert answers are stored as choice values; with several rows the stored
//! value is `"<row key>:<column key>"`. The field outputs either the chosen
//! column's text or, when configured, the score attached to that choice.
//!
//! Rows only separate when both the settings ask for it and the question
//! actually has multiple rows.

use super::separable::{Separable, SeparationConfig};
use super::{FieldTransformer, MultiRowTransformer, Row, Rows};
use crate::models::{FieldDefinition, Submission};
use crate::values::{CellValue, FieldRef, RawValue};

/// Separates row key and column key in a multi-row answer.
const ROW_SEPARATOR: char = ':';

/// Likert settings resolved before the export pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LikertConfig {
    /// Separation as configured for this field, before the multiple-rows check.
    pub separation: SeparationConfig,
    /// Output the choice score instead of its text.
    pub use_score: bool,
}

#[derive(Debug, Clone)]
pub struct SurveyLikertField {
    definition: FieldDefinition,
    field: FieldRef,
    config: LikertConfig,
}

impl SurveyLikertField {
    pub fn new(definition: FieldDefinition, config: LikertConfig) -> Self {
        let field = definition.field_ref();
        Self {
            definition,
            field,
            config,
        }
    }

    pub fn has_multiple_rows(&self) -> bool {
        self.definition.multiple_rows
    }

    pub fn use_score_output(&self) -> bool {
        self.config.use_score
    }

    /// Resolve the answer stored under `key` to text or score.
    pub fn field_value(&self, submission: &Submission, key: &str) -> RawValue {
        let stored = submission.get_present(key).map(|v| RawValue::from_json(v).render());

        if self.use_score_output() {
            return self.score(stored.as_deref().unwrap_or_default());
        }

        match stored {
            Some(stored) => {
                let column = column_key(&stored);
                self.definition
                    .choices
                    .iter()
                    .find(|choice| choice.value == column)
                    .map(|choice| RawValue::Text(choice.text.clone()))
                    .unwrap_or(RawValue::Text(stored))
            }
            None => RawValue::Text(String::new()),
        }
    }

    /// Score of the choice whose stored value equals the answer's column key.
    ///
    /// An answer matching no choice scores `0`.
    fn score(&self, stored: &str) -> RawValue {
        let column = column_key(stored);
        self.definition
            .choices
            .iter()
            .find(|choice| choice.value == column)
            .and_then(|choice| choice.score.as_ref())
            .map(|score| match score.as_i64() {
                Some(n) => RawValue::Integer(n),
                None => RawValue::Float(score.as_f64().unwrap_or_default()),
            })
            .unwrap_or(RawValue::Integer(0))
    }

    /// One entry per answered likert row: (row label, resolved value).
    fn answered_rows(&self, submission: &Submission) -> Vec<(String, RawValue)> {
        self.definition
            .inputs
            .iter()
            .filter(|input| submission.get_present(&input.id).is_some())
            .map(|input| (input.label.clone(), self.field_value(submission, &input.id)))
            .collect()
    }
}

/// The column key of a stored answer; a value without row key is all column.
fn column_key(stored: &str) -> &str {
    if stored.contains(ROW_SEPARATOR) {
        stored.split(ROW_SEPARATOR).nth(1).unwrap_or_default()
    } else {
        stored
    }
}

impl FieldTransformer for SurveyLikertField {
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
        if !self.has_multiple_rows() {
            let value = self.field_value(submission, self.definition.id.as_str());
            return vec![CellValue::new(value, self.field.clone())];
        }

        let lines: Vec<String> = self
            .answered_rows(submission)
            .into_iter()
            .map(|(label, value)| {
                if label.is_empty() {
                    value.render()
                } else {
                    format!("{}: {}", label, value.render())
                }
            })
            .collect();

        vec![CellValue::text(
            lines.join(&self.config.separation.sub_item_separator),
            self.field.clone(),
        )]
    }

    fn as_multi_row(&self) -> Option<&dyn MultiRowTransformer> {
        if self.is_separation_enabled() {
            Some(self)
        } else {
            None
        }
    }
}

impl MultiRowTransformer for SurveyLikertField {
    fn rows<'a>(&'a self, submission: &'a Submission) -> Rows<'a> {
        if !self.is_separation_enabled() {
            return Box::new(std::iter::once(self.row(submission)));
        }
        Box::new(
            self.answered_rows(submission)
                .into_iter()
                .map(move |(_, value)| vec![CellValue::new(value, self.field.clone())]),
        )
    }
}

impl Separable for SurveyLikertField {
    fn is_separation_enabled(&self) -> bool {
        self.config.separation.enabled && self.has_multiple_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field_rows;
    use crate::models::Choice;
    use serde_json::json;

    fn single_row() -> FieldDefinition {
        FieldDefinition::new("7", "likert")
            .with_label("Mood")
            .with_choice(Choice::new("Good", "a").with_score(1))
            .with_choice(Choice::new("Great", "b").with_score(2))
    }

    fn multi_row() -> FieldDefinition {
        single_row()
            .with_multiple_rows(true)
            .with_input("7.1", "Food")
            .with_input("7.2", "Service")
    }

    fn score_config() -> LikertConfig {
        LikertConfig {
            use_score: true,
            ..LikertConfig::default()
        }
    }

    #[test]
    fn test_score_for_matched_choice() {
        let field = SurveyLikertField::new(single_row(), score_config());
        let row = field.row(&Submission::from_value(json!({"7": "b"})));
        assert_eq!(row[0].raw(), &RawValue::Integer(2));
    }

    #[test]
    fn test_unmatched_choice_scores_zero() {
        let field = SurveyLikertField::new(single_row(), score_config());

        let row = field.row(&Submission::from_value(json!({"7": "z"})));
        assert_eq!(row[0].raw(), &RawValue::Integer(0));

        let row = field.row(&Submission::new());
        assert_eq!(row[0].raw(), &RawValue::Integer(0));
    }

    #[test]
    fn test_text_output() {
        let field = SurveyLikertField::new(single_row(), LikertConfig::default());
        let row = field.row(&Submission::from_value(json!({"7": "a"})));
        assert_eq!(row[0].raw(), &RawValue::Text("Good".into()));
    }

    #[test]
    fn test_row_key_is_stripped() {
        let field = SurveyLikertField::new(multi_row(), score_config());
        let value = field.field_value(&Submission::from_value(json!({"7.1": "row1:b"})), "7.1");
        assert_eq!(value, RawValue::Integer(2));
    }

    #[test]
    fn test_separation_requires_multiple_rows() {
        let separated = LikertConfig {
            separation: SeparationConfig::enabled(),
            use_score: false,
        };

        let field = SurveyLikertField::new(single_row(), separated.clone());
        assert!(!field.is_separation_enabled());
        assert!(field.as_multi_row().is_none());

        let field = SurveyLikertField::new(multi_row(), separated);
        assert!(field.is_separation_enabled());
    }

    #[test]
    fn test_separated_rows_per_answered_row() {
        let config = LikertConfig {
            separation: SeparationConfig::enabled(),
            use_score: true,
        };
        let field = SurveyLikertField::new(multi_row(), config);
        let submission = Submission::from_value(json!({"7.1": "r1:a", "7.2": "r2:b"}));

        let rows: Vec<Row> = field_rows(&field, &submission).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].raw(), &RawValue::Integer(1));
        assert_eq!(rows[1][0].raw(), &RawValue::Integer(2));
    }

    #[test]
    fn test_not_separated_multi_row_labels() {
        let field = SurveyLikertField::new(multi_row(), LikertConfig::default());
        let submission = Submission::from_value(json!({"7.1": "r1:a", "7.2": "r2:b"}));

        let row = field.row(&submission);
        assert_eq!(row.len(), 1);
        assert_eq!(row[0].render(), "Food: Good\nService: Great");
    }

    #[test]
    fn test_rows_without_separation_match_row() {
        let submission = Submission::from_value(json!({"7.1": "r1:a", "7.2": "r2:b"}));
        let single = Submission::from_value(json!({"7": "b"}));
        let separated_single = LikertConfig {
            separation: SeparationConfig::enabled(),
            use_score: false,
        };

        let field = SurveyLikertField::new(multi_row(), LikertConfig::default());
        let rows: Vec<Row> = MultiRowTransformer::rows(&field, &submission).collect();
        assert_eq!(rows, vec![field.row(&submission)]);

        let field = SurveyLikertField::new(single_row(), separated_single);
        let rows: Vec<Row> = MultiRowTransformer::rows(&field, &single).collect();
        assert_eq!(rows, vec![field.row(&single)]);
    }
}
