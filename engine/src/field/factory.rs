//! Catalogue construction.
//!
//! Picks a transformer for every exported field and resolves the settings
//! that concern it into the transformer's own configuration.

use log::{debug, warn};

use super::likert::{LikertConfig, SurveyLikertField};
use super::separable::{SeparableField, SeparationConfig};
use super::{BaseField, Catalogue, FieldTransformer};
use crate::config::ExportSettings;
use crate::error::ExportResult;
use crate::models::{FieldDefinition, FormDefinition};

/// Field types whose answers hold several sub-items.
const SEPARABLE_TYPES: &[&str] = &["checkbox", "multiselect", "list", "repeater"];

/// Likert field type of the survey add-on.
const LIKERT_TYPE: &str = "likert";

/// Transformer for a single field definition.
pub fn transformer_for(
    definition: &FieldDefinition,
    settings: &ExportSettings,
) -> Box<dyn FieldTransformer> {
    let separation = SeparationConfig {
        enabled: settings.is_separated(&definition.id),
        sub_item_separator: settings.sub_item_separator.clone(),
    };

    match definition.field_type.as_str() {
        LIKERT_TYPE => Box::new(SurveyLikertField::new(
            definition.clone(),
            LikertConfig {
                separation,
                use_score: settings.use_score(&definition.id),
            },
        )),
        t if SEPARABLE_TYPES.contains(&t) => {
            Box::new(SeparableField::new(definition.clone(), separation))
        }
        _ => Box::new(BaseField::new(definition.clone())),
    }
}

/// Build the ordered catalogue for `form`.
///
/// With `enabled_fields` set, only those fields are exported, in that order;
/// ids the form does not know are skipped with a warning.
pub fn build_catalogue(
    form: &FormDefinition,
    settings: &ExportSettings,
) -> ExportResult<Catalogue> {
    let definitions: Vec<&FieldDefinition> = match &settings.enabled_fields {
        Some(ids) => ids
            .iter()
            .filter_map(|id| {
                let field = form.field(id);
                if field.is_none() {
                    warn!("Enabled field {} does not exist on the form, skipping", id);
                }
                field
            })
            .collect(),
        None => form.fields.iter().collect(),
    };

    let transformers: Vec<Box<dyn FieldTransformer>> = definitions
        .into_iter()
        .map(|definition| transformer_for(definition, settings))
        .collect();

    let catalogue = Catalogue::new(transformers)?;
    debug!(
        "Built catalogue of {} fields, {} columns",
        catalogue.len(),
        catalogue.width()
    );
    Ok(catalogue)
}
