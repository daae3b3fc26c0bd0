//! # Formfold - flatten form submissions into spreadsheet rows
//!
//! Formfold turns submissions of a form, whose fields may hold one value or
//! many, into exactly one aligned row per submission.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Form fields │────▶│  Catalogue  │────▶│  Combiner   │────▶│ Combined    │
//! │ + settings  │     │ (offsets)   │     │ (bucket +   │     │ rows        │
//! └─────────────┘     └─────────────┘     │  fold)      │     │ (typed)     │
//!        submissions ────────────────────▶└─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formfold::{export_entries, ExportSettings, FormDefinition, Submission};
//!
//! let output = export_entries(&form, &entries, &ExportSettings::default())?;
//! for row in &output.rows {
//!     println!("{:?}", row.rendered());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Submissions and form definitions
//! - [`values`] - Typed cell values
//! - [`field`] - Field transformers and the catalogue
//! - [`combine`] - Bucketing and folding into combined rows
//! - [`config`] - Export settings
//! - [`export`] - One-call export pass

// Core modules
pub mod error;
pub mod models;
pub mod values;

// Transformation
pub mod combine;
pub mod field;

// Settings
pub mod config;

// Driver
pub mod export;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CatalogueError, ConfigError, ExportError};

// =============================================================================
// Re-exports - Models and values
// =============================================================================

pub use models::{Choice, FieldDefinition, FormDefinition, InputDefinition, InputKey, Submission};
pub use values::{CellValue, FieldId, FieldRef, RawValue};

// =============================================================================
// Re-exports - Transformers
// =============================================================================

pub use field::{
    build_catalogue, field_rows, BaseField, Catalogue, FieldTransformer, LikertConfig,
    MultiRowTransformer, Row, Rows, Separable, SeparableField, SeparationConfig,
    SurveyLikertField,
};

// =============================================================================
// Re-exports - Combiner
// =============================================================================

pub use combine::{CombinedRow, Combiner, ConfiguredJoin, DefaultJoin, JoinPolicy};

// =============================================================================
// Re-exports - Settings and export
// =============================================================================

pub use config::{ExportSettings, DEFAULT_GLUE};
pub use export::{export_entries, load_entries, load_form, ExportOutput};
