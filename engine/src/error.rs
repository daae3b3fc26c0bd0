//! Error types for the formfold export engine.
//!
//! The engine itself is total over well-formed submissions: missing data and
//! lookup misses resolve to default values inside the transformers. What can
//! fail is listed here:
//!
//! - [`CatalogueError`] - field transformers disagree with their declared width
//! - [`ConfigError`] - settings and input files that cannot be read
//! - [`ExportError`] - top-level export pass errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

use crate::values::FieldId;

// =============================================================================
// Catalogue Errors
// =============================================================================

/// Violations of the column alignment invariant.
///
/// Any of these aborts the export pass; a row built from an inconsistent
/// catalogue would shift every column after the offending field.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogueError {
    /// A transformer declared no columns at all.
    #[error("Field '{field}' declares no output columns")]
    EmptyColumns { field: FieldId },

    /// A transformer produced a row narrower or wider than it declared.
    #[error("Field '{field}' produced a row of {actual} cells, expected {expected}")]
    RowWidth {
        field: FieldId,
        expected: usize,
        actual: usize,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading settings, form definitions or entries.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed JSON document.
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Settings reference a field the form does not have.
    #[error("Unknown field in settings: {0}")]
    UnknownField(FieldId),
}

// =============================================================================
// Export Errors (top-level)
// =============================================================================

/// Top-level export pass errors.
///
/// This is the error returned by [`crate::export::export_entries`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// Catalogue inconsistency.
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for catalogue building and combining.
pub type CatalogueResult<T> = Result<T, CatalogueError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for export passes.
pub type ExportResult<T> = Result<T, ExportError>;
