//! Error types for the dashtable transformations.
//!
//! Each concern has its own error enum:
//!
//! - [`TableError`] - Table construction and JSON table validation
//! - [`CsvError`] - CSV decoding and parsing errors
//! - [`FlattenError`] - Column flattening errors
//! - [`StyleError`] - Heatmap and data-bar rule generation errors
//! - [`OptionsError`] - Dropdown option building errors
//! - [`ConfigError`] - Configuration file errors
//! - [`DashError`] - Top-level error wrapping all of the above
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Table Errors
// =============================================================================

/// Errors while building or validating a [`crate::models::Table`].
#[derive(Debug, Error)]
pub enum TableError {
    /// The supplied value is not a table.
    #[error("Must be a table: {0}")]
    NotATable(String),

    /// Columns have different row counts.
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A column label is neither a string nor a list of strings.
    #[error("Invalid column label: {0}")]
    InvalidLabel(String),

    /// Column not present in the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode content.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    Parse(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Fewer header rows than requested.
    #[error("Expected {expected} header rows, found {found}")]
    NoHeaders { expected: usize, found: usize },

    /// The parsed cells do not form a table.
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

// =============================================================================
// Flattening Errors
// =============================================================================

/// Errors while flattening column labels.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// Two columns flatten to the same id.
    #[error("Duplicate column id '{id}' (columns {first} and {second}); use another separator")]
    DuplicateColumnId {
        id: String,
        first: usize,
        second: usize,
    },
}

// =============================================================================
// Styling Errors
// =============================================================================

/// Errors while generating conditional style rules.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Fewer than two bin boundaries requested.
    #[error("Number of bins must be at least 2, got {0}")]
    InvalidBinCount(usize),

    /// Column not present in the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Column holds non-numeric values.
    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// No numeric column available for a heatmap.
    #[error("Table has no numeric columns")]
    NoNumericColumns,

    /// No values to derive a range from.
    #[error("Column '{0}' has no numeric values")]
    EmptyColumn(String),

    /// Lower bound above upper bound.
    #[error("Invalid value range: min {min} > max {max}")]
    InvalidRange { min: f64, max: f64 },

    /// Unknown palette name.
    #[error("Unknown color scale: {0}")]
    UnknownColorScale(String),
}

// =============================================================================
// Option Errors
// =============================================================================

/// Errors while building dropdown options.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Column not present in the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Top-level error returned by the command line front end.
///
/// It wraps all lower-level errors.
#[derive(Debug, Error)]
pub enum DashError {
    /// Table error.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Flattening error.
    #[error("Flatten error: {0}")]
    Flatten(#[from] FlattenError),

    /// Styling error.
    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    /// Options error.
    #[error("Options error: {0}")]
    Options(#[from] OptionsError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for flattening operations.
pub type FlattenResult<T> = Result<T, FlattenError>;

/// Result type for styling operations.
pub type StyleResult<T> = Result<T, StyleError>;

/// Result type for option building.
pub type OptionsResult<T> = Result<T, OptionsError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for top-level operations.
pub type DashResult<T> = Result<T, DashError>;
