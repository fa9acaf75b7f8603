//! # dashtable - Table helpers for dashboard data-table widgets
//!
//! dashtable turns tables (CSV files, JSON tables, or tables built in code)
//! into the JSON a dashboard data-table widget expects: row records with
//! column descriptors, conditional style rules, and dropdown options.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────────┐
//! │ CSV / JSON  │────▶│   Parser    │────▶│    Table    │──┬─▶│    Flatten      │ records + columns
//! │   input     │     │  (auto-enc) │     │ (multi-lvl) │  ├─▶│    Styling      │ rules + legend
//! └─────────────┘     └─────────────┘     └─────────────┘  ├─▶│    Options      │ dropdown options
//!                                                          └─▶│    Sparkline    │ sparkline column
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use dashtable::{csv_to_table, heatmap, to_dash_table, FlattenOptions, HeatmapOptions};
//!
//! let csv = "country,pop\nChad,2\nPeru,8\nFiji,1\n";
//! let table = csv_to_table(csv, ',', 1).unwrap();
//!
//! let dash = to_dash_table(&table, &FlattenOptions::default()).unwrap();
//! assert_eq!(dash.data.len(), 3);
//! assert_eq!(dash.columns[1].id, "pop");
//!
//! let (rules, legend) = heatmap(&table, &HeatmapOptions::default()).unwrap();
//! assert_eq!(rules.len(), 4);
//! assert_eq!(legend.entries.len(), 4);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Table model (Cell, ColumnLabel, Column, Table)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Flattening, dropdown options, sparklines
//! - [`styling`] - Heatmaps, data bars, colour scales
//! - [`config`] - Configuration file

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Conditional formatting
pub mod styling;

// Configuration
pub mod config;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, CsvError, DashError, DashResult, FlattenError, OptionsError, StyleError, TableError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{format_float, Cell, Column, ColumnLabel, Table};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    csv_to_table,
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes_auto,
    parse_csv,
    parse_csv_file,
    parse_csv_file_auto,
    parse_string_with_metadata,
    ParseResult,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    column_ids,
    sparkline,
    to_dash_table,
    to_options,
    ColumnDescriptor,
    DashTable,
    DisplayLabel,
    DropdownOption,
    FlattenOptions,
    OptionsConfig,
    Record,
};

// =============================================================================
// Re-exports - Styling
// =============================================================================

pub use styling::{
    data_bars,
    data_bars_diverging,
    heatmap,
    ColorScale,
    ColumnSelection,
    DataBarsOptions,
    DivergingOptions,
    HeatmapOptions,
    Legend,
    LegendEntry,
    Rgb,
    StyleEffect,
    StyleRule,
};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::DashConfig;
