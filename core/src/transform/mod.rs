//! Table transformations.
//!
//! This module turns a [`crate::models::Table`] into widget inputs:
//! - Flatten: row records and column descriptors
//! - Options: dropdown options from a label column
//! - Sparkline: sparkline text for list-valued cells

pub mod flatten;
pub mod options;
pub mod sparkline;

pub use flatten::{column_ids, to_dash_table, ColumnDescriptor, DashTable, DisplayLabel, FlattenOptions, Record};
pub use options::{to_options, DropdownOption, OptionsConfig};
pub use sparkline::sparkline;
