//! Conditional formatting for the data-table widget.
//!
//! - Heatmap: background colours binned over one or more columns, plus a legend
//! - Bars: in-cell bar charts, one-sided or diverging around a midpoint
//! - Palette: named sequential colour scales

pub mod bars;
pub mod heatmap;
pub mod palette;
pub mod rule;

pub use bars::{data_bars, data_bars_diverging, DataBarsOptions, DivergingOptions};
pub use heatmap::{heatmap, ColumnSelection, HeatmapOptions, Legend, LegendEntry};
pub use palette::{ColorScale, Rgb};
pub use rule::{bins, linspace, Bin, Condition, StyleEffect, StyleRule};
