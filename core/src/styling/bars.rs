//! In-cell bar charts drawn with CSS gradients.
//!
//! A column's own [min, max] range is cut into 100 bins; each bin gets a rule
//! whose gradient fills the cell up to the bin's percentage.

use serde::{Deserialize, Serialize};

use super::rule::{bins, Bin, StyleEffect, StyleRule};
use crate::error::{StyleError, StyleResult};
use crate::models::Table;

/// 101 boundaries give one bin per percent.
const BAR_BOUNDS: usize = 101;

/// Options for [`data_bars`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataBarsOptions {
    /// Bar colour.
    pub color: String,
    /// Colour of the unfilled part.
    pub background: String,
    /// Separator used to match hierarchical column ids.
    pub separator: String,
}

impl Default for DataBarsOptions {
    fn default() -> Self {
        Self {
            color: "#0074D9".to_string(),
            background: "white".to_string(),
            separator: "_".to_string(),
        }
    }
}

/// Options for [`data_bars_diverging`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DivergingOptions {
    /// Reference value bars grow away from (default: middle of the range).
    pub midpoint: Option<f64>,
    /// Bar colour above the midpoint.
    pub color_above: String,
    /// Bar colour at or below the midpoint.
    pub color_below: String,
    /// Colour of the unfilled part.
    pub background: String,
    /// Separator used to match hierarchical column ids.
    pub separator: String,
}

impl Default for DivergingOptions {
    fn default() -> Self {
        Self {
            midpoint: None,
            color_above: "#3D9970".to_string(),
            color_below: "#FF4136".to_string(),
            background: "white".to_string(),
            separator: "_".to_string(),
        }
    }
}

/// Bars filling each cell from the left in proportion to its value.
///
/// Always returns 100 rules, one per percent of the column's range.
pub fn data_bars(table: &Table, column_id: &str, options: &DataBarsOptions) -> StyleResult<Vec<StyleRule>> {
    let bins = percent_bins(table, column_id, &options.separator)?;

    Ok(bins
        .iter()
        .map(|bin| {
            let pct = bin.index;
            let gradient = format!(
                "linear-gradient(90deg, {c} 0%, {c} {pct}%, {bg} {pct}%, {bg} 100%)",
                c = options.color,
                bg = options.background,
                pct = pct
            );
            StyleRule::new(column_id, bin.filter_query(column_id), StyleEffect::Background(gradient))
        })
        .collect())
}

/// Bars growing from the centre of the cell: rightwards for bins above the
/// midpoint, leftwards otherwise.
///
/// # Example
/// ```
/// use dashtable::{data_bars_diverging, Column, DivergingOptions, Table};
///
/// let table = Table::new(vec![Column::numeric("delta", &[Some(-5.0), Some(5.0)])]).unwrap();
/// let rules = data_bars_diverging(&table, "delta", &DivergingOptions::default()).unwrap();
///
/// assert_eq!(rules.len(), 100);
/// assert!(format!("{:?}", rules[0].effect).contains("#FF4136"));
/// assert!(format!("{:?}", rules[99].effect).contains("#3D9970"));
/// ```
pub fn data_bars_diverging(
    table: &Table,
    column_id: &str,
    options: &DivergingOptions,
) -> StyleResult<Vec<StyleRule>> {
    let bins = percent_bins(table, column_id, &options.separator)?;
    let midpoint = options.midpoint.unwrap_or_else(|| {
        let first = bins.first().map(|b| b.lower).unwrap_or_default();
        let last = bins.last().map(|b| b.upper).unwrap_or_default();
        (first + last) / 2.0
    });
    let bg = &options.background;

    Ok(bins
        .iter()
        .map(|bin| {
            let (lo_pct, hi_pct) = (bin.index - 1, bin.index);
            let gradient = if bin.upper > midpoint {
                format!(
                    "linear-gradient(90deg, {bg} 0%, {bg} 50%, {c} 50%, {c} {hi}%, {bg} {hi}%, {bg} 100%)",
                    bg = bg,
                    c = options.color_above,
                    hi = hi_pct
                )
            } else {
                format!(
                    "linear-gradient(90deg, {bg} 0%, {bg} {lo}%, {c} {lo}%, {c} 50%, {bg} 50%, {bg} 100%)",
                    bg = bg,
                    c = options.color_below,
                    lo = lo_pct
                )
            };
            StyleRule::new(column_id, bin.filter_query(column_id), StyleEffect::Background(gradient))
        })
        .collect())
}

/// One bin per percent of the column's own range.
fn percent_bins(table: &Table, column_id: &str, separator: &str) -> StyleResult<Vec<Bin>> {
    let column = table
        .column_by_id(column_id, separator)
        .ok_or_else(|| StyleError::MissingColumn(column_id.to_string()))?;
    if !column.is_numeric() {
        return Err(StyleError::NonNumericColumn(column_id.to_string()));
    }
    let (min, max) = column
        .min_max()
        .ok_or_else(|| StyleError::EmptyColumn(column_id.to_string()))?;

    log::debug!("Data bars for '{}' over [{}, {}]", column_id, min, max);
    Ok(bins(min, max, BAR_BOUNDS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Column, ColumnLabel};

    fn table() -> Table {
        Table::new(vec![
            Column::numeric("score", &[Some(0.0), Some(25.0), None, Some(100.0)]),
            Column::numeric(ColumnLabel::hierarchical(["delta", "2007"]), &[Some(-4.0), Some(1.0), Some(2.0), Some(6.0)]),
            Column::new("name", vec![Cell::from("a"), Cell::from("b"), Cell::from("c"), Cell::from("d")]),
        ])
        .unwrap()
    }

    fn background(rule: &StyleRule) -> &str {
        match &rule.effect {
            StyleEffect::Background(b) => b,
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_data_bars_shape() {
        let rules = data_bars(&table(), "score", &DataBarsOptions::default()).unwrap();

        assert_eq!(rules.len(), 100);
        assert_eq!(rules[0].condition.filter_query, "{score} >= 0.0 && {score} < 1.0");
        assert_eq!(rules[99].condition.filter_query, "{score} >= 99.0");
        assert!(rules.iter().all(|r| r.condition.column_id == "score"));
        assert_eq!(
            background(&rules[24]),
            "linear-gradient(90deg, #0074D9 0%, #0074D9 25%, white 25%, white 100%)"
        );
    }

    #[test]
    fn test_data_bars_custom_colors() {
        let options = DataBarsOptions {
            color: "teal".into(),
            background: "#eee".into(),
            ..DataBarsOptions::default()
        };
        let rules = data_bars(&table(), "delta_2007", &options).unwrap();
        assert_eq!(
            background(&rules[99]),
            "linear-gradient(90deg, teal 0%, teal 100%, #eee 100%, #eee 100%)"
        );
    }

    #[test]
    fn test_diverging_default_midpoint() {
        let rules = data_bars_diverging(&table(), "delta_2007", &DivergingOptions::default()).unwrap();

        assert_eq!(rules.len(), 100);
        // Range [-4, 6], midpoint 1.0: bin 50 ends exactly at the midpoint.
        assert_eq!(
            background(&rules[49]),
            "linear-gradient(90deg, white 0%, white 49%, #FF4136 49%, #FF4136 50%, white 50%, white 100%)"
        );
        assert_eq!(
            background(&rules[50]),
            "linear-gradient(90deg, white 0%, white 50%, #3D9970 50%, #3D9970 51%, white 51%, white 100%)"
        );
    }

    #[test]
    fn test_diverging_midpoint_at_extremes() {
        let above = DivergingOptions {
            midpoint: Some(-4.0),
            ..DivergingOptions::default()
        };
        let rules = data_bars_diverging(&table(), "delta_2007", &above).unwrap();
        assert!(rules.iter().all(|r| background(r).contains("#3D9970")));

        let below = DivergingOptions {
            midpoint: Some(6.0),
            ..DivergingOptions::default()
        };
        let rules = data_bars_diverging(&table(), "delta_2007", &below).unwrap();
        assert!(rules.iter().all(|r| background(r).contains("#FF4136")));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            data_bars(&table(), "missing", &DataBarsOptions::default()),
            Err(StyleError::MissingColumn(_))
        ));
        assert!(matches!(
            data_bars(&table(), "name", &DataBarsOptions::default()),
            Err(StyleError::NonNumericColumn(_))
        ));

        let empty = Table::new(vec![Column::numeric("x", &[None, None])]).unwrap();
        assert!(matches!(
            data_bars_diverging(&empty, "x", &DivergingOptions::default()),
            Err(StyleError::EmptyColumn(_))
        ));
    }
}
