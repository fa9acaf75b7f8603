//! Heatmap style rules over one or more numeric columns.
//!
//! All selected columns share one colour scale spanning their global
//! min/max, so colours stay comparable across columns.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::palette::ColorScale;
use super::rule::{bins, StyleEffect, StyleRule};
use crate::error::{StyleError, StyleResult};
use crate::models::{Column, Table};

/// Which columns a heatmap covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionRepr", into = "SelectionRepr")]
pub enum ColumnSelection {
    /// Every numeric column.
    #[default]
    All,
    /// The listed column ids.
    Only(Vec<String>),
}

/// JSON form: `"all"`, a single column id, or a list of ids.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    Name(String),
    List(Vec<String>),
}

impl From<SelectionRepr> for ColumnSelection {
    fn from(repr: SelectionRepr) -> Self {
        match repr {
            SelectionRepr::Name(name) if name == "all" => ColumnSelection::All,
            SelectionRepr::Name(name) => ColumnSelection::Only(vec![name]),
            SelectionRepr::List(ids) => ColumnSelection::Only(ids),
        }
    }
}

impl From<ColumnSelection> for SelectionRepr {
    fn from(selection: ColumnSelection) -> Self {
        match selection {
            ColumnSelection::All => SelectionRepr::Name("all".to_string()),
            ColumnSelection::Only(ids) => SelectionRepr::List(ids),
        }
    }
}

/// Options for [`heatmap`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    /// Number of bin boundaries; gives `n_bins - 1` colours.
    pub n_bins: usize,

    /// Columns to style.
    pub columns: ColumnSelection,

    /// Lower end of the scale (default: global minimum).
    pub min_value: Option<f64>,

    /// Upper end of the scale (default: global maximum).
    pub max_value: Option<f64>,

    /// Name of a sequential [`ColorScale`].
    pub color_scale: String,

    /// CSS height of the legend swatches.
    pub legend_height: String,

    /// Separator used to derive ids of hierarchical columns.
    pub separator: String,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            n_bins: 5,
            columns: ColumnSelection::All,
            min_value: None,
            max_value: None,
            color_scale: "Blues".to_string(),
            legend_height: "10px".to_string(),
            separator: "_".to_string(),
        }
    }
}

/// One legend swatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: String,
    /// Lower bound of the bin, rounded to one decimal (ties to even).
    pub label: f64,
}

/// Colour legend for a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub height: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Render as a dashboard component tree: a row of inline blocks, each a
    /// coloured bar above a small label.
    pub fn to_component(&self) -> Value {
        let children: Vec<Value> = self
            .entries
            .iter()
            .map(|entry| {
                html(
                    "Div",
                    json!({
                        "style": {"display": "inline-block", "width": "60px"},
                        "children": [
                            html("Div", json!({
                                "style": {
                                    "backgroundColor": entry.color,
                                    "borderLeft": "1px rgb(50, 50, 50) solid",
                                    "height": self.height,
                                }
                            })),
                            html("Small", json!({"children": entry.label})),
                        ],
                    }),
                )
            })
            .collect();

        html("Div", json!({ "children": children }))
    }
}

fn html(kind: &str, props: Value) -> Value {
    json!({"namespace": "dash_html_components", "type": kind, "props": props})
}

/// Heatmap rules and legend.
///
/// For each of the `n_bins - 1` bins and each selected column, one rule
/// colours values in the bin. The last bin is open above, so the maximum is
/// always matched.
///
/// # Example
/// ```
/// use dashtable::{heatmap, Column, HeatmapOptions, Table};
///
/// let table = Table::new(vec![Column::numeric(
///     "x",
///     &[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(10.0)],
/// )]).unwrap();
///
/// let (rules, legend) = heatmap(&table, &HeatmapOptions::default()).unwrap();
/// assert_eq!(rules.len(), 4);
/// assert_eq!(rules[0].condition.filter_query, "{x} >= 1.0 && {x} < 3.25");
/// assert_eq!(legend.entries[1].label, 3.2);
/// ```
pub fn heatmap(table: &Table, options: &HeatmapOptions) -> StyleResult<(Vec<StyleRule>, Legend)> {
    if options.n_bins < 2 {
        return Err(StyleError::InvalidBinCount(options.n_bins));
    }
    let scale: ColorScale = options.color_scale.parse()?;
    let columns = select_columns(table, options)?;

    let (min, max) = value_range(&columns, options)?;
    let bins = bins(min, max, options.n_bins);
    let colors = scale.colors(bins.len());
    log::debug!(
        "Heatmap over {} columns, range [{}, {}], {} bins",
        columns.len(),
        min,
        max,
        bins.len()
    );

    let mut rules = Vec::with_capacity(bins.len() * columns.len());
    let mut entries = Vec::with_capacity(bins.len());

    for (bin, color) in bins.iter().zip(&colors) {
        let color = color.to_string();
        for (id, _) in &columns {
            rules.push(StyleRule::new(
                id,
                bin.filter_query(id),
                StyleEffect::BackgroundColor(color.clone()),
            ));
        }
        entries.push(LegendEntry {
            color,
            label: round_half_even(bin.lower, 1),
        });
    }

    let legend = Legend {
        height: options.legend_height.clone(),
        entries,
    };
    Ok((rules, legend))
}

/// Round to `decimals` places, sending exact halves to the even neighbour.
fn round_half_even(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let scaled = value * scale;
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        2.0 * (scaled / 2.0).round()
    } else {
        scaled.round()
    };
    rounded / scale
}

fn select_columns<'a>(
    table: &'a Table,
    options: &HeatmapOptions,
) -> StyleResult<Vec<(String, &'a Column)>> {
    match &options.columns {
        ColumnSelection::All => {
            let numeric: Vec<_> = table
                .columns()
                .iter()
                .filter(|c| c.is_numeric())
                .map(|c| (c.label.to_id(&options.separator), c))
                .collect();
            if numeric.is_empty() {
                return Err(StyleError::NoNumericColumns);
            }
            Ok(numeric)
        }
        ColumnSelection::Only(ids) => ids
            .iter()
            .map(|id| {
                let column = table
                    .column_by_id(id, &options.separator)
                    .ok_or_else(|| StyleError::MissingColumn(id.clone()))?;
                if !column.is_numeric() {
                    return Err(StyleError::NonNumericColumn(id.clone()));
                }
                Ok((id.clone(), column))
            })
            .collect(),
    }
}

fn value_range(columns: &[(String, &Column)], options: &HeatmapOptions) -> StyleResult<(f64, f64)> {
    let observed = columns
        .iter()
        .filter_map(|(_, c)| c.min_max())
        .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)));

    let min = options.min_value.or(observed.map(|(lo, _)| lo));
    let max = options.max_value.or(observed.map(|(_, hi)| hi));

    match (min, max) {
        (Some(min), Some(max)) if min <= max => Ok((min, max)),
        (Some(min), Some(max)) => Err(StyleError::InvalidRange { min, max }),
        _ => {
            let ids: Vec<&str> = columns.iter().map(|(id, _)| id.as_str()).collect();
            Err(StyleError::EmptyColumn(ids.join(", ")))
        }
    }
}
