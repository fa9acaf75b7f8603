//! Flatten a table into the `data` / `columns` inputs of a dashboard data table.
//!
//! # Architecture
//!
//! ```text
//! Table (hierarchical labels)                 DashTable
//! ┌──────────────────────────────┐            ┌────────────────────────────────────────┐
//! │ ("country","") ("pop",2007)  │            │ columns: [{id: "country",              │
//! │  Chad           10.2         │     →      │            name: ["country", ""]}, ...]│
//! │  Peru           28.7         │            │ data: [{country: "Chad",               │
//! └──────────────────────────────┘            │         pop_2007: 10.2}, ...]          │
//!                                             └────────────────────────────────────────┘
//! ```
//!
//! Multi-line names (`name` as a list) let the widget merge duplicate headers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{FlattenError, FlattenResult};
use crate::models::{Cell, ColumnLabel, Table};

/// Descriptor keys owned by the flattener; hints cannot override them.
const RESERVED_KEYS: [&str; 2] = ["id", "name"];

/// One row of the flattened table: column id → cell value, in column order.
pub type Record = Map<String, Value>;

/// Options for [`to_dash_table`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// Joins the segments of hierarchical labels into an id.
    pub separator: String,

    /// Presentation hints applied to every column.
    pub properties: Map<String, Value>,

    /// Per-column hints keyed by column id; these win over `properties`.
    pub column_properties: HashMap<String, Map<String, Value>>,

    /// Move the terminal segment of labels with empty segments to the bottom
    /// header row, so that index columns line up with the leaf headers.
    pub anchor_header_terminal: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            properties: Map::new(),
            column_properties: HashMap::new(),
            anchor_header_terminal: false,
        }
    }
}

impl FlattenOptions {
    /// Set the separator.
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Add a hint applied to every column.
    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    /// Add a hint for one column id.
    pub fn with_column_property(mut self, column_id: &str, key: &str, value: Value) -> Self {
        self.column_properties
            .entry(column_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self
    }
}

/// Display name of a column: one line, or one line per header level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayLabel {
    Single(String),
    Levels(Vec<String>),
}

/// Column descriptor consumed by the data-table widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub id: String,
    pub name: DisplayLabel,
    /// Presentation hints such as `presentation`, `type` or `format`.
    #[serde(flatten)]
    pub hints: Map<String, Value>,
}

/// Flattened table: row records plus column descriptors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashTable {
    pub data: Vec<Record>,
    pub columns: Vec<ColumnDescriptor>,
}

/// Flatten `table` into row records and column descriptors.
///
/// Fails with [`FlattenError::DuplicateColumnId`] when two labels flatten to
/// the same id; choose another separator or aggregate the columns first.
///
/// # Example
/// ```
/// use dashtable::{to_dash_table, Cell, Column, ColumnLabel, FlattenOptions, Table};
///
/// let table = Table::new(vec![
///     Column::new(ColumnLabel::hierarchical(["country", ""]), vec![Cell::from("Chad")]),
///     Column::new(ColumnLabel::hierarchical(["pop", "2007"]), vec![Cell::Float(10.2)]),
/// ]).unwrap();
///
/// let dash = to_dash_table(&table, &FlattenOptions::default()).unwrap();
/// assert_eq!(dash.columns[1].id, "pop_2007");
/// assert_eq!(dash.data[0]["country"], "Chad");
/// ```
pub fn to_dash_table(table: &Table, options: &FlattenOptions) -> FlattenResult<DashTable> {
    let ids = column_ids(table, &options.separator)?;

    let columns = table
        .columns()
        .iter()
        .zip(&ids)
        .map(|(column, id)| describe(id, &column.label, options))
        .collect();

    let data = (0..table.n_rows())
        .map(|row| {
            ids.iter()
                .cloned()
                .zip(table.row(row).map(Cell::to_json))
                .collect::<Record>()
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Flattened {} columns and {} rows",
        ids.len(),
        data.len()
    );

    Ok(DashTable { data, columns })
}

/// Flattened ids for every column, failing on the first collision.
pub fn column_ids(table: &Table, separator: &str) -> FlattenResult<Vec<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut ids = Vec::with_capacity(table.n_cols());

    for (index, column) in table.columns().iter().enumerate() {
        let id = column.label.to_id(separator);
        if let Some(&first) = seen.get(&id) {
            return Err(FlattenError::DuplicateColumnId {
                id,
                first,
                second: index,
            });
        }
        seen.insert(id.clone(), index);
        ids.push(id);
    }

    Ok(ids)
}

fn describe(id: &str, label: &ColumnLabel, options: &FlattenOptions) -> ColumnDescriptor {
    let name = match label {
        ColumnLabel::Flat(s) => DisplayLabel::Single(s.clone()),
        ColumnLabel::Hierarchical(parts) if options.anchor_header_terminal => {
            DisplayLabel::Levels(anchor_terminal(parts))
        }
        ColumnLabel::Hierarchical(parts) => DisplayLabel::Levels(parts.clone()),
    };

    let mut hints = Map::new();
    let overrides = options.column_properties.get(id);
    for (key, value) in options.properties.iter().chain(overrides.into_iter().flatten()) {
        if RESERVED_KEYS.contains(&key.as_str()) {
            log::warn!("Ignoring reserved hint '{}' for column '{}'", key, id);
            continue;
        }
        hints.insert(key.clone(), value.clone());
    }

    ColumnDescriptor {
        id: id.to_string(),
        name,
        hints,
    }
}

/// `["country", ""]` → `["", "country"]`: the last non-empty segment moves to
/// the bottom level when some level is empty.
fn anchor_terminal(parts: &[String]) -> Vec<String> {
    let terminal = match parts.iter().rev().find(|p| !p.is_empty()) {
        Some(t) if parts.iter().any(String::is_empty) => t,
        _ => return parts.to_vec(),
    };
    parts
        .iter()
        .filter(|p| *p != terminal)
        .chain(std::iter::once(terminal))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;
    use serde_json::json;

    fn pivoted() -> Table {
        Table::new(vec![
            Column::new(
                ColumnLabel::hierarchical(["country", ""]),
                vec![Cell::from("Chad"), Cell::from("Peru")],
            ),
            Column::numeric(ColumnLabel::hierarchical(["gdpPercap", "2007"]), &[Some(1704.1), None]),
            Column::numeric(ColumnLabel::hierarchical(["gdpPercap", "1952"]), &[Some(1178.7), Some(3758.5)]),
            Column::numeric(ColumnLabel::hierarchical(["pop", "2007"]), &[Some(10.2), Some(28.7)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_flat_table_is_identity_on_ids() {
        let table = Table::new(vec![
            Column::new("country", vec![Cell::from("Chad")]),
            Column::new("life Exp", vec![Cell::Float(50.7)]),
        ])
        .unwrap();

        let dash = to_dash_table(&table, &FlattenOptions::default()).unwrap();
        let ids: Vec<&str> = dash.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["country", "life Exp"]);
        assert_eq!(dash.columns[1].name, DisplayLabel::Single("life Exp".into()));
    }

    #[test]
    fn test_hierarchical_ids_and_names() {
        let dash = to_dash_table(&pivoted(), &FlattenOptions::default()).unwrap();
        let ids: Vec<&str> = dash.columns.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["country", "gdpPercap_2007", "gdpPercap_1952", "pop_2007"]);
        assert_eq!(
            dash.columns[0].name,
            DisplayLabel::Levels(vec!["country".into(), "".into()])
        );
    }

    #[test]
    fn test_records_follow_ids() {
        let dash = to_dash_table(&pivoted(), &FlattenOptions::default()).unwrap();

        assert_eq!(dash.data.len(), 2);
        for record in &dash.data {
            let keys: Vec<&String> = record.keys().collect();
            let ids: Vec<&String> = dash.columns.iter().map(|c| &c.id).collect();
            assert_eq!(keys, ids);
        }
        assert_eq!(dash.data[1]["gdpPercap_2007"], Value::Null);
        assert_eq!(dash.data[1]["pop_2007"], json!(28.7));
    }

    #[test]
    fn test_custom_separator() {
        let options = FlattenOptions::default().with_separator(" / ");
        let dash = to_dash_table(&pivoted(), &options).unwrap();
        assert_eq!(dash.columns[3].id, "pop / 2007");
        assert!(dash.data[0].contains_key("pop / 2007"));
    }

    #[test]
    fn test_hints_and_overrides() {
        let options = FlattenOptions::default()
            .with_property("type", json!("numeric"))
            .with_column_property("country", "type", json!("text"))
            .with_column_property("country", "presentation", json!("markdown"));
        let dash = to_dash_table(&pivoted(), &options).unwrap();

        assert_eq!(dash.columns[0].hints["type"], json!("text"));
        assert_eq!(dash.columns[0].hints["presentation"], json!("markdown"));
        assert_eq!(dash.columns[1].hints["type"], json!("numeric"));
        assert!(!dash.columns[1].hints.contains_key("presentation"));
    }

    #[test]
    fn test_reserved_hints_ignored() {
        let options = FlattenOptions::default()
            .with_property("id", json!("oops"))
            .with_column_property("country", "name", json!("Country"));
        let dash = to_dash_table(&pivoted(), &options).unwrap();

        assert_eq!(dash.columns[0].id, "country");
        assert!(dash.columns[0].hints.is_empty());
    }

    #[test]
    fn test_descriptor_serialization() {
        let options = FlattenOptions::default()
            .with_column_property("country", "presentation", json!("markdown"));
        let dash = to_dash_table(&pivoted(), &options).unwrap();

        assert_eq!(
            serde_json::to_value(&dash.columns[0]).unwrap(),
            json!({"id": "country", "name": ["country", ""], "presentation": "markdown"})
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let table = Table::new(vec![
            Column::new(ColumnLabel::hierarchical(["value", ""]), vec![]),
            Column::new("value", vec![]),
        ])
        .unwrap();

        let err = to_dash_table(&table, &FlattenOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::DuplicateColumnId { ref id, first: 0, second: 1 } if id == "value"
        ));
    }

    #[test]
    fn test_empty_table_keeps_descriptors() {
        let table = Table::new(vec![
            Column::new(ColumnLabel::hierarchical(["pop", "2007"]), vec![]),
        ])
        .unwrap();

        let dash = to_dash_table(&table, &FlattenOptions::default()).unwrap();
        assert!(dash.data.is_empty());
        assert_eq!(dash.columns[0].id, "pop_2007");
    }

    #[test]
    fn test_anchor_header_terminal() {
        let options = FlattenOptions {
            anchor_header_terminal: true,
            ..FlattenOptions::default()
        };
        let dash = to_dash_table(&pivoted(), &options).unwrap();

        assert_eq!(
            dash.columns[0].name,
            DisplayLabel::Levels(vec!["".into(), "country".into()])
        );
        assert_eq!(
            dash.columns[1].name,
            DisplayLabel::Levels(vec!["gdpPercap".into(), "2007".into()])
        );
        assert_eq!(dash.columns[0].id, "country");
    }

    #[test]
    fn test_options_from_json() {
        let options: FlattenOptions = serde_json::from_value(json!({
            "separator": "-",
            "column_properties": {"country": {"presentation": "markdown"}}
        }))
        .unwrap();

        assert_eq!(options.separator, "-");
        assert!(options.properties.is_empty());
        assert!(!options.anchor_header_terminal);
    }
}
