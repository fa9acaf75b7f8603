//! Table data model shared by every transformation.
//!
//! - [`Cell`] - A single value (number, text, boolean, list, or missing)
//! - [`ColumnLabel`] - Flat or hierarchical (multi-level) column heading
//! - [`Column`] - A labelled sequence of cells
//! - [`Table`] - Ordered columns with a uniform row count
//!
//! Tables are built in memory, by the CSV [`crate::parser`], or from JSON with
//! [`Table::from_json`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{TableError, TableResult};

// =============================================================================
// Cell
// =============================================================================

/// A single table value.
///
/// `Float(NaN)` is treated as missing, like `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    /// Missing value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Nested list of values (sparkline sources).
    List(Vec<Cell>),
}

impl Cell {
    /// Convert a JSON value into a cell. Objects become their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Null),
            },
            Value::String(s) => Cell::Text(s.clone()),
            Value::Array(items) => Cell::List(items.iter().map(Cell::from_json).collect()),
            Value::Object(_) => Cell::Text(value.to_string()),
        }
    }

    /// Convert to a plain JSON value. Missing and non-finite values become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Int(i) => Value::from(*i),
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::List(items) => Value::Array(items.iter().map(Cell::to_json).collect()),
        }
    }

    /// Whether the cell is missing.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Whether the cell holds a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Int(_)) || matches!(self, Cell::Float(f) if !f.is_nan())
    }

    /// Numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Truthiness of a flag cell.
    ///
    /// Numbers are true when non-zero, text when it is one of the usual
    /// "yes" spellings. Missing values have no truthiness.
    pub fn as_flag(&self) -> Option<bool> {
        const TRUE_VALUES: [&str; 5] = ["true", "1", "yes", "y", "on"];
        if self.is_null() {
            return None;
        }
        match self {
            Cell::Bool(b) => Some(*b),
            Cell::Int(i) => Some(*i != 0),
            Cell::Float(f) => Some(*f != 0.0),
            Cell::Text(s) => {
                let lower = s.trim().to_lowercase();
                Some(TRUE_VALUES.iter().any(|tv| *tv == lower))
            }
            Cell::List(items) => Some(!items.is_empty()),
            Cell::Null => None,
        }
    }

    /// Ordering used for sorting mixed columns: missing < booleans < numbers < text < lists.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        fn rank(cell: &Cell) -> u8 {
            match cell {
                _ if cell.is_null() => 0,
                Cell::Bool(_) => 1,
                Cell::Int(_) | Cell::Float(_) => 2,
                Cell::Text(_) => 3,
                _ => 4,
            }
        }

        match (self, other) {
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => rank(self).cmp(&rank(other)),
            },
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "nan"),
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{}", format_float(*v)),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Format a float the way the dashboard filter grammar and labels expect it:
/// shortest round-trip digits, always with a decimal point (`1.0`, `3.25`).
///
/// Magnitudes below `1e-4` or from `1e16` up use scientific notation with a
/// signed exponent of at least two digits (`1e+16`, `1.5e-07`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        return format!("{}inf", sign);
    }

    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

// =============================================================================
// Column Labels
// =============================================================================

/// Column heading: a single string, or the ordered segments of a multi-level
/// heading produced by pivoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnLabel {
    /// Single-level heading.
    Flat(String),
    /// Multi-level heading; empty segments mean "no grouping at this level".
    Hierarchical(Vec<String>),
}

impl ColumnLabel {
    /// Build a hierarchical label from any displayable segments.
    pub fn hierarchical<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        ColumnLabel::Hierarchical(parts.into_iter().map(|p| p.to_string()).collect())
    }

    /// Parse a label from JSON: a string, a scalar, or a list of scalars.
    pub fn from_json(value: &Value) -> TableResult<Self> {
        fn segment(value: &Value) -> Option<String> {
            match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                Value::Null => Some(String::new()),
                _ => None,
            }
        }

        match value {
            Value::Array(parts) => parts
                .iter()
                .map(segment)
                .collect::<Option<Vec<String>>>()
                .map(ColumnLabel::Hierarchical)
                .ok_or_else(|| TableError::InvalidLabel(value.to_string())),
            other => segment(other)
                .map(ColumnLabel::Flat)
                .ok_or_else(|| TableError::InvalidLabel(value.to_string())),
        }
    }

    /// Flattened column id.
    ///
    /// Empty segments are dropped and the rest are joined with `separator`,
    /// so the last non-empty segment always ends the id. This covers the shape
    /// pivoting produces for index columns such as `("country", "")`; it is a
    /// heuristic, not a general rule for irregular multi-level headings.
    /// Repeated segments are kept: `("x", "x", "")` gives `x_x`.
    pub fn to_id(&self, separator: &str) -> String {
        match self {
            ColumnLabel::Flat(s) => s.clone(),
            ColumnLabel::Hierarchical(parts) => parts
                .iter()
                .map(String::as_str)
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(separator),
        }
    }

    /// Whether this is a multi-level heading.
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, ColumnLabel::Hierarchical(_))
    }

    /// JSON form of the label.
    pub fn to_json(&self) -> Value {
        match self {
            ColumnLabel::Flat(s) => Value::String(s.clone()),
            ColumnLabel::Hierarchical(parts) => {
                Value::Array(parts.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for ColumnLabel {
    fn from(value: &str) -> Self {
        ColumnLabel::Flat(value.to_string())
    }
}

impl From<String> for ColumnLabel {
    fn from(value: String) -> Self {
        ColumnLabel::Flat(value)
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnLabel::Flat(s) => write!(f, "{}", s),
            ColumnLabel::Hierarchical(parts) => write!(f, "({})", parts.join(", ")),
        }
    }
}

// =============================================================================
// Column
// =============================================================================

/// A labelled sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column heading.
    pub label: ColumnLabel,
    /// Values, one per row.
    pub cells: Vec<Cell>,
}

impl Column {
    /// Create a column from a label and cells.
    pub fn new(label: impl Into<ColumnLabel>, cells: Vec<Cell>) -> Self {
        Self {
            label: label.into(),
            cells,
        }
    }

    /// Create a numeric column; `None` entries become missing values.
    pub fn numeric(label: impl Into<ColumnLabel>, values: &[Option<f64>]) -> Self {
        Self::new(label, values.iter().map(|v| Cell::from(*v)).collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether every non-missing cell is a number.
    pub fn is_numeric(&self) -> bool {
        self.cells.iter().all(|c| c.is_null() || c.is_number())
    }

    /// Non-missing numeric values in row order.
    pub fn numeric_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(Cell::as_f64)
    }

    /// Smallest and largest numeric value, if any.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.numeric_values().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

// =============================================================================
// Table
// =============================================================================

/// Ordered columns sharing one row count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, checking that every column has the same number of rows.
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(TableError::RaggedColumns {
                column: bad.label.to_string(),
                expected: n_rows,
                found: bad.len(),
            });
        }
        Ok(Self { columns, n_rows })
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Find a column by its flattened id.
    pub fn column_by_id(&self, id: &str, separator: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label.to_id(separator) == id)
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.columns.iter().filter_map(move |c| c.cells.get(index))
    }

    /// Build a table from JSON.
    ///
    /// Accepts the *records* orient (an array of objects) or the *split*
    /// orient (`{"columns": [...], "data": [[...], ...]}`, where labels may be
    /// lists for hierarchical headings). Anything else is rejected before any
    /// transformation runs.
    ///
    /// # Example
    /// ```
    /// use dashtable::Table;
    /// use serde_json::json;
    ///
    /// let table = Table::from_json(&json!([{"a": 1, "b": "x"}, {"a": 2}])).unwrap();
    /// assert_eq!(table.n_rows(), 2);
    /// assert_eq!(table.n_cols(), 2);
    /// ```
    pub fn from_json(value: &Value) -> TableResult<Self> {
        match value {
            Value::Array(rows) => Self::from_records(rows),
            Value::Object(obj) => match (obj.get("columns"), obj.get("data")) {
                (Some(Value::Array(labels)), Some(Value::Array(data))) => {
                    Self::from_split(labels, data)
                }
                _ => Err(TableError::NotATable(
                    "object without 'columns' and 'data' arrays".to_string(),
                )),
            },
            other => Err(TableError::NotATable(format!(
                "expected array of records or split object, got {}",
                json_type_name(other)
            ))),
        }
    }

    fn from_records(rows: &[Value]) -> TableResult<Self> {
        let mut keys: Vec<String> = Vec::new();
        let mut objects: Vec<&Map<String, Value>> = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let obj = row.as_object().ok_or_else(|| {
                TableError::NotATable(format!("row {} is {}, not an object", i, json_type_name(row)))
            })?;
            for key in obj.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            objects.push(obj);
        }

        let columns = keys
            .into_iter()
            .map(|key| {
                let cells = objects
                    .iter()
                    .map(|obj| obj.get(&key).map(Cell::from_json).unwrap_or(Cell::Null))
                    .collect();
                Column::new(key, cells)
            })
            .collect();

        Self::new(columns)
    }

    fn from_split(labels: &[Value], data: &[Value]) -> TableResult<Self> {
        let labels = labels
            .iter()
            .map(ColumnLabel::from_json)
            .collect::<TableResult<Vec<_>>>()?;
        let mut cells: Vec<Vec<Cell>> = vec![Vec::with_capacity(data.len()); labels.len()];

        for (i, row) in data.iter().enumerate() {
            let values = row.as_array().ok_or_else(|| {
                TableError::NotATable(format!("data row {} is {}, not an array", i, json_type_name(row)))
            })?;
            if values.len() != labels.len() {
                return Err(TableError::NotATable(format!(
                    "data row {} has {} cells, expected {}",
                    i,
                    values.len(),
                    labels.len()
                )));
            }
            for (column, value) in cells.iter_mut().zip(values) {
                column.push(Cell::from_json(value));
            }
        }

        Self::new(
            labels
                .into_iter()
                .zip(cells)
                .map(|(label, cells)| Column::new(label, cells))
                .collect(),
        )
    }

    /// Serialize in the split orient, keeping hierarchical labels.
    pub fn to_json(&self) -> Value {
        let columns: Vec<Value> = self.columns.iter().map(|c| c.label.to_json()).collect();
        let data: Vec<Value> = (0..self.n_rows)
            .map(|i| Value::Array(self.row(i).map(Cell::to_json).collect()))
            .collect();
        serde_json::json!({ "columns": columns, "data": data })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Tests
// =============================================================================
