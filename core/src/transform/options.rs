//! Build dropdown options from a label column.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{OptionsError, OptionsResult};
use crate::models::{Cell, Column, Table};

/// Options for [`to_options`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Column id holding the option labels (also used as values).
    pub label: String,

    /// Drop rows with a missing label; otherwise the label becomes `""`.
    pub na_remove: bool,

    /// Sort options by label.
    pub sort: bool,

    /// Sort direction.
    pub ascending: bool,

    /// Column id holding option tooltips.
    pub title: Option<String>,

    /// Column id holding the disabled flag.
    pub disabled: Option<String>,

    /// Separator used to match hierarchical column ids.
    pub separator: String,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            na_remove: true,
            sort: false,
            ascending: true,
            title: None,
            disabled: None,
            separator: "_".to_string(),
        }
    }
}

impl OptionsConfig {
    /// Config for the given label column with default settings.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }
}

/// A single dropdown option. Optional keys are omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

/// Build dropdown options, one per distinct label.
///
/// The first row carrying a label wins; options keep row order unless
/// `sort` is set.
///
/// # Example
/// ```
/// use dashtable::{to_options, Cell, Column, OptionsConfig, Table};
///
/// let table = Table::new(vec![Column::new(
///     "country",
///     vec![Cell::from("a"), Cell::from("b"), Cell::from("a"), Cell::from("c")],
/// )]).unwrap();
///
/// let options = to_options(&table, &OptionsConfig::new("country")).unwrap();
/// let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
/// assert_eq!(labels, vec!["a", "b", "c"]);
/// ```
pub fn to_options(table: &Table, config: &OptionsConfig) -> OptionsResult<Vec<DropdownOption>> {
    let find = |id: &str| {
        table
            .column_by_id(id, &config.separator)
            .ok_or_else(|| OptionsError::MissingColumn(id.to_string()))
    };
    let labels = find(&config.label)?;
    let titles = config.title.as_deref().map(find).transpose()?;
    let disabled = config.disabled.as_deref().map(find).transpose()?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut rows: Vec<(&Cell, DropdownOption)> = Vec::new();

    for (row, cell) in labels.cells.iter().enumerate() {
        let label = if cell.is_null() {
            if config.na_remove {
                continue;
            }
            String::new()
        } else {
            cell.to_string()
        };
        if !seen.insert(label.clone()) {
            continue;
        }

        rows.push((
            cell,
            DropdownOption {
                value: label.clone(),
                label,
                title: titles.and_then(|c| present(c, row)).map(Cell::to_string),
                disabled: disabled.and_then(|c| present(c, row)).and_then(Cell::as_flag),
            },
        ));
    }

    if config.sort {
        rows.sort_by(|(a, _), (b, _)| {
            let ord = a.sort_cmp(b);
            if config.ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }

    log::debug!("Built {} options from column '{}'", rows.len(), config.label);
    Ok(rows.into_iter().map(|(_, option)| option).collect())
}

fn present(column: &Column, row: usize) -> Option<&Cell> {
    column.cells.get(row).filter(|c| !c.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn countries() -> Table {
        Table::new(vec![
            Column::new(
                "country",
                vec![
                    Cell::from("Peru"),
                    Cell::from("Chad"),
                    Cell::Null,
                    Cell::from("Peru"),
                    Cell::from("Albania"),
                ],
            ),
            Column::new(
                "continent",
                vec![
                    Cell::from("Americas"),
                    Cell::Null,
                    Cell::from("Asia"),
                    Cell::from("Europe"),
                    Cell::from("Europe"),
                ],
            ),
            Column::new(
                "hidden",
                vec![Cell::Bool(true), Cell::Int(0), Cell::Null, Cell::from("yes"), Cell::Null],
            ),
        ])
        .unwrap()
    }

    fn labels(options: &[DropdownOption]) -> Vec<&str> {
        options.iter().map(|o| o.label.as_str()).collect()
    }

    #[test]
    fn test_deduplicates_in_row_order() {
        let options = to_options(&countries(), &OptionsConfig::new("country")).unwrap();
        assert_eq!(labels(&options), vec!["Peru", "Chad", "Albania"]);
        assert!(options.iter().all(|o| o.label == o.value));
    }

    #[test]
    fn test_null_labels_become_empty() {
        let config = OptionsConfig {
            na_remove: false,
            ..OptionsConfig::new("country")
        };
        let options = to_options(&countries(), &config).unwrap();
        assert_eq!(labels(&options), vec!["Peru", "Chad", "", "Albania"]);
    }

    #[test]
    fn test_sorting() {
        let config = OptionsConfig {
            sort: true,
            ..OptionsConfig::new("country")
        };
        let options = to_options(&countries(), &config).unwrap();
        assert_eq!(labels(&options), vec!["Albania", "Chad", "Peru"]);

        let config = OptionsConfig {
            sort: true,
            ascending: false,
            ..OptionsConfig::new("country")
        };
        let options = to_options(&countries(), &config).unwrap();
        assert_eq!(labels(&options), vec!["Peru", "Chad", "Albania"]);
    }

    #[test]
    fn test_numeric_labels_sort_numerically() {
        let table = Table::new(vec![Column::new(
            "year",
            vec![Cell::Int(2007), Cell::Int(952), Cell::Int(1972)],
        )])
        .unwrap();
        let config = OptionsConfig {
            sort: true,
            ..OptionsConfig::new("year")
        };
        let options = to_options(&table, &config).unwrap();
        assert_eq!(labels(&options), vec!["952", "1972", "2007"]);
    }

    #[test]
    fn test_title_and_disabled_omitted_when_missing() {
        let config = OptionsConfig {
            title: Some("continent".into()),
            disabled: Some("hidden".into()),
            ..OptionsConfig::new("country")
        };
        let options = to_options(&countries(), &config).unwrap();

        assert_eq!(options[0].title.as_deref(), Some("Americas"));
        assert_eq!(options[0].disabled, Some(true));
        assert_eq!(options[1].title, None);
        assert_eq!(options[1].disabled, Some(false));
        assert_eq!(options[2].disabled, None);

        assert_eq!(
            serde_json::to_value(&options[1]).unwrap(),
            json!({"label": "Chad", "value": "Chad", "disabled": false})
        );
        assert_eq!(
            serde_json::to_value(&options[2]).unwrap(),
            json!({"label": "Albania", "value": "Albania", "title": "Europe"})
        );
    }

    #[test]
    fn test_missing_column() {
        let err = to_options(&countries(), &OptionsConfig::new("city")).unwrap_err();
        assert!(matches!(err, OptionsError::MissingColumn(ref c) if c == "city"));

        let config = OptionsConfig {
            title: Some("region".into()),
            ..OptionsConfig::new("country")
        };
        assert!(to_options(&countries(), &config).is_err());
    }
}
