//! Conditional style rules and the value bins they are keyed on.
//!
//! A rule serializes to the shape the data-table widget expects:
//!
//! ```json
//! {"if": {"filter_query": "{pop} >= 1.0 && {pop} < 3.25", "column_id": "pop"},
//!  "backgroundColor": "rgb(247,251,255)"}
//! ```
//!
//! Rules are evaluated first-match-wins by the widget, so the bins produced by
//! [`bins`] are half-open except the last one, which is open above.

use serde::{Deserialize, Serialize};

use crate::models::format_float;

/// When a rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Predicate in the widget's filter grammar.
    pub filter_query: String,
    /// Column the style is applied to.
    pub column_id: String,
}

/// What a rule does to matching cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleEffect {
    /// Solid CSS colour.
    #[serde(rename = "backgroundColor")]
    BackgroundColor(String),
    /// Any CSS background, e.g. a gradient.
    #[serde(rename = "background")]
    Background(String),
}

/// A conditional formatting rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    #[serde(rename = "if")]
    pub condition: Condition,
    #[serde(flatten)]
    pub effect: StyleEffect,
}

impl StyleRule {
    /// Rule for `column_id` matching `query`.
    pub fn new(column_id: &str, query: String, effect: StyleEffect) -> Self {
        Self {
            condition: Condition {
                filter_query: query,
                column_id: column_id.to_string(),
            },
            effect,
        }
    }
}

/// One contiguous sub-range of a value span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// 1-based position.
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
    /// The last bin has no upper limit in its predicate.
    pub is_last: bool,
}

impl Bin {
    /// Predicate `{col} >= lower && {col} < upper`, or `{col} >= lower` for
    /// the last bin.
    pub fn filter_query(&self, column_id: &str) -> String {
        let mut query = format!("{{{}}} >= {}", column_id, format_float(self.lower));
        if !self.is_last {
            query.push_str(&format!(" && {{{}}} < {}", column_id, format_float(self.upper)));
        }
        query
    }
}

/// `num` evenly spaced values over `[start, stop]`; the last one is exactly `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// Split `[min, max]` into `n_bounds - 1` bins with evenly spaced boundaries.
pub fn bins(min: f64, max: f64, n_bounds: usize) -> Vec<Bin> {
    let bounds = linspace(min, max, n_bounds);
    let count = bounds.len().saturating_sub(1);

    bounds
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Bin {
            index: i + 1,
            lower: pair[0],
            upper: pair[1],
            is_last: i + 1 == count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_linspace_endpoints() {
        let values = linspace(1.0, 10.0, 5);
        assert_eq!(values, vec![1.0, 3.25, 5.5, 7.75, 10.0]);

        let values = linspace(0.1, 0.7, 101);
        assert_eq!(values.len(), 101);
        assert_eq!(values[0], 0.1);
        assert_eq!(values[100], 0.7);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bins_are_contiguous() {
        let bins = bins(-3.0, 12.0, 7);
        assert_eq!(bins.len(), 6);
        assert_eq!(bins[0].lower, -3.0);
        assert_eq!(bins[5].upper, 12.0);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
            assert!(!pair[0].is_last);
        }
        assert!(bins[5].is_last);
    }

    #[test]
    fn test_filter_query() {
        let bins = bins(1.0, 10.0, 5);
        assert_eq!(bins[0].filter_query("pop"), "{pop} >= 1.0 && {pop} < 3.25");
        assert_eq!(bins[3].filter_query("pop"), "{pop} >= 7.75");
    }

    #[test]
    fn test_rule_serialization() {
        let rule = StyleRule::new(
            "pop_2007",
            "{pop_2007} >= 1.0".to_string(),
            StyleEffect::BackgroundColor("rgb(8,48,107)".to_string()),
        );
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "if": {"filter_query": "{pop_2007} >= 1.0", "column_id": "pop_2007"},
                "backgroundColor": "rgb(8,48,107)"
            })
        );

        let rule = StyleRule::new("x", "{x} >= 0.0".to_string(), StyleEffect::Background("white".into()));
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["background"], "white");
        let back: StyleRule = serde_json::from_value(value).unwrap();
        assert_eq!(back, rule);
    }
}
