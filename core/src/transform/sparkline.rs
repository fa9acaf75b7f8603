//! Sparkline text for list-valued cells.
//!
//! A list such as `[1.0, 2.0, 3.0]` renders as `1.0{0,50,100}3.0`: values scaled
//! to 0..=100 in braces, optionally framed by the first and last raw values.
//! Dashboards display the braces with a sparkline font.

use crate::models::{Cell, Column};

/// Format every list cell of `column` as sparkline text.
///
/// Non-list cells are kept as they are. A list with a single usable value
/// becomes that value; a list with none becomes missing.
pub fn sparkline(column: &Column, include_limits: bool) -> Column {
    Column::new(
        column.label.clone(),
        column
            .cells
            .iter()
            .map(|cell| match cell {
                Cell::List(items) => make_sparkline(items, include_limits),
                other => other.clone(),
            })
            .collect(),
    )
}

fn make_sparkline(items: &[Cell], include_limits: bool) -> Cell {
    let present: Vec<&Cell> = items.iter().filter(|c| c.as_f64().is_some()).collect();
    let values: Vec<f64> = present.iter().filter_map(|c| c.as_f64()).collect();

    let (first, last) = match present.as_slice() {
        [] => return Cell::Null,
        [single] => return (*single).clone(),
        [first, .., last] => (*first, *last),
    };

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let range = max - min;

    let scaled: Vec<String> = values
        .iter()
        .map(|v| {
            let scaled = if range > 0.0 {
                (v - min) * 100.0 / range
            } else if max != 0.0 {
                100.0
            } else {
                *v
            };
            (scaled.trunc() as i64).to_string()
        })
        .collect();

    let body = format!("{{{}}}", scaled.join(","));
    if include_limits {
        Cell::Text(format!("{}{}{}", first, body, last))
    } else {
        Cell::Text(body)
    }
}
