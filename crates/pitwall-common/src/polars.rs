//! Polars column helpers.
//!
//! The collector's tables are loaded with every column typed as a string.
//! Frames built elsewhere (tests, pinned fixtures) may carry inferred types,
//! so extraction casts to string first.

use polars::prelude::{DataFrame, DataType};

/// Extracts every value of a column as a trimmed string.
///
/// Nulls become empty strings. Returns `None` when the column does not exist
/// or cannot be cast to a string.
///
/// # Examples
///
/// ```
/// use polars::prelude::{Column, DataFrame};
/// use pitwall_common::column_strings;
///
/// let df = DataFrame::new(vec![Column::new("season".into(), [2023i64, 2024])]).unwrap();
/// assert_eq!(column_strings(&df, "season").unwrap(), vec!["2023", "2024"]);
/// ```
pub fn column_strings(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let column = df.column(name).ok()?.cast(&DataType::String).ok()?;
    let values = column
        .str()
        .ok()?
        .into_iter()
        .map(|value| value.unwrap_or_default().trim().to_string())
        .collect();
    Some(values)
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}
