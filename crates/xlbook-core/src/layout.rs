//! Column widths and row heights

use std::collections::BTreeMap;

use crate::format::FormatRef;

/// Widest column, in characters of the default font
pub const MAX_COLUMN_WIDTH: f64 = 255.0;

/// Tallest row, in points
pub const MAX_ROW_HEIGHT: f64 = 409.0;

/// Custom settings for one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Width in characters of the default font
    pub width: f64,
    /// Format applied to empty cells of the column
    pub format: Option<FormatRef>,
    /// Column is hidden
    pub hidden: bool,
}

/// Custom settings for one row
#[derive(Debug, Clone, PartialEq)]
pub struct RowInfo {
    /// Height in points
    pub height: f64,
    /// Format applied to empty cells of the row
    pub format: Option<FormatRef>,
    /// Row is hidden
    pub hidden: bool,
}

/// Runs of adjacent columns with equal settings, as (first, last, info)
///
/// Both encoders describe columns by inclusive ranges.
pub fn column_spans(columns: &BTreeMap<u16, ColumnInfo>) -> Vec<(u16, u16, &ColumnInfo)> {
    let mut spans: Vec<(u16, u16, &ColumnInfo)> = Vec::new();
    for (&col, info) in columns {
        match spans.last_mut() {
            Some((_, last, prev)) if *last + 1 == col && *prev == info => *last = col,
            _ => spans.push((col, col, info)),
        }
    }
    spans
}
