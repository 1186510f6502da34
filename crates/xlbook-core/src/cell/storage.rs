//! Cell storage implementation
//!
//! Sparse storage for sheet cells. Only written cells are stored, using a
//! row-based BTreeMap so encoders can walk cells in (row, col) order.

use std::collections::BTreeMap;

use super::CellValue;
use crate::error::{Error, Result};
use crate::format::FormatRef;

/// A single stored cell: its value plus an optional format reference
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    /// The cell's value
    pub value: CellValue,
    /// Index into the book's format table (`None` = default format)
    pub format: Option<FormatRef>,
}

impl Cell {
    /// Create a new cell with a value and default format
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            format: None,
        }
    }

    /// Create a new cell with a value and format
    pub fn with_format(value: CellValue, format: FormatRef) -> Self {
        Self {
            value,
            format: Some(format),
        }
    }

    /// Format index to encode, with the default format folded to index 0
    pub fn format_index(&self) -> u32 {
        self.format.map(|f| f.index()).unwrap_or(0)
    }
}

/// Sparse row-based storage for sheet cells
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, Cell>>`.
/// The grid limits come from the owning book's kind.
#[derive(Debug, Clone)]
pub struct CellStore {
    rows: BTreeMap<u32, BTreeMap<u16, Cell>>,
    max_rows: u32,
    max_cols: u16,
}

impl CellStore {
    /// Create an empty store for a grid of `max_rows` x `max_cols`
    pub fn with_limits(max_rows: u32, max_cols: u16) -> Self {
        Self {
            rows: BTreeMap::new(),
            max_rows,
            max_cols,
        }
    }

    /// Grid limits as (rows, columns)
    pub fn limits(&self) -> (u32, u16) {
        (self.max_rows, self.max_cols)
    }

    /// Fail with [`Error::InvalidCoordinate`] unless (row, col) is inside the grid
    pub fn check_coordinate(&self, row: u32, col: u16) -> Result<()> {
        if row >= self.max_rows || col >= self.max_cols {
            return Err(Error::InvalidCoordinate {
                row,
                col,
                max_rows: self.max_rows,
                max_cols: self.max_cols,
            });
        }
        Ok(())
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&Cell> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Store a value, overwriting any prior value at the coordinate
    ///
    /// When `format` is `None` the cell keeps the format it already had.
    pub fn set(
        &mut self,
        row: u32,
        col: u16,
        value: CellValue,
        format: Option<FormatRef>,
    ) -> Result<&mut Cell> {
        let cell = self.entry(row, col)?;
        cell.value = value;
        if format.is_some() {
            cell.format = format;
        }
        Ok(cell)
    }

    /// Get the cell at a coordinate, creating a blank one if absent
    pub fn entry(&mut self, row: u32, col: u16) -> Result<&mut Cell> {
        self.check_coordinate(row, col)?;
        Ok(self.rows.entry(row).or_default().entry(col).or_default())
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<Cell> {
        let result = self.rows.get_mut(&row).and_then(|r| r.remove(&col));

        if let Some(row_map) = self.rows.get(&row) {
            if row_map.is_empty() {
                self.rows.remove(&row);
            }
        }

        result
    }

    /// Get the number of stored cells
    pub fn len(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the bounds of stored cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u16::MAX;
        let mut max_col = 0u16;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in (row, col) order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &Cell)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, cell)| (row, col, cell)))
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &Cell)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, cell)| (col, cell)))
    }

    /// Iterate over row indices that have cells
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }
}
