//! Error types for xlbook-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or validating a book
#[derive(Debug, Error)]
pub enum Error {
    /// Cell coordinate outside the grid of the book's format
    #[error("Invalid cell coordinate ({row}, {col}): limit is {max_rows} rows x {max_cols} columns")]
    InvalidCoordinate {
        row: u32,
        col: u16,
        max_rows: u32,
        max_cols: u16,
    },

    /// Invalid A1-style cell address
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Format reference not present in the book's format table
    #[error("Invalid format reference: {0} (table has {1} entries)")]
    InvalidFormatRef(u32, usize),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Column width, row height or column range out of range
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A book setting neither format can store
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// The book has nothing to encode
    #[error("Book has no sheets")]
    NoSheets,

    /// A cell value the target format cannot represent
    #[error("Unsupported value in '{sheet}' at ({row}, {col}): {reason}")]
    UnsupportedValue {
        sheet: String,
        row: u32,
        col: u16,
        reason: String,
    },
}

impl Error {
    /// Create an [`Error::UnsupportedValue`] for a cell
    pub fn unsupported<S: Into<String>>(sheet: &str, row: u32, col: u16, reason: S) -> Self {
        Error::UnsupportedValue {
            sheet: sheet.to_string(),
            row,
            col,
            reason: reason.into(),
        }
    }

    /// True for errors caused by a coordinate outside the grid
    pub fn is_coordinate_error(&self) -> bool {
        matches!(self, Error::InvalidCoordinate { .. })
    }
}
