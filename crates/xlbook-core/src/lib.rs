//! # xlbook-core
//!
//! Core data structures for the xlbook spreadsheet writer.
//!
//! This crate provides the in-memory model that the format encoders read:
//! - [`Book`] - A workbook of a fixed [`BookKind`] owning its sheets and formats
//! - [`Sheet`] / [`SheetMut`] - Named cell grids and their mutation handle
//! - [`CellValue`] and [`CellStore`] - Sparse cell storage
//! - [`Format`] and [`FormatTable`] - Deduplicated cell formats
//! - [`ColumnInfo`] / [`RowInfo`] - Column widths and row heights
//!
//! ## Example
//!
//! ```rust
//! use xlbook_core::{Book, BookKind, Color, FillPattern};
//!
//! let mut book = Book::new(BookKind::Modern);
//! let mut sheet = book.add_sheet("Sheet 1").unwrap();
//!
//! sheet
//!     .write_string(1, 0, "Some string", None).unwrap()
//!     .write_string(1, 0, "Unicode - فارسی - Қазақша", None).unwrap();
//!
//! sheet
//!     .cell_format(1, 0).unwrap()
//!     .set_fill_pattern(FillPattern::Solid)
//!     .set_pattern_foreground_color(Color::GREEN);
//! ```

pub mod book;
pub mod cell;
pub mod error;
pub mod format;
pub mod layout;
pub mod settings;
pub mod sheet;
pub mod strings;

// Re-exports for convenience
pub use book::{Book, BookKind};
pub use cell::{Cell, CellAddress, CellStore, CellType, CellValue};
pub use error::{Error, Result};
pub use format::{
    Color, FillPattern, Format, FormatMut, FormatRef, FormatTable, HorizontalAlignment, NumFormat,
};
pub use layout::{ColumnInfo, RowInfo};
pub use settings::BookSettings;
pub use sheet::{Sheet, SheetMut};
pub use strings::SharedStrings;

/// Maximum length of a sheet name (in characters)
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Maximum length of a text cell, in UTF-16 code units (both formats)
pub const MAX_TEXT_LEN: usize = 32_767;
