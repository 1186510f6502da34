//! # xlbook
//!
//! Build spreadsheet workbooks in memory and save them as legacy `.xls`
//! (BIFF8) or modern `.xlsx` (SpreadsheetML) files.
//!
//! ## Example
//!
//! ```rust
//! use xlbook::prelude::*;
//!
//! # fn main() -> xlbook::Result<()> {
//! let mut book = Book::new(BookKind::Modern);
//! let mut sheet = book.add_sheet("Sheet 1")?;
//!
//! sheet
//!     .write_string(1, 0, "Some string", None)?
//!     .write_string(1, 0, "Unicode - فارسی - Қазақша", None)?;
//!
//! sheet
//!     .cell_format(1, 0)?
//!     .set_fill_pattern(FillPattern::Solid)
//!     .set_pattern_foreground_color(Color::GREEN);
//!
//! let bytes = xlbook::encode(&book)?;
//! assert!(bytes.starts_with(b"PK"));
//!
//! // book.save("demo.xlsx")?;
//! # Ok(())
//! # }
//! ```

pub mod demo;
pub mod prelude;

use std::io::Write;
use std::path::Path;

use thiserror::Error;

// Re-export core types
pub use xlbook_core::{
    Book, BookKind, BookSettings, Cell, CellAddress, CellType, CellValue, Color, ColumnInfo,
    FillPattern, Format, FormatMut, FormatRef, FormatTable, HorizontalAlignment, NumFormat,
    RowInfo, SharedStrings, Sheet, SheetMut, MAX_SHEET_NAME_LEN, MAX_TEXT_LEN,
};

// Re-export encoders
pub use xlbook_xls::{XlsError, XlsWriter};
pub use xlbook_xlsx::{XlsxError, XlsxWriter};

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by one of the format encoders
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Legacy (`.xls`) encoder failure
    #[error("XLS: {0}")]
    Legacy(#[from] XlsError),

    /// Modern (`.xlsx`) encoder failure
    #[error("XLSX: {0}")]
    Modern(#[from] XlsxError),
}

/// Errors from building, encoding or saving a book
#[derive(Debug, Error)]
pub enum Error {
    /// The book itself is invalid (sheet names, coordinates, formats)
    #[error(transparent)]
    Core(#[from] xlbook_core::Error),

    /// Filesystem failure while saving
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The encoder for the book's kind failed
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
}

impl From<XlsError> for Error {
    fn from(e: XlsError) -> Self {
        Error::Encode(e.into())
    }
}

impl From<XlsxError> for Error {
    fn from(e: XlsxError) -> Self {
        Error::Encode(e.into())
    }
}

/// Encode a book into the bytes of a file of its kind
pub fn encode(book: &Book) -> Result<Vec<u8>> {
    let bytes = match book.kind() {
        BookKind::Legacy => XlsWriter::encode(book)?,
        BookKind::Modern => XlsxWriter::encode(book)?,
    };
    Ok(bytes)
}

/// Save a book to `path`
///
/// The file is encoded in memory, written to a temporary file in the target
/// directory, synced, and renamed over `path`. On any failure the temporary
/// file is removed and `path` is left untouched.
pub fn save<P: AsRef<Path>>(book: &Book, path: P) -> Result<()> {
    let path = path.as_ref();
    if BookKind::from_path(path).is_some_and(|kind| kind != book.kind()) {
        log::warn!(
            "saving a {} book to '{}'; the extension does not match its contents",
            book.kind(),
            path.display()
        );
    }

    let bytes = encode(book)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".xlbook-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    log::debug!("saved {} bytes to '{}'", bytes.len(), path.display());
    Ok(())
}

/// Extension trait adding file output to [`Book`]
pub trait BookExt {
    /// Save the book to a file; see [`save`]
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Encode the book without touching the filesystem; see [`encode`]
    fn to_bytes(&self) -> Result<Vec<u8>>;
}

impl BookExt for Book {
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save(self, path)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_dispatches_on_kind() {
        let legacy = demo::demo_book(BookKind::Legacy).unwrap();
        let modern = demo::demo_book(BookKind::Modern).unwrap();

        // CFB signature
        assert!(encode(&legacy)
            .unwrap()
            .starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]));
        assert!(encode(&modern).unwrap().starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_encoder_errors_are_wrapped() {
        let mut book = Book::new(BookKind::Legacy);
        book.add_sheet("S")
            .unwrap()
            .write_number(0, 0, f64::INFINITY, None)
            .unwrap();
        assert!(matches!(
            encode(&book),
            Err(Error::Encode(EncodeError::Legacy(XlsError::Core(
                xlbook_core::Error::UnsupportedValue { .. }
            ))))
        ));

        let book = Book::new(BookKind::Modern);
        assert!(matches!(
            encode(&book),
            Err(Error::Encode(EncodeError::Modern(XlsxError::Core(
                xlbook_core::Error::NoSheets
            ))))
        ));
    }
}
