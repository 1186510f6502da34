//! Sheets and the handle used to mutate them

use std::collections::BTreeMap;

use crate::book::Book;
use crate::cell::{Cell, CellStore, CellType, CellValue};
use crate::error::{Error, Result};
use crate::format::{Format, FormatMut, FormatRef};
use crate::layout::{column_spans, ColumnInfo, RowInfo, MAX_COLUMN_WIDTH, MAX_ROW_HEIGHT};

/// A named grid of cells owned by a [`Book`]
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    cells: CellStore,
    columns: BTreeMap<u16, ColumnInfo>,
    rows: BTreeMap<u32, RowInfo>,
}

impl Sheet {
    pub(crate) fn new(name: &str, max_rows: u32, max_cols: u16) -> Self {
        Self {
            name: name.to_string(),
            cells: CellStore::with_limits(max_rows, max_cols),
            columns: BTreeMap::new(),
            rows: BTreeMap::new(),
        }
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(row, col)
    }

    /// Kind of content at (row, col)
    ///
    /// Fails with [`Error::InvalidCoordinate`] outside the book's grid.
    pub fn cell_type(&self, row: u32, col: u16) -> Result<CellType> {
        self.cells.check_coordinate(row, col)?;
        Ok(self
            .get(row, col)
            .map_or(CellType::Empty, |cell| cell.value.cell_type()))
    }

    /// Custom settings of a column
    pub fn column_info(&self, col: u16) -> Option<&ColumnInfo> {
        self.columns.get(&col)
    }

    /// Custom settings of a row
    pub fn row_info(&self, row: u32) -> Option<&RowInfo> {
        self.rows.get(&row)
    }

    /// Customized columns merged into (first, last, info) runs
    pub fn column_spans(&self) -> Vec<(u16, u16, &ColumnInfo)> {
        column_spans(&self.columns)
    }

    /// Customized rows in order
    pub fn row_infos(&self) -> impl Iterator<Item = (u32, &RowInfo)> {
        self.rows.iter().map(|(&row, info)| (row, info))
    }

    /// Highest row and column touched by cells or custom row/column settings
    pub fn extent(&self) -> Option<(u32, u16)> {
        let cells = self.used_bounds().map(|(_, _, row, col)| (row, col));
        let last_row = self.rows.keys().next_back().copied();
        let last_col = self.columns.keys().next_back().copied();
        if cells.is_none() && last_row.is_none() && last_col.is_none() {
            return None;
        }
        let (cell_row, cell_col) = cells.unwrap_or((0, 0));
        Some((
            cell_row.max(last_row.unwrap_or(0)),
            cell_col.max(last_col.unwrap_or(0)),
        ))
    }

    /// Iterate over cells in (row, col) order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &Cell)> {
        self.cells.iter()
    }

    /// The underlying cell store
    pub fn store(&self) -> &CellStore {
        &self.cells
    }

    /// Bounds of stored cells as (min_row, min_col, max_row, max_col)
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        self.cells.used_bounds()
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Mutation handle for one sheet of a book
///
/// The handle borrows the whole book so writes can check format references
/// against the shared [`FormatTable`](crate::FormatTable) and format edits can
/// register new descriptors in it. Writers return `&mut Self` so calls chain:
///
/// ```rust
/// use xlbook_core::{Book, BookKind};
///
/// let mut book = Book::new(BookKind::Legacy);
/// book.add_sheet("Sheet 1")?
///     .write_string(0, 0, "a", None)?
///     .write_number(0, 1, 2.5, None)?;
/// # Ok::<(), xlbook_core::Error>(())
/// ```
#[derive(Debug)]
pub struct SheetMut<'a> {
    book: &'a mut Book,
    index: usize,
}

impl<'a> SheetMut<'a> {
    pub(crate) fn new(book: &'a mut Book, index: usize) -> Self {
        Self { book, index }
    }

    /// Position of this sheet in the book
    pub fn index(&self) -> usize {
        self.index
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        self.sheet().name()
    }

    /// Read-only view of the sheet
    pub fn sheet(&self) -> &Sheet {
        &self.book.sheets[self.index]
    }

    /// The owning book
    pub fn book(&self) -> &Book {
        &*self.book
    }

    /// Register a format in the owning book's table
    pub fn add_format(&mut self, format: Format) -> FormatRef {
        self.book.add_format(format)
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&Cell> {
        self.sheet().get(row, col)
    }

    /// Write a value, overwriting whatever was at (row, col)
    ///
    /// With `format` set to `None` the cell keeps its current format.
    /// Fails with [`Error::InvalidCoordinate`](crate::Error::InvalidCoordinate) outside the book's grid and
    /// [`Error::InvalidFormatRef`](crate::Error::InvalidFormatRef) for a reference the book never issued.
    pub fn write<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
        format: Option<FormatRef>,
    ) -> Result<&mut Self> {
        if let Some(f) = format {
            self.book.formats.resolve(f)?;
        }
        self.book.sheets[self.index]
            .cells
            .set(row, col, value.into(), format)?;
        Ok(self)
    }

    /// Write a text cell
    pub fn write_string<S: Into<String>>(
        &mut self,
        row: u32,
        col: u16,
        text: S,
        format: Option<FormatRef>,
    ) -> Result<&mut Self> {
        self.write(row, col, CellValue::Text(text.into()), format)
    }

    /// Write a numeric cell
    pub fn write_number(
        &mut self,
        row: u32,
        col: u16,
        number: f64,
        format: Option<FormatRef>,
    ) -> Result<&mut Self> {
        self.write(row, col, CellValue::Number(number), format)
    }

    /// Write a boolean cell
    pub fn write_bool(
        &mut self,
        row: u32,
        col: u16,
        value: bool,
        format: Option<FormatRef>,
    ) -> Result<&mut Self> {
        self.write(row, col, CellValue::Boolean(value), format)
    }

    /// Write a blank cell, typically to carry a format
    pub fn write_blank(
        &mut self,
        row: u32,
        col: u16,
        format: Option<FormatRef>,
    ) -> Result<&mut Self> {
        self.write(row, col, CellValue::Blank, format)
    }

    /// Set width, format and visibility of columns `first..=last`
    ///
    /// `width` is in characters of the default font, up to
    /// [`MAX_COLUMN_WIDTH`](crate::layout::MAX_COLUMN_WIDTH).
    pub fn set_col(
        &mut self,
        first: u16,
        last: u16,
        width: f64,
        format: Option<FormatRef>,
        hidden: bool,
    ) -> Result<&mut Self> {
        if first > last {
            return Err(Error::InvalidDimension(format!(
                "column range {}..={} is reversed",
                first, last
            )));
        }
        if !(0.0..=MAX_COLUMN_WIDTH).contains(&width) {
            return Err(Error::InvalidDimension(format!(
                "column width {} outside 0..={}",
                width, MAX_COLUMN_WIDTH
            )));
        }
        if let Some(f) = format {
            self.book.formats.resolve(f)?;
        }
        let sheet = &mut self.book.sheets[self.index];
        sheet.cells.check_coordinate(0, last)?;

        let info = ColumnInfo {
            width,
            format,
            hidden,
        };
        for col in first..=last {
            sheet.columns.insert(col, info.clone());
        }
        Ok(self)
    }

    /// Set height, format and visibility of one row
    ///
    /// `height` is in points, up to [`MAX_ROW_HEIGHT`](crate::layout::MAX_ROW_HEIGHT).
    pub fn set_row(
        &mut self,
        row: u32,
        height: f64,
        format: Option<FormatRef>,
        hidden: bool,
    ) -> Result<&mut Self> {
        if !(0.0..=MAX_ROW_HEIGHT).contains(&height) {
            return Err(Error::InvalidDimension(format!(
                "row height {} outside 0..={}",
                height, MAX_ROW_HEIGHT
            )));
        }
        if let Some(f) = format {
            self.book.formats.resolve(f)?;
        }
        let sheet = &mut self.book.sheets[self.index];
        sheet.cells.check_coordinate(row, 0)?;
        sheet.rows.insert(
            row,
            RowInfo {
                height,
                format,
                hidden,
            },
        );
        Ok(self)
    }

    /// Remove a cell, returning it
    pub fn clear(&mut self, row: u32, col: u16) -> Option<Cell> {
        self.book.sheets[self.index].cells.remove(row, col)
    }

    /// Edit the format of one cell
    ///
    /// An empty coordinate becomes a blank cell carrying the format.
    pub fn cell_format(&mut self, row: u32, col: u16) -> Result<FormatMut<'_>> {
        let book = &mut *self.book;
        let cell = book.sheets[self.index].cells.entry(row, col)?;
        Ok(FormatMut::new(&mut book.formats, cell))
    }

    /// Resolved format of a cell, if it exists
    pub fn format_of(&self, row: u32, col: u16) -> Result<Option<&Format>> {
        match self.get(row, col) {
            Some(cell) => self
                .book
                .formats
                .resolve(FormatRef::new(cell.format_index()))
                .map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookKind;
    use crate::error::Error;
    use crate::format::{Color, FillPattern};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_then_get() {
        let mut book = Book::new(BookKind::Modern);
        let mut sheet = book.add_sheet("Sheet 1").unwrap();

        sheet.write_string(1, 0, "Some string", None).unwrap();
        assert_eq!(
            sheet.get(1, 0).unwrap().value,
            CellValue::text("Some string")
        );
        assert!(sheet.get(0, 0).is_none());
    }

    #[test]
    fn test_chained_overwrite() {
        let mut book = Book::new(BookKind::Legacy);
        let mut sheet = book.add_sheet("Sheet 1").unwrap();

        sheet
            .write_string(1, 0, "Some string", None)
            .unwrap()
            .write_string(1, 0, "Unicode - فارسی - Қазақша", None)
            .unwrap();

        assert_eq!(sheet.sheet().cell_count(), 1);
        assert_eq!(
            sheet.get(1, 0).unwrap().value.as_text(),
            Some("Unicode - فارسی - Қазақша")
        );
    }

    #[test]
    fn test_grid_depends_on_kind() {
        let mut legacy = Book::new(BookKind::Legacy);
        let err = legacy
            .add_sheet("S")
            .unwrap()
            .write_number(70_000, 0, 1.0, None)
            .unwrap_err();
        assert!(err.is_coordinate_error());

        let mut modern = Book::new(BookKind::Modern);
        modern
            .add_sheet("S")
            .unwrap()
            .write_number(70_000, 300, 1.0, None)
            .unwrap();
    }

    #[test]
    fn test_foreign_format_ref_rejected() {
        let mut other = Book::new(BookKind::Modern);
        other.add_format(Format::solid(Color::RED));
        let foreign = other.add_format(Format::solid(Color::BLUE));

        let mut book = Book::new(BookKind::Modern);
        let mut sheet = book.add_sheet("S").unwrap();
        let err = sheet.write_string(0, 0, "x", Some(foreign)).unwrap_err();
        assert!(matches!(err, Error::InvalidFormatRef(2, 1)));
        assert!(sheet.get(0, 0).is_none());
    }

    #[test]
    fn test_cell_format_copy_on_write() {
        let mut book = Book::new(BookKind::Legacy);
        let shared = book.add_format(Format::solid(Color::RED));
        let mut sheet = book.add_sheet("S").unwrap();

        sheet
            .write_string(0, 0, "a", Some(shared))
            .unwrap()
            .write_string(0, 1, "b", Some(shared))
            .unwrap();

        sheet
            .cell_format(0, 0)
            .unwrap()
            .set_pattern_foreground_color(Color::GREEN);

        assert_eq!(
            sheet.format_of(0, 0).unwrap(),
            Some(&Format::solid(Color::GREEN))
        );
        assert_eq!(
            sheet.format_of(0, 1).unwrap(),
            Some(&Format::solid(Color::RED))
        );
        assert_eq!(sheet.book().formats().len(), 3);
    }

    #[test]
    fn test_cell_format_on_empty_coordinate() {
        let mut book = Book::new(BookKind::Modern);
        let mut sheet = book.add_sheet("S").unwrap();

        sheet
            .cell_format(4, 2)
            .unwrap()
            .set_fill_pattern(FillPattern::Solid)
            .set_pattern_foreground_color(Color::GREEN);

        let cell = sheet.get(4, 2).unwrap();
        assert!(cell.value.is_blank());
        assert_eq!(
            sheet.format_of(4, 2).unwrap(),
            Some(&Format::solid(Color::GREEN))
        );
    }

    #[test]
    fn test_write_keeps_format_when_none() {
        let mut book = Book::new(BookKind::Modern);
        let green = book.add_format(Format::solid(Color::GREEN));
        let mut sheet = book.add_sheet("S").unwrap();

        sheet
            .write_string(2, 0, "green", Some(green))
            .unwrap()
            .write_string(2, 0, "still green", None)
            .unwrap();
        assert_eq!(sheet.get(2, 0).unwrap().format, Some(green));
    }

    #[test]
    fn test_cell_type() {
        let mut book = Book::new(BookKind::Legacy);
        let mut sheet = book.add_sheet("S").unwrap();
        sheet
            .write_number(0, 0, 1.0, None)
            .unwrap()
            .write_string(0, 1, "x", None)
            .unwrap()
            .write_bool(0, 2, true, None)
            .unwrap();
        sheet.cell_format(0, 3).unwrap().set_wrap(true);

        let sheet = sheet.sheet();
        assert_eq!(sheet.cell_type(0, 0).unwrap(), CellType::Number);
        assert_eq!(sheet.cell_type(0, 1).unwrap(), CellType::String);
        assert_eq!(sheet.cell_type(0, 2).unwrap(), CellType::Boolean);
        assert_eq!(sheet.cell_type(0, 3).unwrap(), CellType::Blank);
        assert_eq!(sheet.cell_type(9, 9).unwrap(), CellType::Empty);
        assert!(sheet.cell_type(0, 256).unwrap_err().is_coordinate_error());
    }

    #[test]
    fn test_set_col() {
        let mut book = Book::new(BookKind::Legacy);
        let wrapped = book.add_format(Format::new().with_wrap(true));
        let mut sheet = book.add_sheet("S").unwrap();

        sheet
            .set_col(1, 3, 20.0, None, false)
            .unwrap()
            .set_col(3, 3, 20.0, Some(wrapped), true)
            .unwrap();
        let spans: Vec<(u16, u16, bool)> = sheet
            .sheet()
            .column_spans()
            .into_iter()
            .map(|(first, last, info)| (first, last, info.hidden))
            .collect();
        assert_eq!(spans, vec![(1, 2, false), (3, 3, true)]);
        assert_eq!(sheet.sheet().column_info(3).unwrap().format, Some(wrapped));
        assert!(sheet.sheet().column_info(0).is_none());
        assert_eq!(sheet.sheet().extent(), Some((0, 3)));
    }

    #[test]
    fn test_set_col_rejects_bad_input() {
        let mut book = Book::new(BookKind::Legacy);
        let mut sheet = book.add_sheet("S").unwrap();

        assert!(matches!(
            sheet.set_col(3, 1, 10.0, None, false),
            Err(Error::InvalidDimension(_))
        ));
        assert!(matches!(
            sheet.set_col(0, 0, 256.0, None, false),
            Err(Error::InvalidDimension(_))
        ));
        assert!(matches!(
            sheet.set_col(0, 0, f64::NAN, None, false),
            Err(Error::InvalidDimension(_))
        ));
        assert!(sheet
            .set_col(250, 256, 10.0, None, false)
            .unwrap_err()
            .is_coordinate_error());
        assert!(matches!(
            sheet.set_col(0, 0, 10.0, Some(FormatRef::new(5)), false),
            Err(Error::InvalidFormatRef(5, 1))
        ));
        assert!(sheet.sheet().column_spans().is_empty());
    }

    #[test]
    fn test_set_row() {
        let mut book = Book::new(BookKind::Modern);
        let mut sheet = book.add_sheet("S").unwrap();

        sheet.set_row(4, 30.0, None, false).unwrap();
        sheet.write_number(1, 6, 1.0, None).unwrap();
        let info = sheet.sheet().row_info(4).unwrap();
        assert_eq!(info.height, 30.0);
        assert!(!info.hidden);
        assert_eq!(sheet.sheet().extent(), Some((4, 6)));

        assert!(matches!(
            sheet.set_row(0, 410.0, None, false),
            Err(Error::InvalidDimension(_))
        ));
        assert!(sheet
            .set_row(1_048_576, 10.0, None, false)
            .unwrap_err()
            .is_coordinate_error());
        assert_eq!(sheet.sheet().row_infos().count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut book = Book::new(BookKind::Modern);
        let mut sheet = book.add_sheet("S").unwrap();
        sheet.write_bool(0, 0, true, None).unwrap();
        assert!(sheet.clear(0, 0).is_some());
        assert_eq!(sheet.sheet().cell_count(), 0);
    }
}
