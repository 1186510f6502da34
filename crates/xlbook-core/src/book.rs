//! Book type - the document being written

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::format::{Format, FormatRef, FormatTable};
use crate::settings::BookSettings;
use crate::sheet::{Sheet, SheetMut};
use crate::MAX_SHEET_NAME_LEN;

/// Container format a book is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookKind {
    /// BIFF8 records in an OLE2 compound file (`.xls`)
    Legacy,
    /// SpreadsheetML parts in a ZIP package (`.xlsx`)
    Modern,
}

impl BookKind {
    /// Grid size as (rows, columns)
    pub const fn grid_limits(self) -> (u32, u16) {
        match self {
            BookKind::Legacy => (65_536, 256),
            BookKind::Modern => (1_048_576, 16_384),
        }
    }

    /// File extension, without the dot
    pub const fn extension(self) -> &'static str {
        match self {
            BookKind::Legacy => "xls",
            BookKind::Modern => "xlsx",
        }
    }

    /// Pick a kind from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xls" => Some(BookKind::Legacy),
            "xlsx" => Some(BookKind::Modern),
            _ => None,
        }
    }

    /// Pick a kind from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for BookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A workbook
///
/// A book owns its sheets and the format table they share. Its kind is
/// fixed at construction and decides the grid limits and the encoder.
#[derive(Debug, Clone)]
pub struct Book {
    kind: BookKind,
    pub(crate) sheets: Vec<Sheet>,
    pub(crate) formats: FormatTable,
    settings: BookSettings,
}

impl Book {
    /// Create an empty book
    pub fn new(kind: BookKind) -> Self {
        Self::with_settings(kind, BookSettings::default())
    }

    /// Create an empty book with settings
    pub fn with_settings(kind: BookKind, settings: BookSettings) -> Self {
        Self {
            kind,
            sheets: Vec::new(),
            formats: FormatTable::new(),
            settings,
        }
    }

    /// The container format of this book
    pub fn kind(&self) -> BookKind {
        self.kind
    }

    /// Book settings
    pub fn settings(&self) -> &BookSettings {
        &self.settings
    }

    /// Mutable book settings
    pub fn settings_mut(&mut self) -> &mut BookSettings {
        &mut self.settings
    }

    /// Select the sheet shown when the file is opened
    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.sheets.len()));
        }
        self.settings.active_sheet = index;
        Ok(())
    }

    /// Index of the active sheet, clamped to the existing sheets
    pub fn active_sheet(&self) -> usize {
        self.settings
            .active_sheet
            .min(self.sheets.len().saturating_sub(1))
    }

    /// Append a new sheet
    ///
    /// Fails with [`Error::DuplicateSheetName`] or [`Error::InvalidSheetName`],
    /// leaving the sheet sequence unchanged.
    pub fn add_sheet(&mut self, name: &str) -> Result<SheetMut<'_>> {
        self.validate_sheet_name(name)?;
        let (rows, cols) = self.kind.grid_limits();
        self.sheets.push(Sheet::new(name, rows, cols));
        let index = self.sheets.len() - 1;
        Ok(SheetMut::new(self, index))
    }

    /// Register a format descriptor
    pub fn add_format(&mut self, format: Format) -> FormatRef {
        self.formats.register(format)
    }

    /// The shared format table
    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a sheet by name (case-insensitive)
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheet_index(name).map(|i| &self.sheets[i])
    }

    /// Get the index of a sheet by name (case-insensitive)
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.sheets
            .iter()
            .position(|s| s.name().to_lowercase() == name)
    }

    /// Get a mutation handle for a sheet by index
    pub fn sheet_mut(&mut self, index: usize) -> Result<SheetMut<'_>> {
        if index >= self.sheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.sheets.len()));
        }
        Ok(SheetMut::new(self, index))
    }

    /// Get a mutation handle for a sheet by name (case-insensitive)
    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<SheetMut<'_>> {
        let index = self.sheet_index(name)?;
        Some(SheetMut::new(self, index))
    }

    /// Iterate over sheets in insertion order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Check that the book can be encoded
    ///
    /// Requires at least one sheet, valid settings and only values both
    /// formats can hold.
    pub fn validate(&self) -> Result<()> {
        if self.sheets.is_empty() {
            return Err(Error::NoSheets);
        }
        self.settings.validate()?;
        for sheet in &self.sheets {
            for (row, col, cell) in sheet.cells() {
                if let Some(reason) = cell.value.unsupported_reason() {
                    return Err(Error::unsupported(sheet.name(), row, col, reason));
                }
            }
        }
        Ok(())
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        if self.sheet_index(name).is_some() {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}
