//! Book-level settings

use crate::book::BookKind;
use crate::error::{Error, Result};

/// Settings that apply to a whole book
///
/// Font fields left as `None` take the default of the book's kind
/// (Arial 10 pt for legacy files, Calibri 11 pt for modern ones).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookSettings {
    /// Default font name
    pub font_name: Option<String>,
    /// Default font size in points
    pub font_size: Option<f64>,
    /// Index of the sheet selected when the file is opened
    pub active_sheet: usize,
    /// Date system: false = 1900 (Windows), true = 1904 (Mac)
    pub date_1904: bool,
}

impl BookSettings {
    /// Fail with [`Error::InvalidSetting`] for a font size that is not a
    /// positive number
    pub fn validate(&self) -> Result<()> {
        match self.font_size {
            Some(size) if !(size.is_finite() && size > 0.0) => Err(Error::InvalidSetting(
                format!("font size must be a positive number, got {}", size),
            )),
            _ => Ok(()),
        }
    }

    /// Default font name and size for a kind of book, with overrides applied
    pub fn font(&self, kind: BookKind) -> (&str, f64) {
        let (name, size) = match kind {
            BookKind::Legacy => ("Arial", 10.0),
            BookKind::Modern => ("Calibri", 11.0),
        };
        (
            self.font_name.as_deref().unwrap_or(name),
            self.font_size.unwrap_or(size),
        )
    }
}
