//! XLS error types

use thiserror::Error;

/// Result type for XLS operations
pub type XlsResult<T> = std::result::Result<T, XlsError>;

/// Errors that can occur during XLS writing
#[derive(Debug, Error)]
pub enum XlsError {
    /// IO error (also covers CFB errors which use std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The book cannot be written as it stands
    #[error("Core error: {0}")]
    Core(#[from] xlbook_core::Error),

    /// More distinct formats than BIFF8 has XF records for
    #[error("Too many formats for XLS: {0} (at most {max})", max = crate::styles::MAX_XF_COUNT - crate::styles::STYLE_XF_COUNT as usize)]
    TooManyFormats(usize),

    /// Font name longer than a FONT record can hold
    #[error("Invalid font name for XLS: {0:?}")]
    InvalidFontName(String),
}
