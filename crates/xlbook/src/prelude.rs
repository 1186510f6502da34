//! Prelude module - common imports for xlbook users
//!
//! ```rust
//! use xlbook::prelude::*;
//! ```

pub use crate::{
    // Main types
    Book,
    // Extension traits
    BookExt,
    BookKind,
    BookSettings,
    // Cell types
    CellAddress,
    CellType,
    CellValue,
    // Format types
    Color,
    // Layout types
    ColumnInfo,
    // Error types
    Error,
    FillPattern,
    Format,
    FormatRef,
    HorizontalAlignment,
    NumFormat,
    Result,
    RowInfo,
    Sheet,
    SheetMut,
};
