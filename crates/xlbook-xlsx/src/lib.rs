//! # xlbook-xlsx
//!
//! XLSX (Office Open XML) writer for xlbook.
//!
//! A book is written as SpreadsheetML parts in a ZIP package.

pub mod error;
pub mod writer;

mod styles;
mod xml;

pub use error::{XlsxError, XlsxResult};
pub use writer::XlsxWriter;
