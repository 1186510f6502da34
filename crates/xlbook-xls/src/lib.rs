//! # xlbook-xls
//!
//! XLS (BIFF8) writer for xlbook.
//!
//! This crate handles the legacy Excel binary format (.xls): BIFF8 records
//! in a `Workbook` stream inside an OLE2 compound file.

pub mod biff;
pub mod error;
pub mod styles;
pub mod writer;

pub use error::{XlsError, XlsResult};
pub use writer::XlsWriter;
