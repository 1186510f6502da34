//! Cell-related types
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellType`] - The kind of content at a coordinate
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`Cell`] - Value plus optional format reference
//! - [`CellStore`] - Sparse per-sheet storage

mod address;
mod storage;
mod value;

pub use address::CellAddress;
pub use storage::{Cell, CellStore};
pub use value::{CellType, CellValue};
