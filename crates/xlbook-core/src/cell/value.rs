//! Cell value types

use std::fmt;

use crate::MAX_TEXT_LEN;

/// Kind of content at a coordinate, as reported by
/// [`Sheet::cell_type`](crate::Sheet::cell_type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Nothing stored
    Empty,
    /// Numeric value
    Number,
    /// Text value
    String,
    /// Boolean value
    Boolean,
    /// Stored without a value, usually to carry a format
    Blank,
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CellType::Empty => "empty",
            CellType::Number => "number",
            CellType::String => "string",
            CellType::Boolean => "boolean",
            CellType::Blank => "blank",
        })
    }
}

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank cell (carries a format only)
    #[default]
    Blank,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// Text value, any Unicode
    Text(String),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the cell is blank
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Kind of this value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Blank => CellType::Blank,
            CellValue::Boolean(_) => CellType::Boolean,
            CellValue::Number(_) => CellType::Number,
            CellValue::Text(_) => CellType::String,
        }
    }

    /// Why this value cannot be stored by either container format, if it can't
    ///
    /// Both formats store numbers as IEEE doubles without NaN/infinity and cap
    /// text at [`MAX_TEXT_LEN`] UTF-16 units.
    pub fn unsupported_reason(&self) -> Option<String> {
        match self {
            CellValue::Number(n) if !n.is_finite() => {
                Some(format!("non-finite number {}", n))
            }
            CellValue::Text(s) => {
                let units = s.encode_utf16().count();
                if units > MAX_TEXT_LEN {
                    Some(format!(
                        "text of {} UTF-16 units exceeds {}",
                        units, MAX_TEXT_LEN
                    ))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Blank => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}
