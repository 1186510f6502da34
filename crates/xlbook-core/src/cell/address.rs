//! A1-style cell addresses

use crate::book::BookKind;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1")
///
/// Rows and columns are 0-based internally and 1-based / lettered in display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u16,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation (`$` markers are accepted and ignored)
    ///
    /// # Examples
    /// ```
    /// use xlbook_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A2").unwrap();
    /// assert_eq!(addr.row, 1);
    /// assert_eq!(addr.col, 0);
    ///
    /// let addr = CellAddress::parse("$AA$10").unwrap();
    /// assert_eq!(addr.row, 9);
    /// assert_eq!(addr.col, 26);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = |what: &str| Error::InvalidAddress(format!("{} in '{}'", what, text));

        let rest = text.strip_prefix('$').unwrap_or(text);
        let split = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let (letters, digits) = rest.split_at(split);
        if letters.is_empty() {
            return Err(invalid("no column letters"));
        }
        let digits = digits.strip_prefix('$').unwrap_or(digits);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("no row number"));
        }

        let col = Self::letters_to_column(letters)?;
        let (max_rows, _) = BookKind::Modern.grid_limits();
        let row = match digits.parse::<u32>() {
            Ok(row) if (1..=max_rows).contains(&row) => row,
            _ => return Err(invalid(&format!("row outside 1..={}", max_rows))),
        };

        Ok(Self { row: row - 1, col })
    }

    /// Column letters for a 0-based index (0 = A, 25 = Z, 26 = AA)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::with_capacity(3);
        let mut rem = u32::from(col) + 1;
        while rem > 0 {
            let digit = (rem - 1) % 26;
            letters.push(b'A' + digit as u8);
            rem = (rem - 1) / 26;
        }
        letters.iter().rev().map(|&b| char::from(b)).collect()
    }

    /// 0-based index for column letters, case-insensitive
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        let (_, max_cols) = BookKind::Modern.grid_limits();
        let overflow = || {
            Error::InvalidAddress(format!(
                "column '{}' is not within {} columns",
                letters, max_cols
            ))
        };

        if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::InvalidAddress(format!(
                "bad column letters '{}'",
                letters
            )));
        }
        let number = letters.bytes().try_fold(0u32, |acc, b| {
            let next = acc * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1;
            (next <= u32::from(max_cols)).then_some(next).ok_or_else(overflow)
        })?;
        Ok((number - 1) as u16)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
