//! Shared string table builder

use ahash::AHashMap;

/// Deduplicated text values in first-appearance order
///
/// Both container formats store cell text once in a shared table and refer
/// to it by index from the cells.
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
    index_map: AHashMap<String, u32>,
    /// Number of cell references, duplicates included
    total: u32,
}

impl SharedStrings {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference to `s`, returning its index
    pub fn intern(&mut self, s: &str) -> u32 {
        self.total += 1;
        if let Some(&idx) = self.index_map.get(s) {
            return idx;
        }
        let idx = self.strings.len() as u32;
        self.index_map.insert(s.to_owned(), idx);
        self.strings.push(s.to_owned());
        idx
    }

    /// Number of unique strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Number of references, duplicates included
    pub fn total_count(&self) -> u32 {
        self.total
    }

    /// Iterate over unique strings in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}
