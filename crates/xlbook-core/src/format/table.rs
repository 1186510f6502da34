//! Format table for deduplication

use ahash::AHashMap;

use super::{Format, FormatRef};
use crate::error::{Error, Result};

/// Deduplicated arena of format descriptors
///
/// Cells reference entries by [`FormatRef`]. Entries are never removed, so a
/// reference stays valid for the lifetime of the book. Index 0 is always the
/// default (no fill) descriptor.
#[derive(Debug, Clone)]
pub struct FormatTable {
    /// All unique formats, in registration order
    formats: Vec<Format>,
    /// Reverse lookup for deduplication
    index_map: AHashMap<Format, u32>,
}

impl FormatTable {
    /// Create a table holding only the default format
    pub fn new() -> Self {
        let mut table = Self {
            formats: Vec::with_capacity(16),
            index_map: AHashMap::with_capacity(16),
        };
        table.register(Format::default());
        table
    }

    /// Register a descriptor, returning the index of an equal existing entry
    /// or appending a new one
    pub fn register(&mut self, format: Format) -> FormatRef {
        if let Some(&idx) = self.index_map.get(&format) {
            return FormatRef::new(idx);
        }

        let idx = self.formats.len() as u32;
        self.index_map.insert(format.clone(), idx);
        self.formats.push(format);
        FormatRef::new(idx)
    }

    /// Look up a descriptor, failing with [`Error::InvalidFormatRef`] when absent
    pub fn resolve(&self, format: FormatRef) -> Result<&Format> {
        self.get(format.index())
            .ok_or(Error::InvalidFormatRef(format.index(), self.formats.len()))
    }

    /// Get a descriptor by raw index
    pub fn get(&self, index: u32) -> Option<&Format> {
        self.formats.get(index as usize)
    }

    /// Get the default format (index 0)
    pub fn default_format(&self) -> &Format {
        &self.formats[0]
    }

    /// Number of registered descriptors, including the default
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Always false: the default descriptor is present from construction
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Iterate over descriptors in index order
    pub fn iter(&self) -> impl Iterator<Item = (FormatRef, &Format)> {
        self.formats
            .iter()
            .enumerate()
            .map(|(i, f)| (FormatRef::new(i as u32), f))
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Color, FillPattern};

    #[test]
    fn test_default_at_index_zero() {
        let table = FormatTable::new();
        assert_eq!(table.len(), 1);
        assert!(table.default_format().fill_pattern.is_none());
        assert_eq!(
            table.resolve(FormatRef::new(0)).unwrap(),
            &Format::default()
        );
    }

    #[test]
    fn test_deduplication() {
        let mut table = FormatTable::new();

        let a = table.register(Format::solid(Color::GREEN));
        let b = table.register(Format::solid(Color::GREEN));
        let c = table.register(Format::solid(Color::RED));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.len(), 3);

        // Registering the default returns index 0
        assert_eq!(table.register(Format::default()), FormatRef::new(0));
    }

    #[test]
    fn test_resolve_out_of_range() {
        let mut table = FormatTable::new();
        table.register(Format::new().with_fill_pattern(FillPattern::DarkGrid));

        assert!(table.resolve(FormatRef::new(1)).is_ok());
        assert!(matches!(
            table.resolve(FormatRef::new(2)),
            Err(Error::InvalidFormatRef(2, 2))
        ));
    }

    #[test]
    fn test_iter_order() {
        let mut table = FormatTable::new();
        table.register(Format::solid(Color::BLUE));
        table.register(Format::solid(Color::YELLOW));

        let indices: Vec<u32> = table.iter().map(|(r, _)| r.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
