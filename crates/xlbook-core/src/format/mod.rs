//! Cell formats
//!
//! A [`Format`] is a structural descriptor compared by value. Books keep them
//! in a [`FormatTable`] and cells hold a [`FormatRef`] into it.

mod align;
mod color;
mod fill;
mod number;
mod table;

pub use align::HorizontalAlignment;
pub use color::{
    nearest_palette_index, palette_rgb, Color, DEFAULT_PALETTE, PALETTE_FIRST, PALETTE_LAST,
};
pub use fill::FillPattern;
pub use number::NumFormat;
pub use table::FormatTable;

use crate::cell::Cell;

/// How a cell is displayed: background fill, number format and text layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Format {
    /// Fill pattern
    pub fill_pattern: FillPattern,
    /// Pattern (foreground) color; the whole cell color for solid fills
    pub foreground: Color,
    /// Color behind the pattern
    pub background: Color,
    /// Built-in number format
    pub num_format: NumFormat,
    /// Horizontal alignment
    pub align_h: HorizontalAlignment,
    /// Wrap text onto several lines
    pub wrap: bool,
    /// Shrink text to fit the column width
    pub shrink_to_fit: bool,
}

impl Format {
    /// Create the default descriptor (no fill)
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid fill in one color
    pub fn solid(color: Color) -> Self {
        Self {
            fill_pattern: FillPattern::Solid,
            foreground: color,
            ..Self::default()
        }
    }

    /// Set the fill pattern
    pub fn with_fill_pattern(mut self, pattern: FillPattern) -> Self {
        self.fill_pattern = pattern;
        self
    }

    /// Set the pattern foreground color
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    /// Set the pattern background color
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the number format
    pub fn with_num_format(mut self, format: NumFormat) -> Self {
        self.num_format = format;
        self
    }

    /// Set the horizontal alignment
    pub fn with_align_h(mut self, align: HorizontalAlignment) -> Self {
        self.align_h = align;
        self
    }

    /// Turn text wrapping on or off
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Turn shrink-to-fit on or off
    pub fn with_shrink_to_fit(mut self, shrink: bool) -> Self {
        self.shrink_to_fit = shrink;
        self
    }

    /// Whether alignment, wrapping or shrinking differ from the defaults
    pub fn has_alignment(&self) -> bool {
        self.align_h != HorizontalAlignment::General || self.wrap || self.shrink_to_fit
    }

    /// Iterate over the explicit colors used by this descriptor
    pub fn colors(&self) -> impl Iterator<Item = Color> {
        [self.foreground, self.background]
            .into_iter()
            .filter(|c| !c.is_auto())
    }
}

/// Index of a descriptor in a book's [`FormatTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatRef(u32);

impl FormatRef {
    /// Wrap a raw table index
    pub const fn new(index: u32) -> Self {
        FormatRef(index)
    }

    /// The raw table index
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Mutable accessor over one cell's format
///
/// Each setter copies the cell's current descriptor, applies the change,
/// registers the result and repoints only this cell. Cells sharing the old
/// descriptor are unaffected.
#[derive(Debug)]
pub struct FormatMut<'a> {
    table: &'a mut FormatTable,
    cell: &'a mut Cell,
}

impl<'a> FormatMut<'a> {
    pub(crate) fn new(table: &'a mut FormatTable, cell: &'a mut Cell) -> Self {
        Self { table, cell }
    }

    /// The cell's current descriptor
    pub fn get(&self) -> &Format {
        self.table
            .get(self.cell.format_index())
            .unwrap_or_else(|| self.table.default_format())
    }

    /// The cell's current format reference
    pub fn format_ref(&self) -> FormatRef {
        FormatRef::new(self.cell.format_index())
    }

    /// Set the fill pattern
    pub fn set_fill_pattern(&mut self, pattern: FillPattern) -> &mut Self {
        self.update(|f| f.fill_pattern = pattern)
    }

    /// Set the pattern foreground color
    pub fn set_pattern_foreground_color(&mut self, color: Color) -> &mut Self {
        self.update(|f| f.foreground = color)
    }

    /// Set the pattern background color
    pub fn set_pattern_background_color(&mut self, color: Color) -> &mut Self {
        self.update(|f| f.background = color)
    }

    /// Set the number format
    pub fn set_num_format(&mut self, format: NumFormat) -> &mut Self {
        self.update(|f| f.num_format = format)
    }

    /// The cell's number format
    pub fn num_format(&self) -> NumFormat {
        self.get().num_format
    }

    /// Turn text wrapping on or off
    pub fn set_wrap(&mut self, wrap: bool) -> &mut Self {
        self.update(|f| f.wrap = wrap)
    }

    /// Turn shrink-to-fit on or off
    pub fn set_shrink_to_fit(&mut self, shrink: bool) -> &mut Self {
        self.update(|f| f.shrink_to_fit = shrink)
    }

    /// Set the horizontal alignment
    pub fn set_align_h(&mut self, align: HorizontalAlignment) -> &mut Self {
        self.update(|f| f.align_h = align)
    }

    /// Replace the whole descriptor
    pub fn set(&mut self, format: Format) -> &mut Self {
        self.update(|f| *f = format)
    }

    fn update(&mut self, apply: impl FnOnce(&mut Format)) -> &mut Self {
        let mut format = self.get().clone();
        apply(&mut format);
        let format_ref = self.table.register(format);
        self.cell.format = Some(format_ref);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    #[test]
    fn test_copy_on_write() {
        let mut table = FormatTable::new();
        let shared = table.register(Format::solid(Color::RED));

        let mut a = Cell::with_format(CellValue::text("a"), shared);
        let b = Cell::with_format(CellValue::text("b"), shared);

        FormatMut::new(&mut table, &mut a).set_pattern_foreground_color(Color::GREEN);

        assert_eq!(b.format, Some(shared));
        assert_ne!(a.format, Some(shared));
        assert_eq!(table.resolve(shared).unwrap(), &Format::solid(Color::RED));
        assert_eq!(
            table.resolve(a.format.unwrap()).unwrap(),
            &Format::solid(Color::GREEN)
        );
    }

    #[test]
    fn test_chained_setters_dedupe() {
        let mut table = FormatTable::new();
        let mut a = Cell::default();
        let mut b = Cell::default();

        FormatMut::new(&mut table, &mut a)
            .set_fill_pattern(FillPattern::Solid)
            .set_pattern_foreground_color(Color::GREEN);
        FormatMut::new(&mut table, &mut b)
            .set_fill_pattern(FillPattern::Solid)
            .set_pattern_foreground_color(Color::GREEN);

        assert_eq!(a.format, b.format);
        // default, solid/auto, solid/green
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_colors() {
        let f = Format::solid(Color::GREEN);
        assert_eq!(f.colors().collect::<Vec<_>>(), vec![Color::GREEN]);
        assert_eq!(Format::new().colors().count(), 0);
    }

    #[test]
    fn test_layout_setters() {
        let mut table = FormatTable::new();
        let mut cell = Cell::default();

        let mut format = FormatMut::new(&mut table, &mut cell);
        format
            .set_num_format(NumFormat::PERCENT)
            .set_align_h(HorizontalAlignment::Right)
            .set_wrap(true);
        assert_eq!(format.num_format(), NumFormat::PERCENT);
        assert!(format.get().has_alignment());

        format.set_wrap(false).set_shrink_to_fit(true);
        let expected = Format::new()
            .with_num_format(NumFormat::PERCENT)
            .with_align_h(HorizontalAlignment::Right)
            .with_shrink_to_fit(true);
        assert_eq!(format.get(), &expected);
        assert!(!Format::solid(Color::RED).has_alignment());
    }
}
