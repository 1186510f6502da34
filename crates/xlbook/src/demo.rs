//! The reference workbook written by `xlbook demo`

use xlbook_core::{Book, BookKind, Color, FillPattern, Format, SheetMut};

/// Name of the demo's only sheet
pub const DEMO_SHEET: &str = "Sheet 1";

/// Fill the demo content into a sheet
///
/// Row 1 is written twice so only the Unicode text survives; row 2 holds
/// "green" with a solid green fill.
pub fn fill_sheet(sheet: &mut SheetMut<'_>) -> xlbook_core::Result<()> {
    let mut row = 1;
    sheet
        .write_string(row, 0, "Some string", None)?
        .write_string(row, 0, "Unicode - فارسی - Қазақша", None)?;
    row += 1;

    let format = sheet.add_format(Format::default());
    sheet.write_string(row, 0, "green", Some(format))?;
    sheet
        .cell_format(row, 0)?
        .set_fill_pattern(FillPattern::Solid)
        .set_pattern_foreground_color(Color::GREEN);
    Ok(())
}

/// Build the demo book of the given kind
pub fn demo_book(kind: BookKind) -> xlbook_core::Result<Book> {
    let mut book = Book::new(kind);
    fill_sheet(&mut book.add_sheet(DEMO_SHEET)?)?;
    Ok(book)
}
