//! XLSX styles table.
//!
//! Builds `xl/styles.xml` from a book's format table. Cell XF `i` describes
//! format-table entry `i`, so a cell's `s` attribute is its format index.

use ahash::AHashMap;

use xlbook_core::format::palette_rgb;
use xlbook_core::{Book, BookKind, Color, FillPattern, Format, FormatTable};

use crate::xml::escape_attr;

/// Fill IDs 0 and 1 are reserved for `none` and `gray125`
const RESERVED_FILLS: u32 = 2;

/// `indexed` value of the system foreground color
const INDEXED_AUTO: u8 = 64;

/// The parts of a format that make up a `<fill>`
type FillKey = (FillPattern, Color, Color);

fn fill_key(format: &Format) -> FillKey {
    (format.fill_pattern, format.foreground, format.background)
}

/// Resolved `styles.xml` content for a book
pub(crate) struct XlsxStyleTable {
    font_name: String,
    font_size: f64,
    /// Distinct non-empty fills, in first-use order (IDs start at 2)
    fills: Vec<FillKey>,
    /// Cell XFs in format-table order, with their fill ID
    xfs: Vec<(Format, u32)>,
}

impl XlsxStyleTable {
    pub(crate) fn build(book: &Book) -> Self {
        let (font_name, font_size) = book.settings().font(BookKind::Modern);
        let (fills, xfs) = Self::resolve_fills(book.formats());
        Self {
            font_name: font_name.to_string(),
            font_size,
            fills,
            xfs,
        }
    }

    /// Formats that differ only in number format or alignment share a fill
    fn resolve_fills(formats: &FormatTable) -> (Vec<FillKey>, Vec<(Format, u32)>) {
        let mut fill_ids: AHashMap<FillKey, u32> = AHashMap::new();
        let mut fills = Vec::new();
        let mut xfs = Vec::with_capacity(formats.len());

        for (_, format) in formats.iter() {
            let fill_id = if format.fill_pattern.is_none() {
                0
            } else {
                let key = fill_key(format);
                *fill_ids.entry(key).or_insert_with(|| {
                    fills.push(key);
                    RESERVED_FILLS + fills.len() as u32 - 1
                })
            };
            xfs.push((format.clone(), fill_id));
        }
        (fills, xfs)
    }

    /// Number of cell XFs written
    pub(crate) fn xf_count(&self) -> usize {
        self.xfs.len()
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        xml.push_str(&format!(
            "\n  <fonts count=\"1\">\n    <font><sz val=\"{}\"/><name val=\"{}\"/><family val=\"2\"/></font>\n  </fonts>",
            self.font_size,
            escape_attr(&self.font_name)
        ));

        xml.push_str(&format!(
            "\n  <fills count=\"{}\">",
            RESERVED_FILLS as usize + self.fills.len()
        ));
        xml.push_str("\n    <fill><patternFill patternType=\"none\"/></fill>");
        xml.push_str("\n    <fill><patternFill patternType=\"gray125\"/></fill>");
        for &(pattern, fg, bg) in &self.fills {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(pattern, fg, bg));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(
            r#"
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.xf_count()));
        for (format, fill_id) in &self.xfs {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(format, *fill_id));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
        );

        xml.push_str("\n</styleSheet>");
        xml
    }
}

/// Indices outside the 64-entry palette fall back to the system color
fn write_color(tag: &str, color: Color) -> String {
    match color {
        Color::Indexed(i) if palette_rgb(i).is_some() => format!("<{tag} indexed=\"{}\"/>", i),
        Color::Auto | Color::Indexed(_) => format!("<{tag} indexed=\"{}\"/>", INDEXED_AUTO),
        Color::Rgb { .. } => format!("<{tag} rgb=\"{}\"/>", color.to_argb_hex()),
    }
}

fn write_fill(pattern: FillPattern, fg: Color, bg: Color) -> String {
    match pattern {
        FillPattern::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        pattern => format!(
            "<fill><patternFill patternType=\"{}\">{}{}</patternFill></fill>",
            pattern.xml_name(),
            write_color("fgColor", fg),
            write_color("bgColor", bg)
        ),
    }
}

/// One `cellXfs` entry, always with a closing tag
fn write_xf(format: &Format, fill_id: u32) -> String {
    let mut xf = format!(
        "<xf numFmtId=\"{}\" fontId=\"0\" fillId=\"{}\" borderId=\"0\" xfId=\"0\"",
        format.num_format.id(),
        fill_id
    );
    if format.num_format.id() != 0 {
        xf.push_str(" applyNumberFormat=\"1\"");
    }
    if fill_id != 0 {
        xf.push_str(" applyFill=\"1\"");
    }
    if !format.has_alignment() {
        xf.push_str("></xf>");
        return xf;
    }

    xf.push_str(" applyAlignment=\"1\"><alignment");
    if format.align_h != Default::default() {
        xf.push_str(&format!(" horizontal=\"{}\"", format.align_h.xml_name()));
    }
    if format.wrap {
        xf.push_str(" wrapText=\"1\"");
    }
    if format.shrink_to_fit {
        xf.push_str(" shrinkToFit=\"1\"");
    }
    xf.push_str("/></xf>");
    xf
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xlbook_core::{HorizontalAlignment, NumFormat};

    fn fill_ids(table: &XlsxStyleTable) -> Vec<u32> {
        table.xfs.iter().map(|(_, id)| *id).collect()
    }

    fn book_with_formats(formats: &[Format]) -> Book {
        let mut book = Book::new(BookKind::Modern);
        for format in formats {
            book.add_format(format.clone());
        }
        book
    }

    #[test]
    fn test_default_only() {
        let table = XlsxStyleTable::build(&Book::new(BookKind::Modern));
        assert_eq!(table.xf_count(), 1);

        let xml = table.to_styles_xml();
        assert!(xml.contains("<fills count=\"2\">"));
        assert!(xml.contains("patternType=\"gray125\""));
        assert!(xml.contains("<cellXfs count=\"1\">"));
        assert!(xml.contains("<sz val=\"11\"/><name val=\"Calibri\"/>"));
        assert!(xml.contains(
            "<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"></xf>"
        ));
    }

    #[test]
    fn test_fills_follow_formats() {
        let green = Format::solid(Color::GREEN);
        let book = book_with_formats(&[green, Format::solid(Color::rgb(0x12, 0x34, 0x56))]);
        let table = XlsxStyleTable::build(&book);
        assert_eq!(fill_ids(&table), vec![0, 2, 3]);

        let xml = table.to_styles_xml();
        assert!(xml.contains("<fills count=\"4\">"));
        assert!(xml.contains(
            "<fill><patternFill patternType=\"solid\"><fgColor indexed=\"17\"/><bgColor indexed=\"64\"/></patternFill></fill>"
        ));
        assert!(xml.contains("<fgColor rgb=\"FF123456\"/>"));
        assert!(xml.contains("fillId=\"2\" borderId=\"0\" xfId=\"0\" applyFill=\"1\"></xf>"));
    }

    #[test]
    fn test_pattern_fill_colors() {
        assert_eq!(
            write_fill(FillPattern::LightGrid, Color::RED, Color::YELLOW),
            "<fill><patternFill patternType=\"lightGrid\"><fgColor indexed=\"10\"/><bgColor indexed=\"13\"/></patternFill></fill>"
        );
    }

    #[test]
    fn test_colors_without_pattern_use_no_fill() {
        let format = Format::new().with_foreground(Color::RED);
        let book = book_with_formats(&[format]);
        let table = XlsxStyleTable::build(&book);
        assert_eq!(fill_ids(&table), vec![0, 0]);
    }

    #[test]
    fn test_out_of_palette_index_is_system_color() {
        assert_eq!(write_color("fgColor", Color::Indexed(70)), "<fgColor indexed=\"64\"/>");
        assert_eq!(write_color("fgColor", Color::Indexed(63)), "<fgColor indexed=\"63\"/>");
        assert_eq!(write_color("bgColor", Color::Auto), "<bgColor indexed=\"64\"/>");
    }

    #[test]
    fn test_layout_only_formats_share_fill() {
        let red = Format::solid(Color::RED);
        let book = book_with_formats(&[
            red.clone(),
            red.clone().with_wrap(true),
            Format::new().with_num_format(NumFormat::DATE),
        ]);
        let table = XlsxStyleTable::build(&book);
        assert_eq!(fill_ids(&table), vec![0, 2, 2, 0]);
        assert_eq!(table.fills.len(), 1);
    }

    #[test]
    fn test_xf_number_format_and_alignment() {
        let format = Format::new()
            .with_num_format(NumFormat::PERCENT)
            .with_align_h(HorizontalAlignment::CenterAcross)
            .with_wrap(true)
            .with_shrink_to_fit(true);
        assert_eq!(
            write_xf(&format, 0),
            "<xf numFmtId=\"9\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyNumberFormat=\"1\" applyAlignment=\"1\"><alignment horizontal=\"centerContinuous\" wrapText=\"1\" shrinkToFit=\"1\"/></xf>"
        );
        assert_eq!(
            write_xf(&Format::new().with_wrap(true), 3),
            "<xf numFmtId=\"0\" fontId=\"0\" fillId=\"3\" borderId=\"0\" xfId=\"0\" applyFill=\"1\" applyAlignment=\"1\"><alignment wrapText=\"1\"/></xf>"
        );
    }

    #[test]
    fn test_font_from_settings() {
        let mut book = Book::new(BookKind::Modern);
        book.settings_mut().font_name = Some("Noto & Co".into());
        book.settings_mut().font_size = Some(9.5);
        let xml = XlsxStyleTable::build(&book).to_styles_xml();
        assert!(xml.contains("<sz val=\"9.5\"/><name val=\"Noto &amp; Co\"/>"));
    }
}
