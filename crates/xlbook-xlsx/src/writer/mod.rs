//! XLSX writer

use std::collections::BTreeSet;
use std::io::{Cursor, Seek, Write};

use xlbook_core::{
    Book, BookKind, Cell, CellAddress, CellValue, ColumnInfo, Error as CoreError, RowInfo,
    SharedStrings, Sheet,
};

use crate::error::XlsxResult;
use crate::styles::XlsxStyleTable;
use crate::xml::{escape_attr, escape_text, space_attr};

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Encode a book as the bytes of an `.xlsx` file
    pub fn encode(book: &Book) -> XlsxResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::write(book, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write a book to a writer
    pub fn write<W: Write + Seek>(book: &Book, writer: W) -> XlsxResult<()> {
        Self::check_book(book)?;
        log::debug!(
            "encoding xlsx: {} sheet(s), {} format(s)",
            book.sheet_count(),
            book.formats().len()
        );

        let mut zip = zip::ZipWriter::new(writer);
        let style_table = XlsxStyleTable::build(book);

        Self::write_content_types(&mut zip, book)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_app_xml(&mut zip, book)?;
        Self::write_core_xml(&mut zip)?;
        Self::write_workbook_xml(&mut zip, book)?;
        Self::write_workbook_rels(&mut zip, book)?;
        Self::write_styles_xml(&mut zip, &style_table)?;

        // Worksheets intern their text into the shared-string table
        let active = book.active_sheet();
        let mut sst = SharedStrings::new();
        for (i, sheet) in book.sheets().enumerate() {
            Self::write_worksheet(&mut zip, sheet, i, i == active, &mut sst)?;
        }
        Self::write_shared_strings(&mut zip, &sst)?;

        zip.finish()?;
        log::debug!("xlsx package written: {} unique string(s)", sst.len());
        Ok(())
    }

    fn check_book(book: &Book) -> XlsxResult<()> {
        book.validate()?;
        let (max_rows, max_cols) = BookKind::Modern.grid_limits();
        for sheet in book.sheets() {
            if let Some((row, col)) = sheet.extent() {
                if row >= max_rows || col >= max_cols {
                    return Err(CoreError::InvalidCoordinate {
                        row,
                        col,
                        max_rows,
                        max_cols,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        book: &Book,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
        );

        for i in 0..book.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_app_xml<W: Write + Seek>(zip: &mut zip::ZipWriter<W>, book: &Book) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("docProps/app.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>xlbook</Application>
    <DocSecurity>0</DocSecurity>
    <ScaleCrop>false</ScaleCrop>"#,
        );

        content.push_str(&format!(
            r#"
    <HeadingPairs>
        <vt:vector size="2" baseType="variant">
            <vt:variant><vt:lpstr>Worksheets</vt:lpstr></vt:variant>
            <vt:variant><vt:i4>{}</vt:i4></vt:variant>
        </vt:vector>
    </HeadingPairs>
    <TitlesOfParts>
        <vt:vector size="{}" baseType="lpstr">"#,
            book.sheet_count(),
            book.sheet_count()
        ));
        for sheet in book.sheets() {
            content.push_str(&format!(
                "\n            <vt:lpstr>{}</vt:lpstr>",
                escape_text(sheet.name())
            ));
        }
        content.push_str(
            r#"
        </vt:vector>
    </TitlesOfParts>
    <LinksUpToDate>false</LinksUpToDate>
    <SharedDoc>false</SharedDoc>
    <HyperlinksChanged>false</HyperlinksChanged>
    <AppVersion>12.0000</AppVersion>
</Properties>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_core_xml<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("docProps/core.xml", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:creator>xlbook</dc:creator>
    <cp:lastModifiedBy>xlbook</cp:lastModifiedBy>
</cp:coreProperties>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        book: &Book,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let date1904 = if book.settings().date_1904 {
            " date1904=\"1\""
        } else {
            ""
        };
        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <workbookPr{}/>
    <bookViews>
        <workbookView activeTab="{}"/>
    </bookViews>
    <sheets>"#,
            date1904,
            book.active_sheet()
        );

        for (i, sheet) in book.sheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_attr(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        book: &Book,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..book.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        let styles_rid = book.sheet_count() + 1;
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            styles_rid,
            styles_rid + 1
        ));

        content.push_str("\n</Relationships>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        let xml = style_table.to_styles_xml();
        zip.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Sheet,
        index: usize,
        active: bool,
        sst: &mut SharedStrings,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let dimension = match sheet.used_bounds() {
            Some((min_row, min_col, max_row, max_col)) => {
                let first = CellAddress::new(min_row, min_col);
                let last = CellAddress::new(max_row, max_col);
                if first == last {
                    first.to_a1_string()
                } else {
                    format!("{}:{}", first, last)
                }
            }
            None => "A1".to_string(),
        };
        let tab_selected = if active { " tabSelected=\"1\"" } else { "" };

        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <dimension ref="{}"/>
    <sheetViews>
        <sheetView{} workbookViewId="0"/>
    </sheetViews>
    <sheetFormatPr defaultRowHeight="15"/>"#,
            dimension, tab_selected
        );

        let spans = sheet.column_spans();
        if !spans.is_empty() {
            content.push_str("\n    <cols>");
            for (first, last, info) in spans {
                content.push_str(&col_element(first, last, info));
            }
            content.push_str("\n    </cols>");
        }
        content.push_str("\n    <sheetData>");

        let mut rows: BTreeSet<u32> = sheet.store().row_indices().collect();
        rows.extend(sheet.row_infos().map(|(row, _)| row));
        for row in rows {
            content.push_str(&format!("\n        <row r=\"{}\"", row + 1));
            if let Some(info) = sheet.row_info(row) {
                content.push_str(&row_attrs(info));
            }

            let mut cells = sheet.store().iter_row(row).peekable();
            if cells.peek().is_none() {
                content.push_str("/>");
                continue;
            }
            content.push('>');
            for (col, cell) in cells {
                write_cell(&mut content, row, col, cell, sst);
            }
            content.push_str("\n        </row>");
        }

        content.push_str(
            r#"
    </sheetData>
    <pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>
</worksheet>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_shared_strings<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sst: &SharedStrings,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/sharedStrings.xml", options)?;

        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            sst.total_count(),
            sst.len()
        );
        for s in sst.iter() {
            content.push_str(&format!(
                "\n    <si><t{}>{}</t></si>",
                space_attr(s),
                escape_text(s)
            ));
        }
        content.push_str("\n</sst>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// `s` attribute for a format index, empty for the default format
fn style_attr(format_index: u32) -> String {
    if format_index != 0 {
        format!(" s=\"{}\"", format_index)
    } else {
        String::new()
    }
}

fn write_cell(content: &mut String, row: u32, col: u16, cell: &Cell, sst: &mut SharedStrings) {
    let cell_ref = CellAddress::new(row, col).to_a1_string();
    let style = style_attr(cell.format_index());

    match &cell.value {
        CellValue::Number(n) => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{}><v>{}</v></c>",
                cell_ref, style, n
            ));
        }
        CellValue::Text(s) => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{} t=\"s\"><v>{}</v></c>",
                cell_ref,
                style,
                sst.intern(s)
            ));
        }
        CellValue::Boolean(b) => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                cell_ref,
                style,
                u8::from(*b)
            ));
        }
        CellValue::Blank => {
            content.push_str(&format!("\n            <c r=\"{}\"{}/>", cell_ref, style));
        }
    }
}

/// Attributes of a `<row>` with custom settings
fn row_attrs(info: &RowInfo) -> String {
    let mut attrs = format!(" ht=\"{}\" customHeight=\"1\"", info.height);
    if let Some(format) = info.format {
        attrs.push_str(&style_attr(format.index()));
        attrs.push_str(" customFormat=\"1\"");
    }
    if info.hidden {
        attrs.push_str(" hidden=\"1\"");
    }
    attrs
}

/// One `<col>` element; `min` and `max` are 1-based
fn col_element(first: u16, last: u16, info: &ColumnInfo) -> String {
    let mut col = format!(
        "\n        <col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"",
        first + 1,
        last + 1,
        info.width
    );
    if let Some(format) = info.format {
        col.push_str(&format!(" style=\"{}\"", format.index()));
    }
    if info.hidden {
        col.push_str(" hidden=\"1\"");
    }
    col.push_str("/>");
    col
}
