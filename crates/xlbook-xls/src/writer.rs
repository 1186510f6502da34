//! XLS (BIFF8) writer.
//!
//! Lays out the BIFF8 `Workbook` stream for a book (globals substream
//! followed by one substream per sheet) and wraps it in a Compound File
//! Binary (CFB/OLE2) container.

use std::io::{Cursor, Write};

use xlbook_core::{
    Book, BookKind, CellValue, ColumnInfo, Error as CoreError, RowInfo, SharedStrings, Sheet,
};

use crate::biff::records;
use crate::biff::strings::{write_short_string, SstBuilder};
use crate::biff::{bof, cell_header, BiffStream};
use crate::error::XlsResult;
use crate::styles::{self, PaletteMap, STYLE_XF_COUNT};

/// Streams shorter than this would be stored in the CFB mini-stream
const MIN_STREAM_LEN: usize = 4096;

/// Code page identifier for UTF-16
const CODEPAGE_UTF16: u16 = 1200;

/// FONT records written; references skip index 4
const FONT_COUNT: usize = 4;

/// ROW flags: fGhostDirty off, reserved bit 8 always set
const ROW_FLAG_BASE: u16 = 0x0100;
const ROW_FLAG_HIDDEN: u16 = 0x0020;
const ROW_FLAG_CUSTOM_HEIGHT: u16 = 0x0040;
const ROW_FLAG_FORMATTED: u16 = 0x0080;

/// XF used by rows and columns without a format of their own
const XF_DEFAULT_CELL: u16 = 15;

/// WINDOW2 flags: gridlines, headers, zeros, automatic grid color, outline symbols
const WINDOW2_DEFAULT: u16 = 0x00B6;
/// WINDOW2 flags for the active sheet: also selected and shown in page view
const WINDOW2_ACTIVE: u16 = 0x06B6;

/// XLS file writer.
pub struct XlsWriter;

impl XlsWriter {
    /// Encode a book as the bytes of an `.xls` file
    pub fn encode(book: &Book) -> XlsResult<Vec<u8>> {
        let stream = Self::workbook_stream(book)?;

        // Version 3 (512-byte sectors), as Excel writes; some readers reject
        // a version 4 file whose only stream skips the mini-stream
        let mut compound =
            cfb::CompoundFile::create_with_version(cfb::Version::V3, Cursor::new(Vec::new()))?;
        {
            let mut out = compound.create_stream("/Workbook")?;
            out.write_all(&stream)?;
            out.flush()?;
        }
        Ok(compound.into_inner().into_inner())
    }

    /// Encode a book into any writer
    pub fn write<W: Write>(book: &Book, mut writer: W) -> XlsResult<()> {
        let bytes = Self::encode(book)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Build the BIFF8 `Workbook` stream without the CFB container
    pub fn workbook_stream(book: &Book) -> XlsResult<Vec<u8>> {
        book.validate()?;
        let (max_rows, max_cols) = BookKind::Legacy.grid_limits();
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
        styles::check_xf_capacity(book.formats())?;

        log::debug!(
            "encoding xls: {} sheet(s), {} format(s)",
            book.sheet_count(),
            book.formats().len()
        );

        // Sheet substreams first: they intern the shared strings the globals need
        let active = book.active_sheet();
        let mut sst = SharedStrings::new();
        let sheet_streams: Vec<BiffStream> = book
            .sheets()
            .enumerate()
            .map(|(i, sheet)| Self::sheet_stream(sheet, &mut sst, i == active))
            .collect();

        let palette = PaletteMap::for_formats(book.formats());
        let mut stream = BiffStream::new();
        let boundsheet_offsets = Self::write_globals(&mut stream, book, &sst, &palette)?;

        for (offset_pos, sheet_stream) in boundsheet_offsets.into_iter().zip(&sheet_streams) {
            stream.patch_u32(offset_pos, stream.position() as u32);
            stream.append(sheet_stream);
        }

        stream.pad_to(MIN_STREAM_LEN);
        log::debug!(
            "xls workbook stream: {} bytes, {} unique string(s)",
            stream.position(),
            sst.len()
        );
        Ok(stream.into_bytes())
    }

    /// Write the globals substream, returning where each BOUNDSHEET's
    /// stream offset must be patched
    fn write_globals(
        stream: &mut BiffStream,
        book: &Book,
        sst: &SharedStrings,
        palette: &PaletteMap,
    ) -> XlsResult<Vec<usize>> {
        let settings = book.settings();

        stream.record(records::BOF, &bof(records::BOF_WORKBOOK_GLOBALS));
        stream.record(records::CODEPAGE, &CODEPAGE_UTF16.to_le_bytes());
        stream.record(records::WINDOW1, &window1(book.active_sheet() as u16));
        stream.record(
            records::DATEMODE,
            &u16::from(settings.date_1904).to_le_bytes(),
        );

        let (font_name, font_size) = settings.font(BookKind::Legacy);
        let font = styles::font_record(font_name, font_size)?;
        for _ in 0..FONT_COUNT {
            stream.record(records::FONT, &font);
        }

        for i in 0..STYLE_XF_COUNT {
            stream.record(records::XF, &styles::style_xf(i));
        }
        for (_, format) in book.formats().iter() {
            stream.record(records::XF, &styles::cell_xf(format, palette));
        }

        stream.record(records::STYLE, &styles::STYLE_NORMAL);
        if let Some(body) = palette.record() {
            stream.record(records::PALETTE, &body);
        }

        let mut offsets = Vec::with_capacity(book.sheet_count());
        for sheet in book.sheets() {
            let mut body = Vec::with_capacity(8 + sheet.name().len() * 2);
            body.extend_from_slice(&0u32.to_le_bytes()); // placeholder lbPlyPos
            body.push(0); // visible
            body.push(0); // worksheet
            if !write_short_string(&mut body, sheet.name()) {
                return Err(CoreError::InvalidSheetName(sheet.name().to_string()).into());
            }
            offsets.push(stream.position() + 4);
            stream.record(records::BOUNDSHEET, &body);
        }

        let encoded = SstBuilder::build(sst, stream.position());
        for (i, body) in encoded.bodies.iter().enumerate() {
            let record_type = if i == 0 { records::SST } else { records::CONTINUE };
            stream.record(record_type, body);
        }
        stream.record(records::EXTSST, &encoded.extsst);

        stream.record(records::EOF, &[]);
        Ok(offsets)
    }

    /// Build one worksheet substream
    fn sheet_stream(sheet: &Sheet, sst: &mut SharedStrings, active: bool) -> BiffStream {
        let mut stream = BiffStream::new();
        stream.record(records::BOF, &bof(records::BOF_WORKSHEET));
        for (first, last, info) in sheet.column_spans() {
            stream.record(records::COLINFO, &colinfo(first, last, info));
        }
        stream.record(records::DIMENSION, &dimensions(sheet));
        for (row, info) in sheet.row_infos() {
            stream.record(records::ROW, &row_record(sheet, row, info));
        }

        for (row, col, cell) in sheet.cells() {
            let xf = styles::xf_index(cell.format_index());
            let header = cell_header(row, col, xf);
            match &cell.value {
                CellValue::Text(s) => {
                    let mut body = header.to_vec();
                    body.extend_from_slice(&sst.intern(s).to_le_bytes());
                    stream.record(records::LABELSST, &body);
                }
                CellValue::Number(n) => {
                    let mut body = header.to_vec();
                    body.extend_from_slice(&n.to_le_bytes());
                    stream.record(records::NUMBER, &body);
                }
                CellValue::Boolean(b) => {
                    let mut body = header.to_vec();
                    body.push(u8::from(*b));
                    body.push(0); // boolean, not error
                    stream.record(records::BOOLERR, &body);
                }
                CellValue::Blank => {
                    stream.record(records::BLANK, &header);
                }
            }
        }

        let grbit = if active { WINDOW2_ACTIVE } else { WINDOW2_DEFAULT };
        stream.record(records::WINDOW2, &window2(grbit));
        stream.record(records::EOF, &[]);
        stream
    }
}

/// WINDOW1 record body (18 bytes)
fn window1(active_tab: u16) -> [u8; 18] {
    let mut out = [0u8; 18];
    out[0..2].copy_from_slice(&0x01E0u16.to_le_bytes()); // x
    out[2..4].copy_from_slice(&0x005Au16.to_le_bytes()); // y
    out[4..6].copy_from_slice(&0x3FCFu16.to_le_bytes()); // width
    out[6..8].copy_from_slice(&0x2A4Eu16.to_le_bytes()); // height
    out[8..10].copy_from_slice(&0x0038u16.to_le_bytes()); // scroll bars and tabs shown
    out[10..12].copy_from_slice(&active_tab.to_le_bytes()); // iTabCur
    out[12..14].copy_from_slice(&0u16.to_le_bytes()); // iTabFirst
    out[14..16].copy_from_slice(&1u16.to_le_bytes()); // cTabSel
    out[16..18].copy_from_slice(&600u16.to_le_bytes()); // wTabRatio
    out
}

/// WINDOW2 record body (18 bytes)
fn window2(grbit: u16) -> [u8; 18] {
    let mut out = [0u8; 18];
    out[0..2].copy_from_slice(&grbit.to_le_bytes());
    out[6..8].copy_from_slice(&0x0040u16.to_le_bytes()); // gridline color: automatic
    out
}

/// COLINFO record body (12 bytes)
fn colinfo(first: u16, last: u16, info: &ColumnInfo) -> [u8; 12] {
    let width = (info.width * 256.0).round() as u16;
    let xf = info
        .format
        .map_or(XF_DEFAULT_CELL, |f| styles::xf_index(f.index()));

    let mut out = [0u8; 12];
    out[0..2].copy_from_slice(&first.to_le_bytes());
    out[2..4].copy_from_slice(&last.to_le_bytes());
    out[4..6].copy_from_slice(&width.to_le_bytes());
    out[6..8].copy_from_slice(&xf.to_le_bytes());
    out[8..10].copy_from_slice(&u16::from(info.hidden).to_le_bytes());
    out
}

/// ROW record body (16 bytes)
fn row_record(sheet: &Sheet, row: u32, info: &RowInfo) -> [u8; 16] {
    let mut cols = sheet.store().iter_row(row).map(|(col, _)| col);
    let first_col = cols.next();
    let (col_mic, col_mac) = match first_col {
        Some(first) => (first, cols.last().unwrap_or(first) + 1),
        None => (0, 0),
    };
    let height = (info.height * 20.0).round() as u16;

    let mut grbit = ROW_FLAG_BASE | ROW_FLAG_CUSTOM_HEIGHT;
    if info.hidden {
        grbit |= ROW_FLAG_HIDDEN;
    }
    let xf = match info.format {
        Some(f) => {
            grbit |= ROW_FLAG_FORMATTED;
            styles::xf_index(f.index())
        }
        None => XF_DEFAULT_CELL,
    };

    let mut out = [0u8; 16];
    out[0..2].copy_from_slice(&(row as u16).to_le_bytes());
    out[2..4].copy_from_slice(&col_mic.to_le_bytes());
    out[4..6].copy_from_slice(&col_mac.to_le_bytes());
    out[6..8].copy_from_slice(&height.to_le_bytes());
    out[12..14].copy_from_slice(&grbit.to_le_bytes());
    out[14..16].copy_from_slice(&(xf & 0x0FFF).to_le_bytes());
    out
}

/// DIMENSIONS record body: first row, last row + 1, first col, last col + 1
fn dimensions(sheet: &Sheet) -> [u8; 14] {
    let mut out = [0u8; 14];
    if let Some((min_row, min_col, max_row, max_col)) = sheet.used_bounds() {
        out[0..4].copy_from_slice(&min_row.to_le_bytes());
        out[4..8].copy_from_slice(&(max_row + 1).to_le_bytes());
        out[8..10].copy_from_slice(&min_col.to_le_bytes());
        out[10..12].copy_from_slice(&(max_col + 1).to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biff::strings::tests::decode_sst;
    use crate::biff::tests::{read_records, RawRecord};
    use crate::error::XlsError;
    use pretty_assertions::assert_eq;
    use std::io::Read;
    use xlbook_core::{Color, FillPattern, Format};

    fn demo_book() -> Book {
        let mut book = Book::new(BookKind::Legacy);
        let mut sheet = book.add_sheet("Sheet 1").unwrap();
        sheet
            .write_string(1, 0, "Some string", None)
            .unwrap()
            .write_string(1, 0, "Unicode - فارسی - Қазақша", None)
            .unwrap();
        sheet
            .cell_format(1, 0)
            .unwrap()
            .set_fill_pattern(FillPattern::Solid)
            .set_pattern_foreground_color(Color::GREEN);
        book
    }

    fn of_type(recs: &[RawRecord], record_type: u16) -> Vec<&RawRecord> {
        recs.iter().filter(|r| r.record_type == record_type).collect()
    }

    #[test]
    fn test_globals_layout() {
        let stream = XlsWriter::workbook_stream(&demo_book()).unwrap();
        assert_eq!(stream.len(), MIN_STREAM_LEN);

        let recs = read_records(&stream);
        let types: Vec<u16> = recs.iter().map(|r| r.record_type).collect();
        assert_eq!(types[0], records::BOF);
        assert_eq!(types[1], records::CODEPAGE);
        assert_eq!(recs[1].data, 1200u16.to_le_bytes());
        assert_eq!(of_type(&recs, records::FONT).len(), 4);
        // 15 style XFs + default, solid/auto (left by the first setter), solid/green
        assert_eq!(of_type(&recs, records::XF).len(), 18);
        assert!(of_type(&recs, records::PALETTE).is_empty());
        assert_eq!(of_type(&recs, records::BOF).len(), 2);
        assert_eq!(of_type(&recs, records::EOF).len(), 2);
    }

    #[test]
    fn test_boundsheet_offset_points_at_sheet_bof() {
        let mut book = demo_book();
        book.add_sheet("Second").unwrap().write_number(0, 0, 1.0, None).unwrap();
        let stream = XlsWriter::workbook_stream(&book).unwrap();
        let recs = read_records(&stream);

        let sheets = of_type(&recs, records::BOUNDSHEET);
        assert_eq!(sheets.len(), 2);
        for rec in sheets {
            let offset = u32::from_le_bytes(rec.data[0..4].try_into().unwrap()) as usize;
            let target = recs.iter().find(|r| r.offset == offset).unwrap();
            assert_eq!(target.record_type, records::BOF);
            assert_eq!(&target.data[2..4], &records::BOF_WORKSHEET.to_le_bytes());
        }
    }

    #[test]
    fn test_overwritten_cell_and_fill() {
        let stream = XlsWriter::workbook_stream(&demo_book()).unwrap();
        let recs = read_records(&stream);

        let labels = of_type(&recs, records::LABELSST);
        assert_eq!(labels.len(), 1);
        let label = &labels[0].data;
        assert_eq!(&label[0..2], &1u16.to_le_bytes()); // row
        assert_eq!(&label[2..4], &0u16.to_le_bytes()); // col
        let xf = u16::from_le_bytes([label[4], label[5]]) as usize;
        assert_eq!(&label[6..10], &0u32.to_le_bytes()); // sst index

        let sst: Vec<Vec<u8>> = of_type(&recs, records::SST)
            .iter()
            .map(|r| r.data.clone())
            .collect();
        assert_eq!(decode_sst(&sst), vec!["Unicode - فارسی - Қазақша"]);

        let xfs = of_type(&recs, records::XF);
        let xf_body = &xfs[xf].data;
        let border2 = u32::from_le_bytes(xf_body[14..18].try_into().unwrap());
        assert_eq!(border2 >> 26, 1); // solid
        assert_eq!(u16::from_le_bytes([xf_body[18], xf_body[19]]) & 0x7F, 17); // green
    }

    #[test]
    fn test_cell_record_kinds() {
        let mut book = Book::new(BookKind::Legacy);
        book.add_sheet("S")
            .unwrap()
            .write_number(0, 0, 2.5, None)
            .unwrap()
            .write_bool(0, 1, true, None)
            .unwrap()
            .write_blank(3, 4, None)
            .unwrap();
        let recs = read_records(&XlsWriter::workbook_stream(&book).unwrap());

        let number = of_type(&recs, records::NUMBER)[0];
        assert_eq!(&number.data[6..14], &2.5f64.to_le_bytes());
        let boolerr = of_type(&recs, records::BOOLERR)[0];
        assert_eq!(&boolerr.data[6..8], &[1, 0]);
        assert_eq!(of_type(&recs, records::BLANK).len(), 1);

        let dims = &of_type(&recs, records::DIMENSION)[0].data;
        assert_eq!(&dims[0..4], &0u32.to_le_bytes());
        assert_eq!(&dims[4..8], &4u32.to_le_bytes());
        assert_eq!(&dims[8..10], &0u16.to_le_bytes());
        assert_eq!(&dims[10..12], &5u16.to_le_bytes());
    }

    #[test]
    fn test_custom_rgb_writes_palette() {
        let mut book = Book::new(BookKind::Legacy);
        let fmt = book.add_format(Format::solid(Color::rgb(0x12, 0x34, 0x56)));
        book.add_sheet("S")
            .unwrap()
            .write_blank(0, 0, Some(fmt))
            .unwrap();
        let recs = read_records(&XlsWriter::workbook_stream(&book).unwrap());

        let palette = &of_type(&recs, records::PALETTE)[0].data;
        assert_eq!(&palette[2 + 55 * 4..2 + 56 * 4], &[0x12, 0x34, 0x56, 0]);
    }

    #[test]
    fn test_active_sheet_selected() {
        let mut book = Book::new(BookKind::Legacy);
        book.add_sheet("A").unwrap();
        book.add_sheet("B").unwrap();
        book.set_active_sheet(1).unwrap();
        let recs = read_records(&XlsWriter::workbook_stream(&book).unwrap());

        let window1 = &of_type(&recs, records::WINDOW1)[0].data;
        assert_eq!(&window1[10..12], &1u16.to_le_bytes());
        let grbits: Vec<u16> = of_type(&recs, records::WINDOW2)
            .iter()
            .map(|r| u16::from_le_bytes([r.data[0], r.data[1]]))
            .collect();
        assert_eq!(grbits, vec![WINDOW2_DEFAULT, WINDOW2_ACTIVE]);
    }

    #[test]
    fn test_large_sst_uses_continue() {
        let mut book = Book::new(BookKind::Legacy);
        let mut sheet = book.add_sheet("Strings").unwrap();
        let expected: Vec<String> = (0..2000).map(|i| format!("value-{:05}", i)).collect();
        for (i, s) in expected.iter().enumerate() {
            sheet.write_string(i as u32, 0, s.as_str(), None).unwrap();
        }
        let recs = read_records(&XlsWriter::workbook_stream(&book).unwrap());

        let sst_pos = recs
            .iter()
            .position(|r| r.record_type == records::SST)
            .unwrap();
        let bodies: Vec<Vec<u8>> = recs[sst_pos..]
            .iter()
            .take_while(|r| r.record_type == records::SST || r.record_type == records::CONTINUE)
            .map(|r| r.data.clone())
            .collect();
        assert!(bodies.len() > 1);
        assert_eq!(decode_sst(&bodies), expected);
        assert_eq!(recs[sst_pos + bodies.len()].record_type, records::EXTSST);
    }

    #[test]
    fn test_rejects_unencodable_books() {
        let book = Book::new(BookKind::Legacy);
        assert!(matches!(
            XlsWriter::encode(&book),
            Err(XlsError::Core(CoreError::NoSheets))
        ));

        let mut book = Book::new(BookKind::Modern);
        book.add_sheet("Wide").unwrap().write_number(0, 300, 1.0, None).unwrap();
        assert!(matches!(
            XlsWriter::encode(&book),
            Err(XlsError::Core(CoreError::InvalidCoordinate { col: 300, .. }))
        ));

        let mut book = Book::new(BookKind::Legacy);
        book.add_sheet("S").unwrap().write_number(0, 0, f64::INFINITY, None).unwrap();
        assert!(matches!(
            XlsWriter::encode(&book),
            Err(XlsError::Core(CoreError::UnsupportedValue { .. }))
        ));
    }

    #[test]
    fn test_column_and_row_records() {
        let mut book = Book::new(BookKind::Legacy);
        let yellow = book.add_format(Format::solid(Color::YELLOW));
        book.add_sheet("S")
            .unwrap()
            .write_number(2, 1, 1.0, None)
            .unwrap()
            .write_number(2, 3, 2.0, None)
            .unwrap()
            .set_col(0, 2, 20.0, None, false)
            .unwrap()
            .set_col(4, 4, 8.5, Some(yellow), true)
            .unwrap()
            .set_row(2, 30.0, None, false)
            .unwrap()
            .set_row(7, 15.0, Some(yellow), true)
            .unwrap();
        let recs = read_records(&XlsWriter::workbook_stream(&book).unwrap());

        let colinfo = of_type(&recs, records::COLINFO);
        assert_eq!(colinfo.len(), 2);
        assert_eq!(&colinfo[0].data[0..4], &[0, 0, 2, 0]);
        assert_eq!(&colinfo[0].data[4..6], &(20u16 * 256).to_le_bytes());
        assert_eq!(&colinfo[0].data[6..8], &15u16.to_le_bytes());
        assert_eq!(&colinfo[0].data[8..10], &0u16.to_le_bytes());
        assert_eq!(&colinfo[1].data[4..6], &2176u16.to_le_bytes());
        assert_eq!(&colinfo[1].data[6..8], &16u16.to_le_bytes());
        assert_eq!(&colinfo[1].data[8..10], &1u16.to_le_bytes());

        let rows = of_type(&recs, records::ROW);
        assert_eq!(rows.len(), 2);
        let row = &rows[0].data;
        assert_eq!(&row[0..2], &2u16.to_le_bytes());
        assert_eq!(&row[2..4], &1u16.to_le_bytes());
        assert_eq!(&row[4..6], &4u16.to_le_bytes());
        assert_eq!(&row[6..8], &600u16.to_le_bytes());
        assert_eq!(&row[12..14], &0x0140u16.to_le_bytes());
        assert_eq!(&row[14..16], &15u16.to_le_bytes());
        let row = &rows[1].data;
        assert_eq!(&row[2..6], &[0, 0, 0, 0]);
        assert_eq!(&row[12..14], &0x01E0u16.to_le_bytes());
        assert_eq!(&row[14..16], &16u16.to_le_bytes());

        // COLINFO ahead of DIMENSION, ROW between DIMENSION and the cells
        let position = |t: u16| recs.iter().position(|r| r.record_type == t).unwrap();
        assert!(position(records::COLINFO) < position(records::DIMENSION));
        assert!(position(records::DIMENSION) < position(records::ROW));
        assert!(position(records::ROW) < position(records::NUMBER));
    }

    #[test]
    fn test_row_outside_legacy_grid() {
        let mut book = Book::new(BookKind::Modern);
        book.add_sheet("Tall").unwrap().set_row(70_000, 12.0, None, false).unwrap();
        assert!(matches!(
            XlsWriter::encode(&book),
            Err(XlsError::Core(CoreError::InvalidCoordinate { row: 70_000, .. }))
        ));
    }

    #[test]
    fn test_cfb_container() {
        let bytes = XlsWriter::encode(&demo_book()).unwrap();
        let mut compound = cfb::CompoundFile::open(Cursor::new(bytes)).unwrap();
        let mut stream = Vec::new();
        compound
            .open_stream("/Workbook")
            .unwrap()
            .read_to_end(&mut stream)
            .unwrap();
        assert_eq!(stream, XlsWriter::workbook_stream(&demo_book()).unwrap());
        assert_eq!(compound.version(), cfb::Version::V3);
    }
}
