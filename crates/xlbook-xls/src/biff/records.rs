//! BIFF8 record type constants.
//!
//! Reference: [MS-XLS] §2.3: Record Enumeration

// ── Stream structure ────────────────────────────────────────────────────
pub const BOF: u16 = 0x0809;
pub const EOF: u16 = 0x000A;
pub const CONTINUE: u16 = 0x003C;

// ── Workbook globals ────────────────────────────────────────────────────
pub const CODEPAGE: u16 = 0x0042; // Code page (1200 = UTF-16 for BIFF8)
pub const WINDOW1: u16 = 0x003D; // Workbook window: active tab, geometry
pub const DATEMODE: u16 = 0x0022; // 1900 vs 1904 date system (a.k.a. DATE1904)
pub const FONT: u16 = 0x0031; // Font definition
pub const XF: u16 = 0x00E0; // Extended Format (cell format record)
pub const STYLE: u16 = 0x0293; // Named cell style
pub const PALETTE: u16 = 0x0092; // Custom color palette (overrides default 56)
pub const BOUNDSHEET: u16 = 0x0085; // Sheet name, type, visibility, stream offset
pub const SST: u16 = 0x00FC; // Shared String Table
pub const EXTSST: u16 = 0x00FF; // Extended SST (bucket index into the SST)

// ── Cell records ────────────────────────────────────────────────────────
pub const DIMENSION: u16 = 0x0200; // Used range (first/last row/col)
pub const LABELSST: u16 = 0x00FD; // Cell containing SST string index
pub const NUMBER: u16 = 0x0203; // Cell with IEEE 754 double
pub const BLANK: u16 = 0x0201; // Empty cell with formatting
pub const BOOLERR: u16 = 0x0205; // Boolean or error cell

// ── Sheet structure ─────────────────────────────────────────────────────
pub const COLINFO: u16 = 0x007D; // Width and format of a column range
pub const ROW: u16 = 0x0208; // Height and format of one row
pub const WINDOW2: u16 = 0x023E; // Sheet view settings

// ── BOF subtypes (the `dt` field) ───────────────────────────────────────
pub const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;
pub const BOF_WORKSHEET: u16 = 0x0010;

/// BIFF version we write.
pub const BIFF8_VERSION: u16 = 0x0600;

/// Largest record body; anything longer continues in CONTINUE records.
pub const MAX_RECORD_DATA: usize = 8224;
