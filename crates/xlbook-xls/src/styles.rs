//! BIFF8 style records.
//!
//! Builds the FONT, XF, STYLE and PALETTE records of the workbook globals
//! stream from a book's format table.
//!
//! XF layout (20 bytes):
//! ```text
//!   0   u16  ifnt        font index (index 4 is never used)
//!   2   u16  ifmt        number format index
//!   4   u16  flags       bit 0 locked, bit 2 style XF, bits 4-15 parent XF
//!   6   u8   alignment   bits 0-2 horizontal, bit 3 wrap, bits 4-6 vertical
//!   7   u8   rotation
//!   8   u8   indent (bits 0-3), shrink to fit (bit 4), reading order
//!   9   u8   used-attribute flags (bits 2-7)
//!  10   u32  border lines/colors 1
//!  14   u32  border lines/colors 2 + fill pattern (bits 26-31)
//!  18   u16  fill colors: foreground bits 0-6, background bits 7-13
//! ```

use xlbook_core::format::{nearest_palette_index, palette_rgb, DEFAULT_PALETTE};
use xlbook_core::{Color, Format, FormatTable, NumFormat};

use crate::biff::strings::write_short_string;
use crate::error::{XlsError, XlsResult};

/// Style XFs written before the first cell XF
pub const STYLE_XF_COUNT: u16 = 15;

/// Most XF records a BIFF8 file may hold
pub const MAX_XF_COUNT: usize = 4050;

/// System window-text color, used for an automatic pattern foreground
const ICV_AUTO_FOREGROUND: u16 = 0x40;
/// System window background, used for an automatic pattern background
const ICV_AUTO_BACKGROUND: u16 = 0x41;
/// Automatic font color
const ICV_FONT_AUTO: u16 = 0x7FFF;

const XF_FLAG_LOCKED: u16 = 0x0001;
const XF_FLAG_STYLE: u16 = 0x0004;
/// Style XFs have no parent (0xFFF in bits 4-15)
const XF_NO_PARENT: u16 = 0xFFF0;
/// Vertical alignment Bottom in the alignment byte
const XF_ALIGN_BOTTOM: u8 = 0x20;
const XF_ALIGN_WRAP: u8 = 0x08;
const XF_SHRINK_TO_FIT: u8 = 0x10;
/// fAtrNum: the number format differs from the parent style
const XF_USED_NUMBER: u8 = 0x04;
/// fAtrAlc: the alignment differs from the parent style
const XF_USED_ALIGN: u8 = 0x10;
/// fAtrPat: the fill differs from the parent style
const XF_USED_FILL: u8 = 0x40;

/// Palette slot of a 0-based palette entry
fn slot_icv(slot: usize) -> u16 {
    slot as u16 + 8
}

/// Maps format colors to palette indices
///
/// Palette colors keep their index. RGB colors use an exact palette match
/// when there is one; otherwise they claim a custom slot, counting down from
/// index 63 and skipping indices the book references directly. When no slot
/// is left the nearest palette color is used.
#[derive(Debug, Clone)]
pub struct PaletteMap {
    palette: [(u8, u8, u8); 56],
    /// Slots that must keep their current color
    pinned: [bool; 56],
    customized: bool,
}

impl PaletteMap {
    /// Build the palette needed by every format in `formats`
    pub fn for_formats(formats: &FormatTable) -> Self {
        let mut map = Self {
            palette: DEFAULT_PALETTE,
            pinned: [false; 56],
            customized: false,
        };

        for (_, format) in formats.iter() {
            for color in format.colors() {
                if let Color::Indexed(i @ 8..=63) = color {
                    map.pinned[(i - 8) as usize] = true;
                }
            }
        }

        for (_, format) in formats.iter() {
            for color in format.colors() {
                if let Color::Rgb { r, g, b } = color {
                    map.claim((r, g, b));
                }
            }
        }

        map
    }

    fn claim(&mut self, rgb: (u8, u8, u8)) {
        if let Some(slot) = self.palette.iter().position(|&p| p == rgb) {
            // Reuse an exact match, and keep it from being overwritten later
            self.pinned[slot] = true;
            return;
        }

        match (0..56).rev().find(|&slot| !self.pinned[slot]) {
            Some(slot) => {
                log::debug!(
                    "palette slot {} <- #{:02X}{:02X}{:02X}",
                    slot_icv(slot),
                    rgb.0,
                    rgb.1,
                    rgb.2
                );
                self.palette[slot] = rgb;
                self.pinned[slot] = true;
                self.customized = true;
            }
            None => {
                let nearest = nearest_palette_index(&self.palette, rgb);
                log::warn!(
                    "palette full, #{:02X}{:02X}{:02X} written as nearest palette color {}",
                    rgb.0,
                    rgb.1,
                    rgb.2,
                    nearest
                );
            }
        }
    }

    /// Palette index for a color, `auto` standing in for [`Color::Auto`]
    pub fn icv(&self, color: Color, auto: u16) -> u16 {
        match color {
            Color::Auto => auto,
            Color::Indexed(i) if palette_rgb(i).is_some() => i as u16,
            Color::Indexed(_) => auto,
            Color::Rgb { r, g, b } => {
                let rgb = (r, g, b);
                match self.palette.iter().position(|&p| p == rgb) {
                    Some(slot) => slot_icv(slot),
                    None => nearest_palette_index(&self.palette, rgb) as u16,
                }
            }
        }
    }

    /// Whether the palette differs from the default one
    pub fn is_customized(&self) -> bool {
        self.customized
    }

    /// RGB of a palette index under this palette
    pub fn rgb(&self, icv: u16) -> Option<(u8, u8, u8)> {
        match icv {
            8..=63 => Some(self.palette[(icv - 8) as usize]),
            0..=7 => palette_rgb(icv as u8),
            _ => None,
        }
    }

    /// PALETTE record body, only when custom colors were assigned
    pub fn record(&self) -> Option<Vec<u8>> {
        if !self.customized {
            return None;
        }
        let mut out = Vec::with_capacity(2 + 56 * 4);
        out.extend_from_slice(&56u16.to_le_bytes());
        for &(r, g, b) in &self.palette {
            out.extend_from_slice(&[r, g, b, 0]);
        }
        Some(out)
    }
}

/// FONT record body for a regular font of `size` points
pub fn font_record(name: &str, size: f64) -> XlsResult<Vec<u8>> {
    let height_twips = (size * 20.0).round().clamp(20.0, 8191.0) as u16;

    let mut out = Vec::with_capacity(16 + name.len() * 2);
    out.extend_from_slice(&height_twips.to_le_bytes()); // height
    out.extend_from_slice(&0u16.to_le_bytes()); // option flags
    out.extend_from_slice(&ICV_FONT_AUTO.to_le_bytes()); // color
    out.extend_from_slice(&400u16.to_le_bytes()); // weight
    out.extend_from_slice(&0u16.to_le_bytes()); // escapement
    out.push(0); // underline
    out.push(0); // family
    out.push(0); // charset
    out.push(0); // reserved
    if !write_short_string(&mut out, name) {
        return Err(XlsError::InvalidFontName(name.to_string()));
    }
    Ok(out)
}

/// Body of the `index`-th style XF (0–14)
pub fn style_xf(index: u16) -> [u8; 20] {
    // Built-in layout: XF 1-2 use font 1, XF 3-4 font 2, the rest font 0
    let font: u16 = match index {
        1 | 2 => 1,
        3 | 4 => 2,
        _ => 0,
    };

    let mut out = [0u8; 20];
    out[0..2].copy_from_slice(&font.to_le_bytes());
    let flags = XF_FLAG_LOCKED | XF_FLAG_STYLE | XF_NO_PARENT;
    out[4..6].copy_from_slice(&flags.to_le_bytes());
    out[6] = XF_ALIGN_BOTTOM;
    out[9] = if index == 0 { 0x00 } else { 0xF4 };
    out[18..20].copy_from_slice(&fill_colors(ICV_AUTO_FOREGROUND, ICV_AUTO_BACKGROUND));
    out
}

/// Body of the cell XF for one format
pub fn cell_xf(format: &Format, palette: &PaletteMap) -> [u8; 20] {
    let mut out = [0u8; 20];
    // Font 0, parent style XF 0
    out[2..4].copy_from_slice(&format.num_format.id().to_le_bytes());
    out[4..6].copy_from_slice(&XF_FLAG_LOCKED.to_le_bytes());
    out[6] = XF_ALIGN_BOTTOM | format.align_h.biff_code();
    if format.wrap {
        out[6] |= XF_ALIGN_WRAP;
    }
    if format.shrink_to_fit {
        out[8] |= XF_SHRINK_TO_FIT;
    }
    if format.num_format != NumFormat::GENERAL {
        out[9] |= XF_USED_NUMBER;
    }
    if format.has_alignment() {
        out[9] |= XF_USED_ALIGN;
    }

    let (fg, bg) = if format.fill_pattern.is_none() {
        (ICV_AUTO_FOREGROUND, ICV_AUTO_BACKGROUND)
    } else {
        out[9] |= XF_USED_FILL;
        (
            palette.icv(format.foreground, ICV_AUTO_FOREGROUND),
            palette.icv(format.background, ICV_AUTO_BACKGROUND),
        )
    };

    let border2 = (format.fill_pattern.biff_code() as u32 & 0x3F) << 26;
    out[14..18].copy_from_slice(&border2.to_le_bytes());
    out[18..20].copy_from_slice(&fill_colors(fg, bg));
    out
}

fn fill_colors(fg: u16, bg: u16) -> [u8; 2] {
    ((fg & 0x7F) | ((bg & 0x7F) << 7)).to_le_bytes()
}

/// XF index used by cells of a format table entry
pub fn xf_index(format_index: u32) -> u16 {
    STYLE_XF_COUNT + format_index as u16
}

/// Fail when a format table needs more XF records than BIFF8 allows
pub fn check_xf_capacity(formats: &FormatTable) -> XlsResult<()> {
    let needed = STYLE_XF_COUNT as usize + formats.len();
    if needed > MAX_XF_COUNT {
        return Err(XlsError::TooManyFormats(formats.len()));
    }
    Ok(())
}

/// STYLE record body for the built-in Normal style, bound to XF 0
pub const STYLE_NORMAL: [u8; 4] = [0x00, 0x80, 0x00, 0xFF];
