//! Color representation and the legacy 56-color palette

use std::fmt;

/// The standard palette.  Indices 8–63 map to entries 0–55 here; indices
/// 0–7 repeat the first eight entries.
pub const DEFAULT_PALETTE: [(u8, u8, u8); 56] = [
    (0, 0, 0),       //  8: Black
    (255, 255, 255), //  9: White
    (255, 0, 0),     // 10: Red
    (0, 255, 0),     // 11: Bright Green
    (0, 0, 255),     // 12: Blue
    (255, 255, 0),   // 13: Yellow
    (255, 0, 255),   // 14: Pink
    (0, 255, 255),   // 15: Turquoise
    (128, 0, 0),     // 16: Dark Red
    (0, 128, 0),     // 17: Green
    (0, 0, 128),     // 18: Dark Blue
    (128, 128, 0),   // 19: Dark Yellow
    (128, 0, 128),   // 20: Violet
    (0, 128, 128),   // 21: Teal
    (192, 192, 192), // 22: Silver (25% Gray)
    (128, 128, 128), // 23: Gray (50% Gray)
    (153, 153, 255), // 24: Periwinkle
    (153, 51, 102),  // 25: Plum
    (255, 255, 204), // 26: Ivory
    (204, 255, 255), // 27: Light Turquoise
    (102, 0, 102),   // 28: Dark Purple
    (255, 128, 128), // 29: Coral
    (0, 102, 204),   // 30: Ocean Blue
    (204, 204, 255), // 31: Ice Blue
    (0, 0, 128),     // 32: Dark Blue (dup)
    (255, 0, 255),   // 33: Pink (dup)
    (255, 255, 0),   // 34: Yellow (dup)
    (0, 255, 255),   // 35: Turquoise (dup)
    (128, 0, 128),   // 36: Violet (dup)
    (128, 0, 0),     // 37: Dark Red (dup)
    (0, 128, 128),   // 38: Teal (dup)
    (0, 0, 255),     // 39: Blue (dup)
    (0, 204, 255),   // 40: Sky Blue
    (204, 255, 255), // 41: Light Turquoise (dup)
    (204, 255, 204), // 42: Light Green
    (255, 255, 153), // 43: Light Yellow
    (153, 204, 255), // 44: Pale Blue
    (255, 153, 204), // 45: Rose
    (204, 153, 255), // 46: Lavender
    (255, 204, 153), // 47: Tan
    (51, 102, 255),  // 48: Light Blue
    (51, 204, 204),  // 49: Aqua
    (153, 204, 0),   // 50: Lime
    (255, 204, 0),   // 51: Gold
    (255, 153, 0),   // 52: Light Orange
    (255, 102, 0),   // 53: Orange
    (102, 102, 153), // 54: Blue-Gray
    (150, 150, 150), // 55: 40% Gray
    (0, 51, 102),    // 56: Dark Teal
    (51, 153, 102),  // 57: Sea Green
    (0, 51, 0),      // 58: Dark Green
    (51, 51, 0),     // 59: Olive Green
    (153, 51, 0),    // 60: Brown
    (153, 51, 51),   // 61: Dark Rose
    (51, 51, 153),   // 62: Indigo
    (51, 51, 51),    // 63: 80% Gray
];

/// First palette index addressable by cells
pub const PALETTE_FIRST: u8 = 8;

/// Last palette index addressable by cells
pub const PALETTE_LAST: u8 = 63;

/// Color representation
///
/// Palette colors use the same numbering as the legacy format, so
/// `Color::GREEN` is palette index 17.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// Index into the 56-color palette (8–63; 0–7 alias 8–15)
    Indexed(u8),

    /// RGB color
    Rgb { r: u8, g: u8, b: u8 },
}

/// Named palette entries, as accepted by [`Color::from_name`]
const NAMED: &[(&str, u8)] = &[
    ("black", 8),
    ("white", 9),
    ("red", 10),
    ("bright_green", 11),
    ("blue", 12),
    ("yellow", 13),
    ("pink", 14),
    ("turquoise", 15),
    ("dark_red", 16),
    ("green", 17),
    ("dark_blue", 18),
    ("dark_yellow", 19),
    ("violet", 20),
    ("teal", 21),
    ("gray25", 22),
    ("gray50", 23),
    ("sky_blue", 40),
    ("light_green", 42),
    ("light_yellow", 43),
    ("pale_blue", 44),
    ("rose", 45),
    ("lavender", 46),
    ("tan", 47),
    ("light_blue", 48),
    ("aqua", 49),
    ("lime", 50),
    ("gold", 51),
    ("light_orange", 52),
    ("orange", 53),
    ("gray40", 55),
    ("dark_teal", 56),
    ("sea_green", 57),
    ("dark_green", 58),
    ("olive_green", 59),
    ("brown", 60),
    ("indigo", 62),
    ("gray80", 63),
];

impl Color {
    pub const BLACK: Color = Color::Indexed(8);
    pub const WHITE: Color = Color::Indexed(9);
    pub const RED: Color = Color::Indexed(10);
    pub const BRIGHT_GREEN: Color = Color::Indexed(11);
    pub const BLUE: Color = Color::Indexed(12);
    pub const YELLOW: Color = Color::Indexed(13);
    pub const PINK: Color = Color::Indexed(14);
    pub const TURQUOISE: Color = Color::Indexed(15);
    pub const DARK_RED: Color = Color::Indexed(16);
    pub const GREEN: Color = Color::Indexed(17);
    pub const DARK_BLUE: Color = Color::Indexed(18);
    pub const DARK_YELLOW: Color = Color::Indexed(19);
    pub const VIOLET: Color = Color::Indexed(20);
    pub const TEAL: Color = Color::Indexed(21);
    pub const GRAY25: Color = Color::Indexed(22);
    pub const GRAY50: Color = Color::Indexed(23);
    pub const ORANGE: Color = Color::Indexed(53);

    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create from a hex string (e.g., "#008000" or "008000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb { r, g, b })
    }

    /// Look up a palette color by name ("green", "dark_red", "auto", ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if name == "auto" {
            return Some(Color::Auto);
        }
        NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, i)| Color::Indexed(*i))
    }

    /// Parse either a palette name or a `#RRGGBB` hex string
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_name(s).or_else(|| Self::from_hex(s))
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    /// Convert to an RGB tuple; `None` for [`Color::Auto`] or an index outside the palette
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Auto => None,
            Color::Indexed(i) => palette_rgb(*i),
            Color::Rgb { r, g, b } => Some((*r, *g, *b)),
        }
    }

    /// Convert to ARGB hex string (8 characters, as used by SpreadsheetML)
    ///
    /// Automatic color is reported as opaque black.
    pub fn to_argb_hex(&self) -> String {
        let (r, g, b) = self.to_rgb().unwrap_or((0, 0, 0));
        format!("FF{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// RGB of a palette index, `None` outside 0–63
pub fn palette_rgb(index: u8) -> Option<(u8, u8, u8)> {
    match index {
        0..=7 => Some(DEFAULT_PALETTE[index as usize]),
        PALETTE_FIRST..=PALETTE_LAST => Some(DEFAULT_PALETTE[(index - PALETTE_FIRST) as usize]),
        _ => None,
    }
}

/// Palette index of the color closest to `rgb` in `palette` (squared RGB distance)
pub fn nearest_palette_index(palette: &[(u8, u8, u8); 56], rgb: (u8, u8, u8)) -> u8 {
    let dist = |p: (u8, u8, u8)| {
        let dr = p.0 as i32 - rgb.0 as i32;
        let dg = p.1 as i32 - rgb.1 as i32;
        let db = p.2 as i32 - rgb.2 as i32;
        dr * dr + dg * dg + db * db
    };
    palette
        .iter()
        .enumerate()
        .min_by_key(|(_, &p)| dist(p))
        .map(|(i, _)| i as u8 + PALETTE_FIRST)
        .unwrap_or(PALETTE_FIRST)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Indexed(i) => match NAMED.iter().find(|(_, n)| n == i) {
                Some((name, _)) => write!(f, "{}", name),
                None => write!(f, "indexed({})", i),
            },
            Color::Rgb { r, g, b } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
        }
    }
}
