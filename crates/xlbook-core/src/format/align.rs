//! Horizontal text alignment

use std::fmt;
use std::str::FromStr;

/// Horizontal placement of cell content
///
/// The discriminant order matches the legacy alignment codes (0–7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum HorizontalAlignment {
    /// Text left, numbers right
    #[default]
    General,
    /// Left aligned
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
    /// Repeat the content across the cell
    Fill,
    /// Justified
    Justify,
    /// Centered across the selection
    CenterAcross,
    /// Distributed
    Distributed,
}

const ALL: [HorizontalAlignment; 8] = [
    HorizontalAlignment::General,
    HorizontalAlignment::Left,
    HorizontalAlignment::Center,
    HorizontalAlignment::Right,
    HorizontalAlignment::Fill,
    HorizontalAlignment::Justify,
    HorizontalAlignment::CenterAcross,
    HorizontalAlignment::Distributed,
];

impl HorizontalAlignment {
    /// 3-bit code stored in a BIFF8 XF record
    pub fn biff_code(self) -> u8 {
        self as u8
    }

    /// `horizontal` attribute value used by SpreadsheetML
    pub fn xml_name(self) -> &'static str {
        match self {
            HorizontalAlignment::General => "general",
            HorizontalAlignment::Left => "left",
            HorizontalAlignment::Center => "center",
            HorizontalAlignment::Right => "right",
            HorizontalAlignment::Fill => "fill",
            HorizontalAlignment::Justify => "justify",
            HorizontalAlignment::CenterAcross => "centerContinuous",
            HorizontalAlignment::Distributed => "distributed",
        }
    }
}

impl fmt::Display for HorizontalAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xml_name())
    }
}

impl FromStr for HorizontalAlignment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("merge") {
            return Ok(HorizontalAlignment::CenterAcross);
        }
        ALL.iter()
            .copied()
            .find(|a| a.xml_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown alignment '{}'", s))
    }
}
