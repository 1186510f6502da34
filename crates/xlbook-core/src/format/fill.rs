//! Fill pattern types

use std::fmt;
use std::str::FromStr;

/// Pattern used to paint a cell background
///
/// The discriminant order matches the legacy pattern codes (0–18).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FillPattern {
    /// No pattern
    #[default]
    None,
    /// Solid (100% foreground)
    Solid,
    /// 50% gray
    MediumGray,
    /// 75% gray
    DarkGray,
    /// 25% gray
    LightGray,
    /// Horizontal stripe
    DarkHorizontal,
    /// Vertical stripe
    DarkVertical,
    /// Diagonal stripe (down)
    DarkDown,
    /// Diagonal stripe (up)
    DarkUp,
    /// Grid
    DarkGrid,
    /// Trellis
    DarkTrellis,
    /// Thin horizontal stripe
    LightHorizontal,
    /// Thin vertical stripe
    LightVertical,
    /// Thin diagonal stripe (down)
    LightDown,
    /// Thin diagonal stripe (up)
    LightUp,
    /// Thin grid
    LightGrid,
    /// Thin trellis
    LightTrellis,
    /// 12.5% gray
    Gray125,
    /// 6.25% gray
    Gray0625,
}

const ALL: [FillPattern; 19] = [
    FillPattern::None,
    FillPattern::Solid,
    FillPattern::MediumGray,
    FillPattern::DarkGray,
    FillPattern::LightGray,
    FillPattern::DarkHorizontal,
    FillPattern::DarkVertical,
    FillPattern::DarkDown,
    FillPattern::DarkUp,
    FillPattern::DarkGrid,
    FillPattern::DarkTrellis,
    FillPattern::LightHorizontal,
    FillPattern::LightVertical,
    FillPattern::LightDown,
    FillPattern::LightUp,
    FillPattern::LightGrid,
    FillPattern::LightTrellis,
    FillPattern::Gray125,
    FillPattern::Gray0625,
];

impl FillPattern {
    /// 6-bit pattern code stored in a BIFF8 XF record
    pub fn biff_code(self) -> u8 {
        self as u8
    }

    /// Pattern from a BIFF8 code
    pub fn from_biff_code(code: u8) -> Option<Self> {
        ALL.get(code as usize).copied()
    }

    /// `patternType` attribute value used by SpreadsheetML
    pub fn xml_name(self) -> &'static str {
        match self {
            FillPattern::None => "none",
            FillPattern::Solid => "solid",
            FillPattern::MediumGray => "mediumGray",
            FillPattern::DarkGray => "darkGray",
            FillPattern::LightGray => "lightGray",
            FillPattern::DarkHorizontal => "darkHorizontal",
            FillPattern::DarkVertical => "darkVertical",
            FillPattern::DarkDown => "darkDown",
            FillPattern::DarkUp => "darkUp",
            FillPattern::DarkGrid => "darkGrid",
            FillPattern::DarkTrellis => "darkTrellis",
            FillPattern::LightHorizontal => "lightHorizontal",
            FillPattern::LightVertical => "lightVertical",
            FillPattern::LightDown => "lightDown",
            FillPattern::LightUp => "lightUp",
            FillPattern::LightGrid => "lightGrid",
            FillPattern::LightTrellis => "lightTrellis",
            FillPattern::Gray125 => "gray125",
            FillPattern::Gray0625 => "gray0625",
        }
    }

    /// Check if this paints nothing
    pub fn is_none(self) -> bool {
        self == FillPattern::None
    }
}

impl fmt::Display for FillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xml_name())
    }
}

impl FromStr for FillPattern {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ALL.iter()
            .copied()
            .find(|p| p.xml_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown fill pattern '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biff_codes() {
        assert_eq!(FillPattern::None.biff_code(), 0);
        assert_eq!(FillPattern::Solid.biff_code(), 1);
        assert_eq!(FillPattern::Gray125.biff_code(), 17);
        assert_eq!(FillPattern::Gray0625.biff_code(), 18);
        assert_eq!(FillPattern::from_biff_code(9), Some(FillPattern::DarkGrid));
        assert_eq!(FillPattern::from_biff_code(19), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(FillPattern::Solid.to_string(), "solid");
        assert_eq!("lightGrid".parse::<FillPattern>(), Ok(FillPattern::LightGrid));
        assert_eq!("SOLID".parse::<FillPattern>(), Ok(FillPattern::Solid));
        assert!("stripes".parse::<FillPattern>().is_err());
    }
}
