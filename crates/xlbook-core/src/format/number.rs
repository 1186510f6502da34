//! Built-in number formats

use std::fmt;
use std::str::FromStr;

/// A built-in number format, identified by its shared ID
///
/// Both container formats know these IDs without a format string, so a
/// book never has to declare them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
pub struct NumFormat(u16);

/// (id, name, format code)
const BUILTIN: [(u16, &str, &str); 36] = [
    (0, "general", "General"),
    (1, "number", "0"),
    (2, "number-d2", "0.00"),
    (3, "number-sep", "#,##0"),
    (4, "number-sep-d2", "#,##0.00"),
    (5, "currency-negbra", "$#,##0_);($#,##0)"),
    (6, "currency-negbrared", "$#,##0_);[Red]($#,##0)"),
    (7, "currency-d2-negbra", "$#,##0.00_);($#,##0.00)"),
    (8, "currency-d2-negbrared", "$#,##0.00_);[Red]($#,##0.00)"),
    (9, "percent", "0%"),
    (10, "percent-d2", "0.00%"),
    (11, "scientific-d2", "0.00E+00"),
    (12, "fraction-onedig", "# ?/?"),
    (13, "fraction-twodig", "# ??/??"),
    (14, "date", "m/d/yyyy"),
    (15, "d-mon-yy", "d-mmm-yy"),
    (16, "d-mon", "d-mmm"),
    (17, "mon-yy", "mmm-yy"),
    (18, "hmm-am", "h:mm AM/PM"),
    (19, "hmmss-am", "h:mm:ss AM/PM"),
    (20, "hmm", "h:mm"),
    (21, "hmmss", "h:mm:ss"),
    (22, "mdyyyy-hmm", "m/d/yyyy h:mm"),
    (37, "number-sep-negbra", "#,##0_);(#,##0)"),
    (38, "number-sep-negbrared", "#,##0_);[Red](#,##0)"),
    (39, "number-d2-sep-negbra", "#,##0.00_);(#,##0.00)"),
    (40, "number-d2-sep-negbrared", "#,##0.00_);[Red](#,##0.00)"),
    (41, "account", r#"_(* #,##0_);_(* (#,##0);_(* "-"_);_(@_)"#),
    (42, "account-cur", r#"_($* #,##0_);_($* (#,##0);_($* "-"_);_(@_)"#),
    (43, "account-d2", r#"_(* #,##0.00_);_(* (#,##0.00);_(* "-"??_);_(@_)"#),
    (44, "account-d2-cur", r#"_($* #,##0.00_);_($* (#,##0.00);_($* "-"??_);_(@_)"#),
    (45, "mmss", "mm:ss"),
    (46, "h0mmss", "[h]:mm:ss"),
    (47, "mmss0", "mm:ss.0"),
    (48, "000p0e-plus0", "##0.0E+0"),
    (49, "text", "@"),
];

impl NumFormat {
    pub const GENERAL: NumFormat = NumFormat(0);
    pub const NUMBER: NumFormat = NumFormat(1);
    pub const NUMBER_D2: NumFormat = NumFormat(2);
    pub const NUMBER_SEP: NumFormat = NumFormat(3);
    pub const NUMBER_SEP_D2: NumFormat = NumFormat(4);
    pub const CURRENCY_NEGBRA: NumFormat = NumFormat(5);
    pub const CURRENCY_NEGBRARED: NumFormat = NumFormat(6);
    pub const CURRENCY_D2_NEGBRA: NumFormat = NumFormat(7);
    pub const CURRENCY_D2_NEGBRARED: NumFormat = NumFormat(8);
    pub const PERCENT: NumFormat = NumFormat(9);
    pub const PERCENT_D2: NumFormat = NumFormat(10);
    pub const SCIENTIFIC_D2: NumFormat = NumFormat(11);
    pub const FRACTION_ONEDIG: NumFormat = NumFormat(12);
    pub const FRACTION_TWODIG: NumFormat = NumFormat(13);
    pub const DATE: NumFormat = NumFormat(14);
    pub const CUSTOM_D_MON_YY: NumFormat = NumFormat(15);
    pub const CUSTOM_D_MON: NumFormat = NumFormat(16);
    pub const CUSTOM_MON_YY: NumFormat = NumFormat(17);
    pub const CUSTOM_HMM_AM: NumFormat = NumFormat(18);
    pub const CUSTOM_HMMSS_AM: NumFormat = NumFormat(19);
    pub const CUSTOM_HMM: NumFormat = NumFormat(20);
    pub const CUSTOM_HMMSS: NumFormat = NumFormat(21);
    pub const CUSTOM_MDYYYY_HMM: NumFormat = NumFormat(22);
    pub const NUMBER_SEP_NEGBRA: NumFormat = NumFormat(37);
    pub const NUMBER_SEP_NEGBRARED: NumFormat = NumFormat(38);
    pub const NUMBER_D2_SEP_NEGBRA: NumFormat = NumFormat(39);
    pub const NUMBER_D2_SEP_NEGBRARED: NumFormat = NumFormat(40);
    pub const ACCOUNT: NumFormat = NumFormat(41);
    pub const ACCOUNT_CUR: NumFormat = NumFormat(42);
    pub const ACCOUNT_D2: NumFormat = NumFormat(43);
    pub const ACCOUNT_D2_CUR: NumFormat = NumFormat(44);
    pub const CUSTOM_MMSS: NumFormat = NumFormat(45);
    pub const CUSTOM_H0MMSS: NumFormat = NumFormat(46);
    pub const CUSTOM_MMSS0: NumFormat = NumFormat(47);
    pub const CUSTOM_000P0E_PLUS0: NumFormat = NumFormat(48);
    pub const TEXT: NumFormat = NumFormat(49);

    /// The built-in format with this ID, if there is one
    pub fn from_id(id: u16) -> Option<Self> {
        BUILTIN
            .iter()
            .any(|&(builtin, _, _)| builtin == id)
            .then_some(NumFormat(id))
    }

    /// Shared ID (`ifmt` / `numFmtId`)
    pub const fn id(self) -> u16 {
        self.0
    }

    /// Format code as Excel displays it in the en-US locale
    pub fn code(self) -> &'static str {
        self.entry().map_or("General", |(_, _, code)| code)
    }

    /// Short name accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        self.entry().map_or("general", |(_, name, _)| name)
    }

    /// Whether numbers in this format display as dates or times
    pub fn is_date_time(self) -> bool {
        matches!(self.0, 14..=22 | 45..=47)
    }

    fn entry(self) -> Option<(u16, &'static str, &'static str)> {
        BUILTIN.iter().copied().find(|&(id, _, _)| id == self.0)
    }
}

impl TryFrom<u16> for NumFormat {
    type Error = String;

    fn try_from(id: u16) -> std::result::Result<Self, Self::Error> {
        Self::from_id(id).ok_or_else(|| format!("no built-in number format {}", id))
    }
}

impl From<NumFormat> for u16 {
    fn from(format: NumFormat) -> u16 {
        format.id()
    }
}

impl fmt::Display for NumFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for NumFormat {
    type Err = String;

    /// Accepts a short name (`number-d2`, `date`) or a numeric ID
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u16>() {
            return Self::try_from(id);
        }
        BUILTIN
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(id, _, _)| NumFormat(id))
            .ok_or_else(|| format!("unknown number format '{}'", s))
    }
}
