//! XML text escaping for SpreadsheetML

use std::borrow::Cow;

use quick_xml::escape::escape;

/// Characters XML 1.0 cannot carry, written as `_xHHHH_`
fn needs_ooxml_escape(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Whether `rest` (text after an underscore) would be read back as an escape
fn looks_like_escape(rest: &str) -> bool {
    let b = rest.as_bytes();
    b.len() >= 6 && b[0] == b'x' && b[1..5].iter().all(u8::is_ascii_hexdigit) && b[5] == b'_'
}

/// Escape cell text for a `<t>` element
///
/// Control characters become `_xHHHH_`; an underscore that would otherwise
/// start such a sequence is itself written as `_x005F_`.
pub(crate) fn escape_text(s: &str) -> Cow<'_, str> {
    let needs_pass = s
        .char_indices()
        .any(|(i, c)| needs_ooxml_escape(c) || (c == '_' && looks_like_escape(&s[i + 1..])));
    if !needs_pass {
        return escape(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for (i, c) in s.char_indices() {
        if needs_ooxml_escape(c) {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else if c == '_' && looks_like_escape(&s[i + 1..]) {
            out.push_str("_x005F_");
        } else {
            out.push(c);
        }
    }
    Cow::Owned(escape(&out).into_owned())
}

/// Escape an attribute value
pub(crate) fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// ` xml:space="preserve"` when leading or trailing whitespace must survive
pub(crate) fn space_attr(s: &str) -> &'static str {
    let edge_ws = |c: Option<char>| c.is_some_and(|c| c.is_whitespace());
    if edge_ws(s.chars().next()) || edge_ws(s.chars().next_back()) {
        " xml:space=\"preserve\""
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(escape_text("Some string"), "Some string");
        assert_eq!(
            escape_text("Unicode - فارسی - Қазақша"),
            "Unicode - فارسی - Қазақша"
        );
    }

    #[test]
    fn test_markup_escaped() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr("\"Q&A\""), "&quot;Q&amp;A&quot;");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(escape_text("a\u{1}b"), "a_x0001_b");
        assert_eq!(escape_text("tab\there\nnewline"), "tab\there\nnewline");
        assert_eq!(escape_text("\u{1F}<"), "_x001F_&lt;");
    }

    #[test]
    fn test_literal_escape_sequence_protected() {
        assert_eq!(escape_text("_x0041_"), "_x005F_x0041_");
        assert_eq!(escape_text("snake_case_x"), "snake_case_x");
    }

    #[test]
    fn test_space_attr() {
        assert_eq!(space_attr(" lead"), " xml:space=\"preserve\"");
        assert_eq!(space_attr("trail\n"), " xml:space=\"preserve\"");
        assert_eq!(space_attr("inner space"), "");
        assert_eq!(space_attr(""), "");
    }
}
