//! Field and value normalization.

use unicode_normalization::UnicodeNormalization;

/// Opening and closing quote pairs stripped from around a value.
const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
    ('\u{201C}', '\u{201D}'),
    ('\u{2018}', '\u{2019}'),
    ('\u{00AB}', '\u{00BB}'),
];

/// Characters that separate a field label from its value.
pub(crate) const SEPARATOR_CHARS: &[char] = &[':', '-', '\u{2013}', '\u{2014}'];

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a value: NFC, collapsed whitespace, surrounding quotes removed.
pub fn normalize_value(value: &str) -> String {
    let value: String = value.nfc().collect();
    let mut value = collapse_whitespace(&value);

    while let Some(inner) = strip_quotes(&value) {
        value = inner.trim().to_string();
    }
    value
}

/// Normalize a field name like a value and drop trailing separators.
pub fn normalize_field(field: &str) -> String {
    let field = normalize_value(field);
    field
        .trim_end_matches(|c: char| SEPARATOR_CHARS.contains(&c) || c.is_whitespace())
        .to_string()
}

/// Inner text of a value wrapped in one matching quote pair.
///
/// `"Yes" or "No"` is not wrapped: its opening quote closes inside.
fn strip_quotes(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    let &(open, close) = QUOTE_PAIRS.iter().find(|(open, _)| *open == first)?;
    if last != close {
        return None;
    }
    let inner = chars.as_str();
    if inner.contains(open) || inner.contains(close) {
        return None;
    }
    Some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n c  "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_normalize_value_strips_quotes() {
        assert_eq!(normalize_value("\"Jane   Doe\""), "Jane Doe");
        assert_eq!(normalize_value("\u{201C}quoted\u{201D}"), "quoted");
        assert_eq!(normalize_value("' \"nested\" '"), "nested");
    }

    #[test]
    fn test_normalize_value_keeps_inner_quotes() {
        assert_eq!(normalize_value("5' 11\""), "5' 11\"");
        assert_eq!(normalize_value("O'Brien"), "O'Brien");
    }

    #[test]
    fn test_normalize_value_keeps_separately_quoted_words() {
        assert_eq!(normalize_value("\"Yes\" or \"No\""), "\"Yes\" or \"No\"");
        assert_eq!(normalize_value("'a' and 'b'"), "'a' and 'b'");
    }

    #[test]
    fn test_normalize_value_mismatched_quotes() {
        assert_eq!(normalize_value("\"abc'"), "\"abc'");
        assert_eq!(normalize_value("\u{201D}abc\u{201C}"), "\u{201D}abc\u{201C}");
    }

    #[test]
    fn test_normalize_value_single_quote_char() {
        assert_eq!(normalize_value("\""), "\"");
    }

    #[test]
    fn test_normalize_value_nfc() {
        // e + combining acute accent
        assert_eq!(normalize_value("Cafe\u{0301}"), "Caf\u{00E9}");
    }

    #[test]
    fn test_normalize_field_trailing_separator() {
        assert_eq!(normalize_field("Client  Information :"), "Client Information");
        assert_eq!(normalize_field("Notes -"), "Notes");
    }
}
