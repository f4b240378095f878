//! Splitting a line into candidate field and value.

use super::options::Separators;
use regex::Regex;

/// Which separator produced a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorKind {
    Colon,
    Dash,
    SpaceGap,
}

/// A line split into candidate field and value (both trimmed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub field: &'a str,
    pub value: &'a str,
    pub kind: SeparatorKind,
}

/// Finds the first enabled separator in a line.
#[derive(Debug, Clone)]
pub struct SeparatorMatcher {
    separators: Separators,
    dash: Regex,
    gap: Regex,
    max_label_words: usize,
}

impl SeparatorMatcher {
    /// Create a matcher for the enabled separators.
    pub fn new(separators: Separators, max_label_words: usize) -> Self {
        Self {
            separators,
            dash: Regex::new(r"\s+[-\x{2013}\x{2014}]+(?:\s+|$)").expect("dash pattern"),
            gap: Regex::new(r"\S(\s{2,}|\t\s*)\S").expect("gap pattern"),
            max_label_words,
        }
    }

    /// Split a trimmed line at its earliest separator.
    ///
    /// Returns `None` if no enabled separator occurs or the left side would
    /// be empty.
    pub fn split<'a>(&self, line: &'a str) -> Option<Split<'a>> {
        let mut best: Option<(usize, usize, SeparatorKind)> = None;
        let mut consider = |start: usize, end: usize, kind: SeparatorKind| {
            if best.map_or(true, |(s, _, _)| start < s) {
                best = Some((start, end, kind));
            }
        };

        if self.separators.colon {
            if let Some(pos) = find_colon(line) {
                consider(pos, pos + 1, SeparatorKind::Colon);
            }
        }
        if self.separators.dash {
            if let Some(m) = self.dash.find(line) {
                consider(m.start(), m.end(), SeparatorKind::Dash);
            }
        }
        if self.separators.space_gap {
            if let Some(gap) = self.gap.captures(line).and_then(|c| c.get(1)) {
                consider(gap.start(), gap.end(), SeparatorKind::SpaceGap);
            }
        }

        if let Some((start, end, kind)) = best {
            let field = line[..start].trim();
            if !field.is_empty() {
                return Some(Split {
                    field,
                    value: line[end..].trim(),
                    kind,
                });
            }
        }

        if self.separators.label_number {
            return self.split_label_before_number(line);
        }
        None
    }

    /// `Total $500` style: a few digit-free words, the first capitalized,
    /// followed by a token that starts with a digit or a currency/number sign.
    fn split_label_before_number<'a>(&self, line: &'a str) -> Option<Split<'a>> {
        if !line.chars().next().is_some_and(char::is_uppercase) {
            return None;
        }
        let mut words = 0;
        for (start, token) in token_offsets(line) {
            if starts_numeric(token) {
                if words == 0 {
                    return None;
                }
                return Some(Split {
                    field: line[..start].trim(),
                    value: line[start..].trim(),
                    kind: SeparatorKind::SpaceGap,
                });
            }
            if token.chars().any(|c| c.is_ascii_digit()) {
                return None;
            }
            words += 1;
            if words > self.max_label_words {
                return None;
            }
        }
        None
    }
}

/// Position of the first colon followed by whitespace or the end of line.
///
/// Colons inside times (`10:30`) and URLs (`https://`) are skipped.
fn find_colon(line: &str) -> Option<usize> {
    let mut chars = line.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        if c == ':' {
            match chars.peek() {
                None => return Some(pos),
                Some((_, next)) if next.is_whitespace() => return Some(pos),
                _ => {}
            }
        }
    }
    None
}

fn starts_numeric(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('$' | '\u{20AC}' | '\u{00A3}' | '\u{00A5}' | '\u{20B9}' | '#' | '+') => {
            chars.next().is_some_and(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Whitespace-separated tokens with their byte offsets.
fn token_offsets(line: &str) -> impl Iterator<Item = (usize, &str)> {
    line.split_whitespace()
        .map(move |token| (token.as_ptr() as usize - line.as_ptr() as usize, token))
}
