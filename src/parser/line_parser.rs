//! Single-pass field/value line parser.
//!
//! The parser walks the lines once. Every line is classified as either a
//! field header (possibly carrying an inline value) or a continuation of
//! the value currently being accumulated. A header flushes the previous
//! buffer into the result; the final buffer is flushed at end of input.

use super::normalize::{collapse_whitespace, normalize_field, normalize_value, SEPARATOR_CHARS};
use super::options::{MultilinePolicy, OrphanPolicy, ParserOptions};
use super::separator::SeparatorMatcher;
use crate::model::{FieldMap, Line};

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Starts a new field, with whatever value follows on the same line
    Header { field: String, value: String },
    /// Continues the value of the current field
    Continuation,
}

impl LineKind {
    pub fn is_header(&self) -> bool {
        matches!(self, LineKind::Header { .. })
    }
}

/// A known field name prepared for case-insensitive prefix matching.
#[derive(Debug, Clone)]
struct KnownField {
    name: String,
    words: Vec<String>,
}

/// Field/value parser.
///
/// # Example
///
/// ```
/// use fieldex::FieldParser;
///
/// let parser = FieldParser::default();
/// let fields = parser.parse(["Field: Value part 1", "part 2"]);
/// assert_eq!(fields.get("Field"), Some("Value part 1 part 2"));
/// ```
#[derive(Debug, Clone)]
pub struct FieldParser {
    options: ParserOptions,
    separators: SeparatorMatcher,
    known: Vec<KnownField>,
}

/// Value being accumulated for the most recent header.
struct Buffer {
    field: String,
    parts: Vec<String>,
}

impl FieldParser {
    /// Create a parser with the given options.
    pub fn new(options: ParserOptions) -> Self {
        let separators = SeparatorMatcher::new(options.separators, options.max_label_words);

        let mut known: Vec<KnownField> = options
            .known_fields
            .iter()
            .map(|name| collapse_whitespace(name))
            .filter(|name| !name.is_empty())
            .map(|name| KnownField {
                words: name.split(' ').map(str::to_string).collect(),
                name,
            })
            .collect();
        // Longest names first so "Client Information" beats "Client"
        known.sort_by(|a, b| {
            b.words
                .len()
                .cmp(&a.words.len())
                .then_with(|| b.name.len().cmp(&a.name.len()))
        });

        Self {
            options,
            separators,
            known,
        }
    }

    /// Get the parser options.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse lines into an ordered field map.
    ///
    /// Accepts anything convertible into [`Line`]: string slices, owned
    /// strings, or lines carrying emphasis hints.
    pub fn parse<I, L>(&self, lines: I) -> FieldMap
    where
        I: IntoIterator<Item = L>,
        L: Into<Line>,
    {
        let lines: Vec<Line> = lines.into_iter().map(Into::into).collect();
        self.parse_lines(&lines)
    }

    /// Parse a block of text, one line per text line.
    pub fn parse_text(&self, text: &str) -> FieldMap {
        self.parse(text.lines())
    }

    /// Parse a slice of lines into an ordered field map.
    pub fn parse_lines(&self, lines: &[Line]) -> FieldMap {
        let mut result = FieldMap::new();
        let mut buffer: Option<Buffer> = None;

        for (line, kind) in self.classify_lines(lines) {
            match kind {
                LineKind::Header { field, value } => {
                    log::debug!("header {:?} (inline value {:?})", field, value);
                    if let Some(done) = buffer.take() {
                        self.flush(done, &mut result);
                    }
                    let mut parts = Vec::new();
                    if !value.is_empty() {
                        parts.push(value);
                    }
                    buffer = Some(Buffer { field, parts });
                }
                LineKind::Continuation => match buffer.as_mut() {
                    Some(open) => {
                        if self.options.multiline == MultilinePolicy::Join
                            || open.parts.is_empty()
                        {
                            open.parts.push(line.text.trim().to_string());
                        }
                    }
                    None => match &self.options.orphans {
                        OrphanPolicy::Discard => {
                            log::debug!("dropping line before first header: {:?}", line.text);
                        }
                        OrphanPolicy::Attach(name) => {
                            buffer = Some(Buffer {
                                field: name.clone(),
                                parts: vec![line.text.trim().to_string()],
                            });
                        }
                    },
                },
            }
        }

        if let Some(done) = buffer.take() {
            self.flush(done, &mut result);
        }

        log::debug!("parsed {} fields from {} lines", result.len(), lines.len());
        result
    }

    /// Classify every non-blank line.
    ///
    /// Blank lines are dropped first, so "the next line" used by the
    /// visual-distinctness check is the next non-blank one. With known
    /// fields, a line only breaks an open known-field value if it starts
    /// with another known name.
    pub fn classify_lines<'a>(&self, lines: &'a [Line]) -> Vec<(&'a Line, LineKind)> {
        let lines: Vec<&Line> = lines.iter().filter(|l| !l.is_blank()).collect();
        let mut known_open = false;
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let (kind, known) = self.classify_in(line, lines.get(i + 1).copied(), known_open);
                if kind.is_header() {
                    known_open = known;
                }
                (*line, kind)
            })
            .collect()
    }

    /// Classify one line given the line that follows it, outside any
    /// known-field value.
    pub fn classify(&self, line: &Line, next: Option<&Line>) -> LineKind {
        self.classify_in(line, next, false).0
    }

    /// Classify a line; the flag reports whether a header matched a known
    /// field name.
    fn classify_in(&self, line: &Line, next: Option<&Line>, known_open: bool) -> (LineKind, bool) {
        let text = line.text.trim();
        if text.is_empty() {
            return (LineKind::Continuation, false);
        }

        if !self.known.is_empty() {
            if let Some((field, value)) = self.match_known(text) {
                let header = LineKind::Header {
                    field: field.to_string(),
                    value: normalize_value(strip_lead_separator(value)),
                };
                return (header, true);
            }
            if known_open {
                return (LineKind::Continuation, false);
            }
        }

        if let Some(split) = self.separators.split(text) {
            if self.is_label(split.field) {
                let header = LineKind::Header {
                    field: normalize_field(split.field),
                    value: normalize_value(split.value),
                };
                return (header, false);
            }
        }

        let label = text.trim_end_matches(|c: char| SEPARATOR_CHARS.contains(&c) || c.is_whitespace());
        if self.is_label(label) {
            let ends_with_separator = label.len() < text.len();
            let distinct = self.known.is_empty()
                && next.is_some_and(|n| self.visually_distinct(line, n));
            if ends_with_separator || distinct {
                let header = LineKind::Header {
                    field: normalize_field(label),
                    value: String::new(),
                };
                return (header, false);
            }
        }

        (LineKind::Continuation, false)
    }

    /// Match the start of a line against the known-field set.
    ///
    /// Returns the canonical field name and the rest of the line.
    fn match_known<'t>(&self, text: &'t str) -> Option<(&str, &'t str)> {
        'known: for known in &self.known {
            let mut rest = text;
            for (i, word) in known.words.iter().enumerate() {
                rest = rest.trim_start();
                let Some(after) = strip_prefix_ci(rest, word) else {
                    continue 'known;
                };
                let last = i + 1 == known.words.len();
                let boundary = match after.chars().next() {
                    None => true,
                    Some(c) if c.is_whitespace() => true,
                    Some(c) => last && is_lead_separator(c),
                };
                if !boundary {
                    continue 'known;
                }
                rest = after;
            }
            return Some((known.name.as_str(), rest));
        }
        None
    }

    /// Short, digit-free text that can serve as a field label.
    fn is_label(&self, text: &str) -> bool {
        let words = text.split_whitespace().count();
        words > 0
            && words <= self.options.max_label_words
            && text.chars().any(char::is_alphabetic)
            && !text.chars().any(|c| c.is_ascii_digit())
    }

    fn visually_distinct(&self, line: &Line, next: &Line) -> bool {
        if let (Some(a), Some(b)) = (line.emphasis, next.emphasis) {
            if a != b {
                return true;
            }
        }
        let len = line.text.trim().chars().count() as f32;
        let next_len = next.text.trim().chars().count() as f32;
        next_len >= len * self.options.distinct_length_ratio
    }

    fn flush(&self, buffer: Buffer, result: &mut FieldMap) {
        let value = normalize_value(&buffer.parts.join(" "));
        if value.is_empty() && self.options.skip_empty_values {
            log::debug!("skipping empty field {:?}", buffer.field);
            return;
        }
        if let Some(previous) = result.insert(buffer.field.clone(), value) {
            log::debug!("field {:?} repeated; replacing {:?}", buffer.field, previous);
        }
    }
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

fn is_lead_separator(c: char) -> bool {
    SEPARATOR_CHARS.contains(&c) || c.is_whitespace()
}

/// Remove one separator token from the start of an inline value.
///
/// A dash directly followed by a digit is a sign and stays.
fn strip_lead_separator(value: &str) -> &str {
    let value = value.trim_start();
    let mut chars = value.chars();
    match chars.next() {
        Some(':') => chars.as_str().trim_start(),
        Some(c) if SEPARATOR_CHARS.contains(&c) => {
            let rest = chars.as_str();
            match rest.chars().next() {
                None => rest,
                Some(next) if next.is_whitespace() => rest.trim_start(),
                _ => value,
            }
        }
        _ => value,
    }
}

/// Case-insensitive `str::strip_prefix`.
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(chars.as_str())
}
