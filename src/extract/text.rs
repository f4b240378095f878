//! Plain UTF-8 text documents.

use super::TextExtractor;
use crate::detect::DocumentKind;
use crate::error::{Error, Result};
use crate::model::{lines_from_text, Line};

/// Extractor for plain text, one line per text line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "text"
    }

    fn supports(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::Text
    }

    fn extract_lines(&self, data: &[u8]) -> Result<Vec<Line>> {
        let body = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let text = std::str::from_utf8(body)
            .map_err(|e| Error::extraction(DocumentKind::Text, e.to_string()))?;
        Ok(lines_from_text(text))
    }
}
