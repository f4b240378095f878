//! PDF text layers via `pdf-extract`.

use super::TextExtractor;
use crate::detect::DocumentKind;
use crate::error::{Error, Result};
use crate::model::Line;
use std::panic::{self, AssertUnwindSafe};

/// Extractor for PDFs with an embedded text layer.
///
/// Scanned PDFs without a text layer yield [`Error::NoText`]. The registry
/// then hands them to an OCR engine that reads PDFs, if one is registered.
#[derive(Debug, Clone, Copy)]
pub struct PdfExtractor {
    strip_page_numbers: bool,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            strip_page_numbers: true,
        }
    }

    /// Drop a bare page number ending each page (default: on).
    pub fn strip_page_numbers(mut self, strip: bool) -> Self {
        self.strip_page_numbers = strip;
        self
    }

    fn page_lines(&self, page: &str) -> Vec<Line> {
        let mut lines: Vec<&str> = page.lines().collect();

        if self.strip_page_numbers {
            if let Some(last) = lines.iter().rposition(|l| !l.trim().is_empty()) {
                let text = lines[last].trim();
                if text.chars().all(|c| c.is_ascii_digit()) {
                    lines.remove(last);
                }
            }
        }

        lines.into_iter().map(Line::new).collect()
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn supports(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::Pdf
    }

    fn extract_lines(&self, data: &[u8]) -> Result<Vec<Line>> {
        // pdf-extract panics on some malformed documents
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }))
        .map_err(|_| Error::extraction(DocumentKind::Pdf, "malformed document"))??;

        log::debug!("PDF text layer has {} pages", pages.len());

        let lines: Vec<Line> = pages.iter().flat_map(|p| self.page_lines(p)).collect();
        if lines.iter().all(Line::is_blank) {
            return Err(Error::NoText);
        }
        Ok(lines)
    }
}
