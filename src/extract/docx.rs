//! DOCX body text and tables via `docx-lite`.

use super::{TableCells, TextExtractor};
use crate::detect::DocumentKind;
use crate::error::{Error, Result};
use crate::model::{lines_from_text, Line};
use std::io::Cursor;

/// Extractor for Office Open XML word processing documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DocxExtractor {
    fn name(&self) -> &str {
        "docx"
    }

    fn supports(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::Docx
    }

    fn extract_lines(&self, data: &[u8]) -> Result<Vec<Line>> {
        let text = docx_lite::extract_text_from_bytes(data)
            .map_err(|e| Error::extraction(DocumentKind::Docx, e.to_string()))?;
        Ok(lines_from_text(&text))
    }

    fn extract_tables(&self, data: &[u8]) -> Result<Vec<TableCells>> {
        let document = docx_lite::parse_document(Cursor::new(data))
            .map_err(|e| Error::extraction(DocumentKind::Docx, e.to_string()))?;

        let tables: Vec<TableCells> = document
            .tables
            .iter()
            .map(|table| {
                table
                    .rows
                    .iter()
                    .map(|row| row.cells.iter().map(cell_text).collect())
                    .collect()
            })
            .collect();
        log::debug!("DOCX has {} tables", tables.len());
        Ok(tables)
    }
}

fn cell_text(cell: &docx_lite::TableCell) -> String {
    cell.paragraphs
        .iter()
        .map(|p| p.to_text())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_archive() {
        let err = DocxExtractor::new()
            .extract_lines(b"PK\x03\x04 truncated")
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { kind: DocumentKind::Docx, .. }));

        let err = DocxExtractor::new()
            .extract_tables(b"PK\x03\x04 truncated")
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { kind: DocumentKind::Docx, .. }));
    }
}
