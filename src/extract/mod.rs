//! Text extraction behind a single `extract_lines` interface.
//!
//! Every supported format is handled by a [`TextExtractor`]. The
//! [`ExtractorRegistry`] detects the format of the input bytes and
//! dispatches to the extractor registered for it.
//!
//! # Example
//!
//! ```
//! use fieldex::extract::ExtractorRegistry;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let extracted = registry.extract(b"Date: 7/23/25\nTotal $500\n").unwrap();
//! assert_eq!(extracted.lines.len(), 2);
//! ```

#[cfg(feature = "docx")]
mod docx;
mod ocr;
#[cfg(feature = "pdf")]
mod pdf;
mod text;

#[cfg(feature = "docx")]
pub use docx::DocxExtractor;
pub use ocr::{parse_tesseract_tsv, ImageExtractor, OcrEngine, TesseractCli, TsvExtractor};
#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

use crate::detect::{detect_kind, DocumentKind};
use crate::error::{Error, Result};
use crate::model::Line;
use crate::parser::GroupingOptions;
use std::sync::Arc;

/// Cells of one table, row by row.
pub type TableCells = Vec<Vec<String>>;

/// Largest document accepted, in bytes.
pub const MAX_DOCUMENT_SIZE: usize = 50 * 1024 * 1024;

/// Trait for text extractors.
///
/// Implement this trait to add support for a new document format.
pub trait TextExtractor: Send + Sync {
    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// Check if this extractor handles the given document kind.
    fn supports(&self, kind: DocumentKind) -> bool;

    /// Extract the document's text as lines in reading order.
    fn extract_lines(&self, data: &[u8]) -> Result<Vec<Line>>;

    /// Extract the document's tables as cell text.
    ///
    /// Formats without table structure return no tables.
    fn extract_tables(&self, _data: &[u8]) -> Result<Vec<TableCells>> {
        Ok(Vec::new())
    }
}

/// Lines extracted from one document.
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Detected document kind
    pub kind: DocumentKind,
    /// Extracted lines, blank lines included
    pub lines: Vec<Line>,
    /// Tables found in the document
    pub tables: Vec<TableCells>,
}

/// Registry of text extractors.
///
/// Later registrations take priority over earlier ones for the same kind.
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn TextExtractor>>,
    grouping: GroupingOptions,
    ocr: Option<Arc<dyn OcrEngine>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            grouping: GroupingOptions::default(),
            ocr: None,
        }
    }

    /// Create a registry with the built-in extractors.
    ///
    /// Images are not covered until an OCR engine is registered with
    /// [`register_ocr`](Self::register_ocr).
    pub fn with_defaults() -> Self {
        Self::with_grouping(GroupingOptions::default())
    }

    /// Create a registry with the built-in extractors, grouping OCR tokens
    /// with the given options.
    pub fn with_grouping(grouping: GroupingOptions) -> Self {
        let mut registry = Self {
            extractors: Vec::new(),
            grouping,
            ocr: None,
        };
        registry.register(Arc::new(PlainTextExtractor::new()));
        registry.register(Arc::new(TsvExtractor::new(grouping)));
        #[cfg(feature = "pdf")]
        registry.register(Arc::new(PdfExtractor::new()));
        #[cfg(feature = "docx")]
        registry.register(Arc::new(DocxExtractor::new()));
        registry
    }

    /// Register an extractor.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        log::debug!("registering extractor {}", extractor.name());
        self.extractors.push(extractor);
    }

    /// Register an OCR engine for image documents.
    ///
    /// Engines that [read PDFs](OcrEngine::reads_pdf) also receive PDFs
    /// whose text layer is empty.
    pub fn register_ocr(&mut self, engine: Arc<dyn OcrEngine>) {
        let extractor = ImageExtractor::new(Arc::clone(&engine), self.grouping);
        self.register(Arc::new(extractor));
        self.ocr = Some(engine);
    }

    /// Get the extractor for a document kind.
    pub fn get(&self, kind: DocumentKind) -> Option<Arc<dyn TextExtractor>> {
        self.extractors
            .iter()
            .rev()
            .find(|e| e.supports(kind))
            .cloned()
    }

    /// Check if a document kind is supported.
    pub fn supports(&self, kind: DocumentKind) -> bool {
        self.get(kind).is_some()
    }

    /// Names of the registered extractors.
    pub fn names(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Detect the format of `data` and extract its lines.
    ///
    /// Fails with [`Error::NoText`] when the document yields no visible
    /// text at all.
    pub fn extract(&self, data: &[u8]) -> Result<Extracted> {
        if data.len() > MAX_DOCUMENT_SIZE {
            return Err(Error::TooLarge {
                size: data.len(),
                limit: MAX_DOCUMENT_SIZE,
            });
        }

        let kind = detect_kind(data)?;
        let extractor = match self.get(kind) {
            Some(extractor) => extractor,
            None if kind.needs_ocr() => return Err(Error::OcrUnavailable),
            None => return Err(Error::Unsupported(kind)),
        };

        log::debug!("extracting {} with {}", kind, extractor.name());
        let mut lines = match extractor.extract_lines(data) {
            Ok(lines) => lines,
            Err(Error::NoText) if kind == DocumentKind::Pdf => Vec::new(),
            Err(e) => return Err(e),
        };

        if kind == DocumentKind::Pdf && lines.iter().all(Line::is_blank) {
            if let Some(engine) = self.ocr.as_ref().filter(|e| e.reads_pdf()) {
                log::info!("PDF has no text layer; running OCR engine {}", engine.name());
                lines = ImageExtractor::new(Arc::clone(engine), self.grouping).extract_lines(data)?;
            }
        }

        let tables = match extractor.extract_tables(data) {
            Ok(tables) => tables,
            Err(e) => {
                log::warn!("skipping tables of {} document: {}", kind, e);
                Vec::new()
            }
        };

        if lines.iter().all(Line::is_blank) && tables.is_empty() {
            return Err(Error::NoText);
        }

        Ok(Extracted {
            kind,
            lines,
            tables,
        })
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::ImageFormat;
    use crate::model::OcrToken;

    struct FixedEngine;

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, _image: &[u8]) -> Result<Vec<OcrToken>> {
            Ok(vec![OcrToken::at("Total", 10.0, 50.0), OcrToken::at("$500", 120.0, 50.0)])
        }
    }

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";

    #[test]
    fn test_registry_with_defaults() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.supports(DocumentKind::Text));
        assert!(registry.supports(DocumentKind::OcrTsv));
        assert!(!registry.supports(DocumentKind::Image(ImageFormat::Png)));
    }

    #[test]
    fn test_image_without_engine() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(matches!(registry.extract(PNG), Err(Error::OcrUnavailable)));
    }

    #[test]
    fn test_image_with_engine() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.register_ocr(Arc::new(FixedEngine));

        let extracted = registry.extract(PNG).unwrap();
        assert_eq!(extracted.kind, DocumentKind::Image(ImageFormat::Png));
        assert_eq!(extracted.lines, vec![Line::new("Total $500")]);
    }

    #[test]
    fn test_blank_text_is_no_text() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(matches!(registry.extract(b"  \n\n \t\n"), Err(Error::NoText)));
    }

    #[test]
    fn test_empty_registry_unsupported() {
        let registry = ExtractorRegistry::new();
        assert!(matches!(
            registry.extract(b"Date: 1/1/25"),
            Err(Error::Unsupported(DocumentKind::Text))
        ));
    }

    /// Stands in for a PDF whose text layer is empty.
    struct ScannedPdf;

    impl TextExtractor for ScannedPdf {
        fn name(&self) -> &str {
            "scanned"
        }
        fn supports(&self, kind: DocumentKind) -> bool {
            kind == DocumentKind::Pdf
        }
        fn extract_lines(&self, _data: &[u8]) -> Result<Vec<Line>> {
            Err(Error::NoText)
        }
    }

    struct PdfEngine;

    impl OcrEngine for PdfEngine {
        fn name(&self) -> &str {
            "pdf-engine"
        }
        fn reads_pdf(&self) -> bool {
            true
        }
        fn recognize(&self, _image: &[u8]) -> Result<Vec<OcrToken>> {
            Ok(vec![OcrToken::at("Invoice:", 10.0, 20.0), OcrToken::at("1043", 90.0, 20.0)])
        }
    }

    const PDF: &[u8] = b"%PDF-1.7\n%scan";

    #[test]
    fn test_scanned_pdf_goes_to_ocr_engine() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(Arc::new(ScannedPdf));
        registry.register_ocr(Arc::new(PdfEngine));

        let extracted = registry.extract(PDF).unwrap();
        assert_eq!(extracted.kind, DocumentKind::Pdf);
        assert_eq!(extracted.lines, vec![Line::new("Invoice: 1043")]);
    }

    #[test]
    fn test_scanned_pdf_without_pdf_engine() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(Arc::new(ScannedPdf));
        registry.register_ocr(Arc::new(FixedEngine));
        assert!(matches!(registry.extract(PDF), Err(Error::NoText)));
    }

    #[test]
    fn test_tables_reach_extracted() {
        struct Form;
        impl TextExtractor for Form {
            fn name(&self) -> &str {
                "form"
            }
            fn supports(&self, kind: DocumentKind) -> bool {
                kind == DocumentKind::Text
            }
            fn extract_lines(&self, _data: &[u8]) -> Result<Vec<Line>> {
                Ok(Vec::new())
            }
            fn extract_tables(&self, _data: &[u8]) -> Result<Vec<TableCells>> {
                Ok(vec![vec![vec!["Name".into(), "Jane".into()]]])
            }
        }

        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(Arc::new(Form));
        let extracted = registry.extract(b"anything").unwrap();
        assert!(extracted.lines.is_empty());
        assert_eq!(extracted.tables.len(), 1);

        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.extract(b"Name: Jane").unwrap().tables.is_empty());
    }

    #[test]
    fn test_later_registration_wins() {
        struct Upper;
        impl TextExtractor for Upper {
            fn name(&self) -> &str {
                "upper"
            }
            fn supports(&self, kind: DocumentKind) -> bool {
                kind == DocumentKind::Text
            }
            fn extract_lines(&self, data: &[u8]) -> Result<Vec<Line>> {
                Ok(vec![Line::new(String::from_utf8_lossy(data).to_uppercase())])
            }
        }

        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(Arc::new(Upper));
        let extracted = registry.extract(b"name: jane").unwrap();
        assert_eq!(extracted.lines, vec![Line::new("NAME: JANE")]);
    }
}
