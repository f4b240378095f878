//! # fieldex
//!
//! Field/value extraction from semi-structured documents.
//!
//! Invoices, forms and reports often lay out data as labeled lines:
//! `Date: 7/23/25`, `Total   $500`, or a bold "Client Information" heading
//! followed by a block of text. This library reads such documents (PDF text
//! layers, DOCX, plain text, OCR output), recognizes the labels, and returns
//! ordered field/value pairs ready to be written as CSV, JSON or Markdown.
//!
//! ## Quick Start
//!
//! ```
//! use fieldex::extract_fields;
//!
//! let fields = extract_fields("Invoice: 1043\nDate: 7/23/25\nTotal $500");
//! assert_eq!(fields.get("Date"), Some("7/23/25"));
//! assert_eq!(fields.get("Total"), Some("$500"));
//! ```
//!
//! ## Batches
//!
//! ```no_run
//! use fieldex::{render, Fieldex, OutputFormat, RenderOptions};
//!
//! let report = Fieldex::new()
//!     .with_known_fields(["Date", "Client Information"])
//!     .split_contact("Client Information", "Client")
//!     .process_files(["a.pdf", "b.docx"]);
//!
//! let csv = render::render(&report.records(), OutputFormat::Csv, &RenderOptions::default())?;
//! std::fs::write("out.csv", csv)?;
//! # Ok::<(), fieldex::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Line parser**: colon, dash and spacing separators, multi-line values
//! - **Known fields**: a caller-supplied label set that keeps values with
//!   incidental colons intact
//! - **Tables**: DOCX table cells paired into fields
//! - **OCR layout**: group word boxes into lines before parsing
//! - **Composite fields**: split contact blocks into name, phone and email
//! - **Batch reports**: per-document outcomes, a failure never stops the batch

pub mod batch;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{BatchReport, DocumentOutcome, DocumentStatus};
pub use detect::{detect_kind, detect_kind_from_path, DocumentKind, ImageFormat};
pub use error::{Error, Result};
pub use extract::{
    ExtractorRegistry, Extracted, OcrEngine, TableCells, TesseractCli, TextExtractor,
    MAX_DOCUMENT_SIZE,
};
pub use model::{BoundingBox, FieldMap, FieldPair, Line, OcrToken, Record, ResultTable};
pub use parser::{
    ContactSplitter, FieldHandler, FieldParser, GroupingOptions, HandlerRegistry, LineGrouper,
    LineKind, MultilinePolicy, OrphanPolicy, ParserOptions, Separators, TableLayout,
};
pub use render::{JsonFormat, OutputFormat, RenderOptions};

use std::path::Path;
use std::sync::Arc;

/// Extract fields from plain text with default options.
///
/// # Example
///
/// ```
/// let fields = fieldex::extract_fields("Name: Jane Doe\nTotal - $500");
/// assert_eq!(fields.len(), 2);
/// ```
pub fn extract_fields(text: &str) -> FieldMap {
    FieldParser::default().parse_text(text)
}

/// Extract fields from a document file with default options.
///
/// # Example
///
/// ```no_run
/// let fields = fieldex::extract_file("invoice.pdf").unwrap();
/// for pair in &fields {
///     println!("{}: {}", pair.field, pair.value);
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<FieldMap> {
    Fieldex::new().extract_file(path)
}

/// Extract fields from document bytes with default options.
pub fn extract_bytes(data: &[u8]) -> Result<FieldMap> {
    Fieldex::new().extract_bytes(data)
}

/// Builder for the extraction pipeline: text extraction, line parsing, and
/// composite field handling.
///
/// # Example
///
/// ```
/// use fieldex::Fieldex;
///
/// let fieldex = Fieldex::new()
///     .with_known_fields(["Date", "Client Information"])
///     .split_contact("Client Information", "Client");
///
/// let fields = fieldex.parse_text(
///     "Date\n7/23/25\nClient Information\nBruce Davidson\n555-123-4567\nbruce@example.com",
/// );
/// assert_eq!(fields.get("Date"), Some("7/23/25"));
/// assert_eq!(fields.get("Client Telephone"), Some("555-123-4567"));
/// ```
pub struct Fieldex {
    parser: FieldParser,
    handlers: HandlerRegistry,
    grouping: GroupingOptions,
    tables: Option<TableLayout>,
    ocr: Option<Arc<dyn OcrEngine>>,
    extractors: Vec<Arc<dyn TextExtractor>>,
    registry: ExtractorRegistry,
}

impl Fieldex {
    /// Create a pipeline with default options and the built-in extractors.
    pub fn new() -> Self {
        Self {
            parser: FieldParser::default(),
            handlers: HandlerRegistry::new(),
            grouping: GroupingOptions::default(),
            tables: Some(TableLayout::Pairwise),
            ocr: None,
            extractors: Vec::new(),
            registry: ExtractorRegistry::with_defaults(),
        }
    }

    /// Replace the parser options.
    pub fn with_parser_options(mut self, options: ParserOptions) -> Self {
        self.parser = FieldParser::new(options);
        self
    }

    /// Use a known set of field names.
    ///
    /// Inside the value of a known field only another known name starts a
    /// new field.
    pub fn with_known_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = self.parser.options().clone().with_known_fields(fields);
        self.with_parser_options(options)
    }

    /// Keep lines that appear before the first header under `field`.
    pub fn attach_orphans(self, field: impl Into<String>) -> Self {
        let options = self.parser.options().clone().attach_orphans(field);
        self.with_parser_options(options)
    }

    /// Register a composite field handler.
    pub fn with_handler<H>(mut self, field: &str, handler: H) -> Self
    where
        H: FieldHandler + 'static,
    {
        self.handlers.register(field, Arc::new(handler));
        self
    }

    /// Replace the handler registry.
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Split a contact block field into name, telephone and email fields.
    pub fn split_contact(self, field: &str, prefix: &str) -> Self {
        self.with_handler(field, ContactSplitter::new(prefix))
    }

    /// Set how OCR tokens are grouped into lines.
    pub fn with_grouping(mut self, grouping: GroupingOptions) -> Self {
        self.grouping = grouping;
        self.rebuild_registry();
        self
    }

    /// Set how the cells of document tables are paired (default: pairwise).
    pub fn with_table_layout(mut self, layout: TableLayout) -> Self {
        self.tables = Some(layout);
        self
    }

    /// Ignore document tables.
    pub fn without_tables(mut self) -> Self {
        self.tables = None;
        self
    }

    /// Read images through an OCR engine.
    pub fn with_ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self.rebuild_registry();
        self
    }

    /// Add a text extractor, taking priority over the built-in ones.
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractors.push(extractor);
        self.rebuild_registry();
        self
    }

    fn rebuild_registry(&mut self) {
        let mut registry = ExtractorRegistry::with_grouping(self.grouping);
        if let Some(engine) = &self.ocr {
            registry.register_ocr(Arc::clone(engine));
        }
        for extractor in &self.extractors {
            registry.register(Arc::clone(extractor));
        }
        self.registry = registry;
    }

    /// The line parser in use.
    pub fn parser(&self) -> &FieldParser {
        &self.parser
    }

    /// The extractor registry in use.
    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Parse lines and apply the composite field handlers.
    pub fn parse_lines(&self, lines: &[Line]) -> FieldMap {
        self.handlers.apply(self.parser.parse_lines(lines))
    }

    /// Parse plain text and apply the composite field handlers.
    pub fn parse_text(&self, text: &str) -> FieldMap {
        self.handlers.apply(self.parser.parse_text(text))
    }

    /// Group OCR tokens into lines, then parse them.
    pub fn parse_tokens(&self, tokens: &[OcrToken]) -> FieldMap {
        let lines = LineGrouper::new(self.grouping).group(tokens);
        self.parse_lines(&lines)
    }

    /// Pair table cells into fields and apply the composite field handlers.
    pub fn parse_table<S: AsRef<str>>(&self, table: &[Vec<S>], layout: TableLayout) -> Result<FieldMap> {
        let fields = parser::table_fields(table, layout)?;
        Ok(self.handlers.apply(fields))
    }

    /// Extract the text lines of a document.
    pub fn extract_lines(&self, data: &[u8]) -> Result<Extracted> {
        self.registry.extract(data)
    }

    /// Parse extracted lines and tables and apply the composite field
    /// handlers. Table fields follow line fields and win on repeated names.
    pub fn parse_extracted(&self, extracted: &Extracted) -> FieldMap {
        let mut fields = self.parser.parse_lines(&extracted.lines);
        if let Some(layout) = self.tables {
            for (i, table) in extracted.tables.iter().enumerate() {
                match parser::table_fields(table, layout) {
                    Ok(pairs) => fields.extend(pairs.into_pairs()),
                    Err(e) => log::warn!("skipping table {}: {}", i + 1, e),
                }
            }
        }
        self.handlers.apply(fields)
    }

    /// Extract fields from document bytes.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<FieldMap> {
        let extracted = self.registry.extract(data)?;
        Ok(self.parse_extracted(&extracted))
    }

    /// Extract fields from a document file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<FieldMap> {
        let data = read_document(path.as_ref())?;
        self.extract_bytes(&data)
    }

    /// Process one document, turning any failure into an outcome.
    pub fn process_bytes(&self, source: &str, data: &[u8]) -> DocumentOutcome {
        match self.registry.extract(data) {
            Ok(extracted) => {
                let line_count = extracted.lines.iter().filter(|l| !l.is_blank()).count();
                let fields = self.parse_extracted(&extracted);
                log::debug!(
                    "{}: {} fields from {} lines and {} tables",
                    source,
                    fields.len(),
                    line_count,
                    extracted.tables.len()
                );
                DocumentOutcome::parsed(source, extracted.kind, line_count, fields)
            }
            Err(e) => DocumentOutcome::failed(source, &e),
        }
    }

    /// Process one document file.
    ///
    /// The outcome is named after the file name.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> DocumentOutcome {
        let path = path.as_ref();
        let source = source_name(path);
        match read_document(path) {
            Ok(data) => self.process_bytes(&source, &data),
            Err(e) => DocumentOutcome::failed(source, &e),
        }
    }

    /// Process document files in order.
    pub fn process_files<I, P>(&self, paths: I) -> BatchReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths.into_iter().map(|p| self.process_file(p)).collect()
    }
}

impl Default for Fieldex {
    fn default() -> Self {
        Self::new()
    }
}

/// Display name of a document file.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_document(path: &Path) -> Result<Vec<u8>> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_DOCUMENT_SIZE as u64 {
        return Err(Error::TooLarge {
            size: size as usize,
            limit: MAX_DOCUMENT_SIZE,
        });
    }
    Ok(std::fs::read(path)?)
}
