//! Error types for fieldex library.

use std::io;
use thiserror::Error;

use crate::detect::DocumentKind;

/// Result type alias for fieldex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting fields from documents.
///
/// Parsing itself never fails: a document without recognizable fields
/// produces an empty map. Errors come from reading, detecting, and
/// extracting text, or from writing the results.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input bytes match no supported document format.
    #[error("Unknown file format: expected PDF, DOCX, image, or text")]
    UnknownFormat,

    /// The input exceeds the in-memory size limit.
    #[error("Document too large ({size} bytes, limit is {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    /// No registered extractor handles the detected format.
    #[error("No extractor registered for {0}")]
    Unsupported(DocumentKind),

    /// The underlying text extractor failed.
    #[error("{kind} extraction failed: {message}")]
    Extraction { kind: DocumentKind, message: String },

    /// Extraction succeeded but produced no text at all.
    #[error("No text could be extracted from the document")]
    NoText,

    /// An image was supplied but no OCR engine is configured.
    #[error("OCR engine not configured; cannot read image documents")]
    OcrUnavailable,

    /// The OCR engine ran but failed.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// A requested table row does not exist.
    #[error("Table row {row} is out of range (table has {rows} rows)")]
    InvalidTableRow { row: usize, rows: usize },

    /// A parser profile could not be loaded.
    #[error("Invalid profile: {0}")]
    Profile(String),

    /// Error during rendering (CSV, JSON, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Build an extraction error for a document kind.
    pub fn extraction(kind: DocumentKind, message: impl Into<String>) -> Self {
        Error::Extraction {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(feature = "pdf")]
impl From<pdf_extract::OutputError> for Error {
    fn from(err: pdf_extract::OutputError) -> Self {
        Error::extraction(DocumentKind::Pdf, err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Profile(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoText;
        assert_eq!(
            err.to_string(),
            "No text could be extracted from the document"
        );

        let err = Error::InvalidTableRow { row: 4, rows: 2 };
        assert_eq!(
            err.to_string(),
            "Table row 4 is out of range (table has 2 rows)"
        );
    }

    #[test]
    fn test_extraction_error_names_kind() {
        let err = Error::extraction(DocumentKind::Docx, "bad zip");
        assert_eq!(err.to_string(), "DOCX extraction failed: bad zip");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
