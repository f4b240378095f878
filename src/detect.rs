//! Document format detection from magic bytes.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Kind of input document, as far as extraction is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// PDF with (possibly) a text layer
    Pdf,
    /// Office Open XML word processing document
    Docx,
    /// Raster image that needs OCR
    Image(ImageFormat),
    /// Tesseract TSV token dump (`tesseract img out tsv`)
    OcrTsv,
    /// Plain UTF-8 text
    Text,
}

/// Raster image formats recognized by their signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "PDF"),
            DocumentKind::Docx => write!(f, "DOCX"),
            DocumentKind::Image(format) => write!(f, "{} image", format),
            DocumentKind::OcrTsv => write!(f, "OCR TSV"),
            DocumentKind::Text => write!(f, "text"),
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Bmp => "BMP",
        };
        f.write_str(name)
    }
}

impl serde::Serialize for DocumentKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl DocumentKind {
    /// Whether the kind needs an OCR engine to produce text.
    pub fn needs_ocr(&self) -> bool {
        matches!(self, DocumentKind::Image(_))
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF";
const TIFF_LE_MAGIC: &[u8] = b"II*\x00";
const TIFF_BE_MAGIC: &[u8] = b"MM\x00*";
const BMP_MAGIC: &[u8] = b"BM";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column header written by Tesseract's TSV renderer.
pub(crate) const TSV_HEADER: &str =
    "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

/// Number of leading bytes inspected when sniffing a file on disk.
const SNIFF_LEN: usize = 4096;

/// Detect the document kind from its leading bytes.
///
/// # Returns
/// * `Ok(DocumentKind)` for any supported format
/// * `Err(Error::UnknownFormat)` for empty or unrecognized binary data
///
/// # Example
/// ```
/// use fieldex::detect::{detect_kind, DocumentKind};
///
/// let kind = detect_kind(b"%PDF-1.7\n%test").unwrap();
/// assert_eq!(kind, DocumentKind::Pdf);
/// ```
pub fn detect_kind(data: &[u8]) -> Result<DocumentKind> {
    if data.is_empty() {
        return Err(Error::UnknownFormat);
    }

    if data.starts_with(PDF_MAGIC) {
        return Ok(DocumentKind::Pdf);
    }
    if data.starts_with(ZIP_MAGIC) {
        return Ok(DocumentKind::Docx);
    }
    if data.starts_with(PNG_MAGIC) {
        return Ok(DocumentKind::Image(ImageFormat::Png));
    }
    if data.starts_with(JPEG_MAGIC) {
        return Ok(DocumentKind::Image(ImageFormat::Jpeg));
    }
    if data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC) {
        return Ok(DocumentKind::Image(ImageFormat::Tiff));
    }

    let body = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    match utf8_prefix(body) {
        Some(text) => {
            let first_line = text.lines().next().unwrap_or("").trim_end_matches('\r');
            if first_line == TSV_HEADER {
                Ok(DocumentKind::OcrTsv)
            } else {
                Ok(DocumentKind::Text)
            }
        }
        // Checked after text so that "BM..." words are not taken for bitmaps
        None if data.starts_with(BMP_MAGIC) => Ok(DocumentKind::Image(ImageFormat::Bmp)),
        None => Err(Error::UnknownFormat),
    }
}

/// Detect the document kind of a file by reading its first bytes.
pub fn detect_kind_from_path<P: AsRef<Path>>(path: P) -> Result<DocumentKind> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    detect_kind(&header)
}

/// Interpret the bytes as UTF-8, tolerating a character cut at the end of
/// a sniffed prefix.
fn utf8_prefix(data: &[u8]) -> Option<&str> {
    match std::str::from_utf8(data) {
        Ok(text) => Some(text),
        Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 => {
            std::str::from_utf8(&data[..e.valid_up_to()]).ok()
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf() {
        assert_eq!(detect_kind(b"%PDF-1.7\n%test").unwrap(), DocumentKind::Pdf);
    }

    #[test]
    fn test_detect_docx_zip() {
        assert_eq!(
            detect_kind(b"PK\x03\x04\x14\x00\x06\x00").unwrap(),
            DocumentKind::Docx
        );
    }

    #[test]
    fn test_detect_images() {
        assert_eq!(
            detect_kind(b"\x89PNG\r\n\x1a\n\x00\x00").unwrap(),
            DocumentKind::Image(ImageFormat::Png)
        );
        assert_eq!(
            detect_kind(b"\xFF\xD8\xFF\xE0\x00\x10JFIF").unwrap(),
            DocumentKind::Image(ImageFormat::Jpeg)
        );
        assert!(detect_kind(b"\xFF\xD8\xFF\xE0").unwrap().needs_ocr());
    }

    #[test]
    fn test_detect_text_and_tsv() {
        assert_eq!(detect_kind(b"Date: 7/23/25\n").unwrap(), DocumentKind::Text);

        let tsv = format!("{}\n1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t\n", TSV_HEADER);
        assert_eq!(detect_kind(tsv.as_bytes()).unwrap(), DocumentKind::OcrTsv);
    }

    #[test]
    fn test_detect_text_starting_with_bm() {
        assert_eq!(detect_kind(b"BMI: 22.4").unwrap(), DocumentKind::Text);
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(detect_kind(b""), Err(Error::UnknownFormat)));
        assert!(matches!(
            detect_kind(&[0x00, 0xFF, 0xFE, 0x80, 0x81]),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DocumentKind::Pdf.to_string(), "PDF");
        assert_eq!(
            DocumentKind::Image(ImageFormat::Png).to_string(),
            "PNG image"
        );
    }
}
