//! OCR input: pluggable engines, Tesseract TSV dumps, and image documents.
//!
//! OCR engines return word tokens with pixel boxes. Tokens are turned into
//! text lines by [`LineGrouper`] before parsing, so every OCR source goes
//! through the same spatial grouping.

use super::TextExtractor;
use crate::detect::{DocumentKind, TSV_HEADER};
use crate::error::{Error, Result};
use crate::model::{BoundingBox, Line, OcrToken};
use crate::parser::{GroupingOptions, LineGrouper};
use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

/// Trait for OCR engines.
///
/// Implement this to plug in an OCR backend. The engine receives the raw
/// image bytes and returns recognized words with their bounding boxes.
pub trait OcrEngine: Send + Sync {
    /// Get the name of this engine.
    fn name(&self) -> &str;

    /// Recognize the words of an image.
    fn recognize(&self, image: &[u8]) -> Result<Vec<OcrToken>>;

    /// Whether [`recognize`](Self::recognize) accepts PDF bytes.
    ///
    /// Engines that rasterize PDFs themselves return `true` to receive
    /// PDFs without a text layer.
    fn reads_pdf(&self) -> bool {
        false
    }
}

/// Tesseract word level in TSV output.
const WORD_LEVEL: &str = "5";

/// Columns before the (optional) text column.
const TSV_MIN_COLUMNS: usize = 11;

/// Parse Tesseract TSV output into word tokens, one vector per page.
///
/// Rows other than word rows and words without text are skipped. A
/// confidence of `-1` (no estimate) is kept as is.
pub fn parse_tesseract_tsv(tsv: &str) -> Result<Vec<Vec<OcrToken>>> {
    let tsv = tsv.strip_prefix('\u{feff}').unwrap_or(tsv);
    let mut pages: BTreeMap<u32, Vec<OcrToken>> = BTreeMap::new();

    for (index, row) in tsv.lines().enumerate() {
        let row = row.trim_end_matches('\r');
        if row.is_empty() || (index == 0 && row == TSV_HEADER) {
            continue;
        }

        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() < TSV_MIN_COLUMNS {
            return Err(tsv_error(index, "expected at least 11 columns"));
        }
        if columns[0] != WORD_LEVEL {
            continue;
        }

        let text = columns.get(11).map(|t| t.trim()).unwrap_or("");
        if text.is_empty() {
            continue;
        }

        let number = |column: usize| -> Result<f32> {
            columns[column]
                .trim()
                .parse::<f32>()
                .map_err(|_| tsv_error(index, &format!("bad number '{}'", columns[column])))
        };

        let page: u32 = columns[1]
            .trim()
            .parse()
            .map_err(|_| tsv_error(index, &format!("bad page number '{}'", columns[1])))?;
        let bbox = BoundingBox::new(number(6)?, number(7)?, number(8)?, number(9)?);
        let token = OcrToken::new(text, bbox, number(10)?);

        pages.entry(page).or_default().push(token);
    }

    Ok(pages.into_values().collect())
}

fn tsv_error(index: usize, message: &str) -> Error {
    Error::extraction(
        DocumentKind::OcrTsv,
        format!("line {}: {}", index + 1, message),
    )
}

/// Extractor for Tesseract TSV dumps produced ahead of time.
pub struct TsvExtractor {
    grouper: LineGrouper,
}

impl TsvExtractor {
    pub fn new(grouping: GroupingOptions) -> Self {
        Self {
            grouper: LineGrouper::new(grouping),
        }
    }
}

impl TextExtractor for TsvExtractor {
    fn name(&self) -> &str {
        "tesseract-tsv"
    }

    fn supports(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::OcrTsv
    }

    fn extract_lines(&self, data: &[u8]) -> Result<Vec<Line>> {
        let tsv = std::str::from_utf8(data)
            .map_err(|e| Error::extraction(DocumentKind::OcrTsv, e.to_string()))?;

        let pages = parse_tesseract_tsv(tsv)?;
        log::debug!("TSV dump has {} pages with words", pages.len());

        Ok(pages
            .iter()
            .flat_map(|tokens| self.grouper.group(tokens))
            .collect())
    }
}

/// Extractor for raster images, backed by an [`OcrEngine`].
pub struct ImageExtractor {
    engine: Arc<dyn OcrEngine>,
    grouper: LineGrouper,
}

impl ImageExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>, grouping: GroupingOptions) -> Self {
        Self {
            engine,
            grouper: LineGrouper::new(grouping),
        }
    }
}

impl TextExtractor for ImageExtractor {
    fn name(&self) -> &str {
        self.engine.name()
    }

    fn supports(&self, kind: DocumentKind) -> bool {
        kind.needs_ocr()
    }

    fn extract_lines(&self, data: &[u8]) -> Result<Vec<Line>> {
        let tokens = self.engine.recognize(data)?;
        log::debug!("{} recognized {} words", self.engine.name(), tokens.len());
        Ok(self.grouper.group(&tokens))
    }
}

/// OCR engine that runs the `tesseract` command line tool.
///
/// The image is piped through stdin and word boxes are read back from the
/// TSV renderer, so no temporary files are needed.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: String,
    language: String,
}

impl TesseractCli {
    /// Use `tesseract` from `PATH` with English.
    pub fn new() -> Self {
        Self {
            program: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }

    /// Set the path of the tesseract binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the recognition language (e.g. "eng", "deu+eng").
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Check if the binary can be run.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn run(&self, image: &[u8]) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(["stdin", "stdout", "-l", &self.language, "tsv"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::OcrUnavailable
                } else {
                    Error::Io(e)
                }
            })?;

        let stdin = child.stdin.take();
        let output = thread::scope(|scope| {
            scope.spawn(move || {
                if let Some(mut stdin) = stdin {
                    // A write error shows up as a failed exit status below
                    let _ = stdin.write_all(image);
                }
            });
            child.wait_with_output()
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!(
                "tesseract exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &[u8]) -> Result<Vec<OcrToken>> {
        let tsv = self.run(image)?;
        Ok(parse_tesseract_tsv(&tsv)?.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tsv(rows: &[&str]) -> String {
        let mut out = String::from(TSV_HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn test_parse_words_only() {
        let dump = tsv(&[
            "1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t",
            "4\t1\t1\t1\t1\t0\t10\t50\t300\t20\t-1\t",
            "5\t1\t1\t1\t1\t1\t10\t50\t60\t20\t96.5\tTotal",
            "5\t1\t1\t1\t1\t2\t120\t52\t50\t20\t91.0\t$500",
        ]);
        let pages = parse_tesseract_tsv(&dump).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[0][1].text, "$500");
        assert_eq!(pages[0][1].bbox.left, 120.0);
        assert_eq!(pages[0][0].confidence, 96.5);
    }

    #[test]
    fn test_parse_splits_pages() {
        let dump = tsv(&[
            "5\t1\t1\t1\t1\t1\t10\t50\t60\t20\t90\tName:",
            "5\t2\t1\t1\t1\t1\t10\t50\t60\t20\t90\tTotal",
        ]);
        let pages = parse_tesseract_tsv(&dump).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1][0].text, "Total");
    }

    #[test]
    fn test_parse_rejects_short_rows() {
        let dump = tsv(&["5\t1\t1"]);
        let err = parse_tesseract_tsv(&dump).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_tsv_extractor_groups_lines() {
        let dump = tsv(&[
            "5\t1\t1\t1\t1\t1\t10\t50\t80\t20\t90\tInvoice:",
            "5\t1\t1\t1\t1\t2\t100\t53\t40\t20\t90\t1043",
            "5\t1\t1\t1\t2\t1\t10\t100\t60\t20\t90\tTotal",
            "5\t1\t1\t1\t2\t2\t120\t100\t50\t20\t90\t$500",
        ]);
        let extractor = TsvExtractor::new(GroupingOptions::default());
        let lines = extractor.extract_lines(dump.as_bytes()).unwrap();
        assert_eq!(
            lines,
            vec![Line::new("Invoice: 1043"), Line::new("Total $500")]
        );
    }

    #[test]
    fn test_missing_tesseract_binary() {
        let engine = TesseractCli::new().with_program("/nonexistent/tesseract-binary");
        assert!(!engine.is_available());
        assert!(matches!(engine.recognize(b"\x89PNG"), Err(Error::OcrUnavailable)));
    }
}
