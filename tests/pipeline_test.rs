//! Integration tests for document extraction, batches, and rendering.

use std::fs;
use std::sync::Arc;

use fieldex::extract::TsvExtractor;
use fieldex::render::{render, to_markdown};
use fieldex::{
    DocumentKind, DocumentStatus, Error, ExtractorRegistry, Fieldex, Line, OcrEngine, OcrToken,
    OutputFormat, RenderOptions, Result, TextExtractor,
};

const TSV_HEADER: &str =
    "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

#[test]
fn test_batch_continues_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("invoice.txt");
    let broken = dir.path().join("scan.png");
    let prose = dir.path().join("letter.txt");
    let second = dir.path().join("receipt.txt");

    fs::write(&good, "Invoice: 1043\nDate: 7/23/25\nTotal $500\n").unwrap();
    fs::write(&broken, b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR").unwrap();
    fs::write(&prose, "thanks for your business\n").unwrap();
    fs::write(&second, "Date: 8/1/25\nPaid by: card\n").unwrap();

    let missing = dir.path().join("missing.pdf");
    let report = Fieldex::new().process_files([&good, &broken, &prose, &missing, &second]);

    assert_eq!(report.len(), 5);
    assert_eq!(report.extracted_count(), 2);
    assert_eq!(report.empty_count(), 1);
    assert_eq!(report.failed_count(), 2);
    assert!(!report.all_failed());

    assert!(matches!(
        report.outcomes[1].status,
        DocumentStatus::Failed(ref m) if m.contains("OCR")
    ));

    let table = report.to_table("");
    assert_eq!(table.sources, vec!["invoice.txt", "receipt.txt"]);
    assert_eq!(table.columns, vec!["Invoice", "Date", "Total", "Paid by"]);
    assert_eq!(table.rows[1], vec!["", "8/1/25", "", "card"]);
}

#[test]
fn test_batch_csv_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "Name: Jane Doe\nTotal $500\n").unwrap();
    fs::write(&b, "Name: John Roe\nNotes:\nleft at the door\n").unwrap();

    let report = Fieldex::new().process_files([&a, &b]);
    let options = RenderOptions::new().with_source_column(true);
    let csv = render(&report.records(), OutputFormat::Csv, &options).unwrap();

    let out = dir.path().join("out.csv");
    fs::write(&out, &csv).unwrap();
    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "source,Name,Total,Notes");
    assert_eq!(lines[1], "a.txt,Jane Doe,$500,");
    assert_eq!(lines[2], "b.txt,John Roe,,left at the door");
}

#[test]
fn test_markdown_mirrors_records() {
    let report = Fieldex::new().process_files(Vec::<&str>::new());
    assert!(report.is_empty());
    assert!(to_markdown(&report.records(), &RenderOptions::default()).contains("No data extracted"));

    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, "Status - Approved\n").unwrap();
    let report = Fieldex::new().process_files([&a]);
    let md = to_markdown(&report.records(), &RenderOptions::default());
    assert!(md.contains("## Record 1"));
    assert!(md.contains("| Status | Approved |"));
}

#[test]
fn test_tsv_dump_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.tsv");
    let rows = [
        "1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t",
        "5\t1\t1\t1\t1\t1\t120\t40\t50\t20\t93\t$500",
        "5\t1\t1\t1\t1\t2\t10\t42\t60\t20\t95\tTotal",
        "5\t1\t1\t1\t2\t1\t10\t90\t50\t20\t91\tDate:",
        "5\t1\t1\t1\t2\t2\t70\t90\t60\t20\t88\t7/23/25",
    ];
    fs::write(&path, format!("{}\n{}\n", TSV_HEADER, rows.join("\n"))).unwrap();

    let outcome = Fieldex::new().process_file(&path);
    assert_eq!(outcome.kind, Some(DocumentKind::OcrTsv));
    assert_eq!(outcome.fields.get("Total"), Some("$500"));
    assert_eq!(outcome.fields.get("Date"), Some("7/23/25"));
}

#[test]
fn test_registry_lookup() {
    let registry = ExtractorRegistry::with_defaults();
    let extractor = registry.get(DocumentKind::OcrTsv).unwrap();
    assert_eq!(extractor.name(), "tesseract-tsv");
    assert!(registry.names().contains(&"text"));

    let tsv = TsvExtractor::new(Default::default());
    assert!(tsv.supports(DocumentKind::OcrTsv));
    assert!(!tsv.supports(DocumentKind::Text));
}

#[test]
fn test_custom_extractor_takes_priority() {
    struct Shouting;

    impl TextExtractor for Shouting {
        fn name(&self) -> &str {
            "shouting"
        }

        fn supports(&self, kind: DocumentKind) -> bool {
            kind == DocumentKind::Text
        }

        fn extract_lines(&self, data: &[u8]) -> Result<Vec<Line>> {
            let text = String::from_utf8_lossy(data).to_uppercase();
            Ok(text.lines().map(Line::new).collect())
        }
    }

    let fields = Fieldex::new()
        .with_extractor(Arc::new(Shouting))
        .extract_bytes(b"name: jane")
        .unwrap();
    assert_eq!(fields.get("NAME"), Some("JANE"));
}

#[test]
fn test_ocr_engine_failure_is_per_document() {
    struct Broken;

    impl OcrEngine for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn recognize(&self, _image: &[u8]) -> Result<Vec<OcrToken>> {
            Err(Error::Ocr("engine crashed".to_string()))
        }
    }

    let fieldex = Fieldex::new().with_ocr_engine(Arc::new(Broken));
    let outcome = fieldex.process_bytes("scan.jpg", b"\xFF\xD8\xFF\xE0\x00\x10JFIF");
    assert_eq!(
        outcome.status,
        DocumentStatus::Failed("OCR failed: engine crashed".to_string())
    );
}

#[test]
fn test_oversized_document_rejected() {
    let data = vec![b'a'; fieldex::MAX_DOCUMENT_SIZE + 1];
    assert!(matches!(
        fieldex::extract_bytes(&data),
        Err(Error::TooLarge { .. })
    ));
}
