//! Batch processing outcomes.
//!
//! A failure in one document never stops the batch: it is recorded as a
//! [`DocumentStatus::Failed`] outcome and the next document is processed.

use crate::detect::DocumentKind;
use crate::model::{FieldMap, Record, ResultTable};
use serde::Serialize;

/// How processing one document ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum DocumentStatus {
    /// At least one field was extracted
    Extracted,
    /// Text was read but no field could be recognized
    Empty,
    /// The document could not be read
    Failed(String),
}

/// Result of processing one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    /// Display name of the document
    pub source: String,

    /// Detected kind, if detection got that far
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,

    /// Number of non-blank extracted lines
    pub line_count: usize,

    /// Outcome status
    pub status: DocumentStatus,

    /// Extracted fields (empty unless the status is `Extracted`)
    pub fields: FieldMap,
}

impl DocumentOutcome {
    /// Outcome for a document whose fields were parsed.
    pub fn parsed(
        source: impl Into<String>,
        kind: DocumentKind,
        line_count: usize,
        fields: FieldMap,
    ) -> Self {
        let status = if fields.is_empty() {
            DocumentStatus::Empty
        } else {
            DocumentStatus::Extracted
        };
        Self {
            source: source.into(),
            kind: Some(kind),
            line_count,
            status,
            fields,
        }
    }

    /// Outcome for a document that could not be read.
    pub fn failed(source: impl Into<String>, error: &crate::Error) -> Self {
        let source = source.into();
        log::warn!("{}: {}", source, error);
        Self {
            source,
            kind: None,
            line_count: 0,
            status: DocumentStatus::Failed(error.to_string()),
            fields: FieldMap::new(),
        }
    }

    /// Check if fields were extracted.
    pub fn is_success(&self) -> bool {
        self.status == DocumentStatus::Extracted
    }

    /// Check if processing failed.
    pub fn is_failure(&self) -> bool {
        matches!(self.status, DocumentStatus::Failed(_))
    }

    /// The extracted record, if any fields were found.
    pub fn record(&self) -> Option<Record> {
        self.is_success()
            .then(|| Record::new(self.source.clone(), self.fields.clone()))
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome.
    pub fn push(&mut self, outcome: DocumentOutcome) {
        if outcome.status == DocumentStatus::Empty {
            log::warn!("{}: no data extracted", outcome.source);
        }
        self.outcomes.push(outcome);
    }

    /// Number of documents processed.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of documents with extracted fields.
    pub fn extracted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of readable documents without fields.
    pub fn empty_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == DocumentStatus::Empty)
            .count()
    }

    /// Number of documents that failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Check if every document failed (false for an empty batch).
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(DocumentOutcome::is_failure)
    }

    /// Check if no document produced any field.
    pub fn has_no_data(&self) -> bool {
        self.extracted_count() == 0
    }

    /// Records of the successful documents.
    pub fn records(&self) -> Vec<Record> {
        self.outcomes.iter().filter_map(DocumentOutcome::record).collect()
    }

    /// Assemble the successful records into a table.
    pub fn to_table(&self, filler: &str) -> ResultTable {
        ResultTable::from_records(&self.records(), filler)
    }
}

impl FromIterator<DocumentOutcome> for BatchReport {
    fn from_iter<I: IntoIterator<Item = DocumentOutcome>>(iter: I) -> Self {
        let mut report = BatchReport::new();
        for outcome in iter {
            report.push(outcome);
        }
        report
    }
}
