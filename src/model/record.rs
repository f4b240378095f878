//! Per-document records and their tabular assembly.

use super::FieldMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fields extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Display name of the source document (usually the file name)
    pub source: String,

    /// Extracted fields in document order
    pub fields: FieldMap,
}

impl Record {
    pub fn new(source: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            source: source.into(),
            fields,
        }
    }

    /// Check if the record carries no data.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Flat table built from records.
///
/// Columns are the union of all field names in first-seen order; each record
/// becomes one row with missing fields replaced by the filler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    /// Column names
    pub columns: Vec<String>,

    /// Source document of each row
    pub sources: Vec<String>,

    /// Cell values, one vector per row, aligned with `columns`
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Assemble a table from records, filling missing cells with `filler`.
    pub fn from_records<'a, I>(records: I, filler: &str) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let records: Vec<&Record> = records.into_iter().collect();

        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for record in &records {
            for field in record.fields.fields() {
                if seen.insert(field) {
                    columns.push(field.to_string());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.fields.get(column).unwrap_or(filler).to_string())
                    .collect()
            })
            .collect();

        Self {
            columns,
            sources: records.iter().map(|r| r.source.clone()).collect(),
            rows,
        }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (excluding the source column).
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldPair;

    fn record(source: &str, pairs: &[(&str, &str)]) -> Record {
        Record::new(
            source,
            pairs.iter().map(|(f, v)| FieldPair::new(*f, *v)).collect(),
        )
    }

    #[test]
    fn test_union_of_columns() {
        let records = vec![
            record("a.pdf", &[("Name", "Jane"), ("Date", "7/1/25")]),
            record("b.pdf", &[("Date", "8/1/25"), ("Total", "$500")]),
        ];
        let table = ResultTable::from_records(&records, "");

        assert_eq!(table.columns, vec!["Name", "Date", "Total"]);
        assert_eq!(table.rows[0], vec!["Jane", "7/1/25", ""]);
        assert_eq!(table.rows[1], vec!["", "8/1/25", "$500"]);
        assert_eq!(table.sources, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_custom_filler() {
        let records = vec![record("a", &[("A", "1")]), record("b", &[("B", "2")])];
        let table = ResultTable::from_records(&records, "N/A");
        assert_eq!(table.cell(0, "B"), Some("N/A"));
        assert_eq!(table.cell(1, "A"), Some("N/A"));
        assert_eq!(table.cell(1, "missing"), None);
    }

    #[test]
    fn test_empty_table() {
        let table = ResultTable::from_records(&[], "");
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }
}
