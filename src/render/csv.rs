//! CSV rendering of result tables.

use crate::error::{Error, Result};
use crate::model::ResultTable;
use std::io::Write;

use super::RenderOptions;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write a table as CSV: a header row of column names, then one row per record.
pub fn write_csv<W: Write>(mut writer: W, table: &ResultTable, options: &RenderOptions) -> Result<()> {
    if options.bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(table.column_count() + 1);
    if options.source_column {
        header.push(&options.source_column_name);
    }
    header.extend(table.columns.iter().map(String::as_str));
    if header.is_empty() {
        return Ok(());
    }
    csv.write_record(&header)?;

    for (source, row) in table.sources.iter().zip(&table.rows) {
        if options.source_column {
            csv.write_field(source)?;
        }
        csv.write_record(row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Render a table as a CSV string.
pub fn to_csv(table: &ResultTable, options: &RenderOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, table, options)?;
    String::from_utf8(buffer).map_err(|e| Error::Render(format!("CSV output is not UTF-8: {}", e)))
}
