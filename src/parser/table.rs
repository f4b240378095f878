//! Field/value pairs from table cells.

use super::normalize::{normalize_field, normalize_value};
use crate::error::{Error, Result};
use crate::model::{FieldMap, FieldPair};
use serde::{Deserialize, Serialize};

/// How field names and values are laid out in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLayout {
    /// Every row alternates field and value cells: `Name | Jane | Date | 7/1/25`
    #[default]
    Pairwise,
    /// One row holds field names, another holds the values below them
    HeaderRow { field_row: usize, value_row: usize },
}

/// Pair adjacent cells of a row as `(field, value)`.
///
/// A trailing unpaired cell is dropped, as are pairs where either side is
/// empty.
pub fn pair_cells<S: AsRef<str>>(cells: &[S]) -> Vec<FieldPair> {
    cells
        .chunks_exact(2)
        .filter_map(|pair| make_pair(pair[0].as_ref(), pair[1].as_ref()))
        .collect()
}

/// Zip a row of field names with a row of values.
pub fn pair_rows<S: AsRef<str>>(
    table: &[Vec<S>],
    field_row: usize,
    value_row: usize,
) -> Result<Vec<FieldPair>> {
    let rows = table.len();
    let fields = table
        .get(field_row)
        .ok_or(Error::InvalidTableRow { row: field_row, rows })?;
    let values = table
        .get(value_row)
        .ok_or(Error::InvalidTableRow { row: value_row, rows })?;

    Ok(fields
        .iter()
        .zip(values)
        .filter_map(|(f, v)| make_pair(f.as_ref(), v.as_ref()))
        .collect())
}

/// Extract fields from a whole table using the given layout.
pub fn table_fields<S: AsRef<str>>(table: &[Vec<S>], layout: TableLayout) -> Result<FieldMap> {
    let fields: FieldMap = match layout {
        TableLayout::Pairwise => table.iter().flat_map(|row| pair_cells(row)).collect(),
        TableLayout::HeaderRow {
            field_row,
            value_row,
        } => pair_rows(table, field_row, value_row)?.into_iter().collect(),
    };
    Ok(fields)
}

fn make_pair(field: &str, value: &str) -> Option<FieldPair> {
    let field = normalize_field(field);
    let value = normalize_value(value);
    if field.is_empty() || value.is_empty() {
        None
    } else {
        Some(FieldPair { field, value })
    }
}
