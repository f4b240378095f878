//! Markdown rendering of extracted records.
//!
//! Each record becomes a section with a two-column field/value table.

use crate::model::Record;

use super::RenderOptions;

/// Convert records to Markdown.
pub fn to_markdown(records: &[Record], options: &RenderOptions) -> String {
    let mut output = String::from("# Extracted Data\n\n");

    if records.is_empty() {
        output.push_str("_No data extracted._\n");
        return output;
    }

    for (i, record) in records.iter().enumerate() {
        output.push_str(&format!("## Record {}\n\n", i + 1));

        if options.source_column {
            output.push_str(&format!(
                "{}: {}\n\n",
                options.source_column_name,
                escape_cell(&record.source)
            ));
        }

        output.push_str("| Field | Value |\n");
        output.push_str("| --- | --- |\n");
        for pair in &record.fields {
            let value = if pair.value.is_empty() {
                options.filler.as_str()
            } else {
                pair.value.as_str()
            };
            output.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&pair.field),
                escape_cell(value)
            ));
        }
        output.push('\n');
    }

    output
}

fn escape_cell(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '|' | '`' | '*' | '_' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            '\n' | '\r' => result.push(' '),
            _ => result.push(c),
        }
    }
    result
}
