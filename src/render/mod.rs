//! Rendering extracted records to CSV, JSON, and Markdown.

mod csv;
mod json;
mod markdown;
mod options;

pub use self::csv::{to_csv, write_csv};
pub use json::{to_json, JsonFormat};
pub use markdown::to_markdown;
pub use options::RenderOptions;

use crate::error::{Error, Result};
use crate::model::{Record, ResultTable};
use std::str::FromStr;

/// Output format for extracted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One row per document, one column per field
    #[default]
    Csv,
    /// Array of `{source, fields}` objects
    Json,
    /// One field/value table per document
    Markdown,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            other => Err(Error::Render(format!("unknown output format '{}'", other))),
        }
    }
}

/// Render records in the given format.
pub fn render(records: &[Record], format: OutputFormat, options: &RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Csv => {
            let table = ResultTable::from_records(records, &options.filler);
            to_csv(&table, options)
        }
        OutputFormat::Json => to_json(records, options.json_format),
        OutputFormat::Markdown => Ok(to_markdown(records, options)),
    }
}
