//! JSON rendering of extracted records.

use crate::error::{Error, Result};
use crate::model::Record;
use serde::{Deserialize, Serialize};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert records to a JSON array of `{source, fields}` objects.
pub fn to_json(records: &[Record], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(records),
        JsonFormat::Compact => serde_json::to_string(records),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
