//! Rendering options and configuration.

use super::JsonFormat;

/// Options for rendering extracted records.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Value written for fields a record does not have
    pub filler: String,

    /// Prefix CSV output with a UTF-8 byte order mark
    pub bom: bool,

    /// Add a leading column (CSV) or line (Markdown) naming the source document
    pub source_column: bool,

    /// Name of the source column
    pub source_column_name: String,

    /// JSON layout
    pub json_format: JsonFormat,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filler for missing fields.
    pub fn with_filler(mut self, filler: impl Into<String>) -> Self {
        self.filler = filler.into();
        self
    }

    /// Enable or disable the byte order mark.
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    /// Enable or disable the source column.
    pub fn with_source_column(mut self, enabled: bool) -> Self {
        self.source_column = enabled;
        self
    }

    /// Rename the source column.
    pub fn with_source_column_name(mut self, name: impl Into<String>) -> Self {
        self.source_column_name = name.into();
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            filler: String::new(),
            bom: true,
            source_column: false,
            source_column_name: "source".to_string(),
            json_format: JsonFormat::Pretty,
        }
    }
}
