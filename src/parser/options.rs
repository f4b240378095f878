//! Parser options and configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for the field/value line parser.
///
/// Options are plain data so they can be stored as a JSON profile and
/// shared between runs:
///
/// ```
/// use fieldex::ParserOptions;
///
/// let options = ParserOptions::from_json(r#"{
///     "known_fields": ["Date", "Client Information"],
///     "orphans": { "attach": "Unlabeled" }
/// }"#).unwrap();
/// assert_eq!(options.known_fields.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Expected field names. Empty enables fully dynamic header detection.
    pub known_fields: Vec<String>,

    /// Which separators split a line into field and value
    pub separators: Separators,

    /// What to do with lines that continue a value
    pub multiline: MultilinePolicy,

    /// What to do with continuation lines seen before any header
    pub orphans: OrphanPolicy,

    /// Maximum number of words in a field label (dynamic detection)
    pub max_label_words: usize,

    /// A separator-less label is a header when the next line is at least
    /// this many times longer
    pub distinct_length_ratio: f32,

    /// Drop fields whose value ends up empty
    pub skip_empty_values: bool,
}

impl ParserOptions {
    /// Create parser options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON profile.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON profile on disk.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize options as a pretty-printed JSON profile.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Profile(e.to_string()))
    }

    /// Replace the known-field set.
    pub fn with_known_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add one known field.
    pub fn with_known_field(mut self, field: impl Into<String>) -> Self {
        self.known_fields.push(field.into());
        self
    }

    /// Set the separator style.
    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.separators = separators;
        self
    }

    /// Set the multi-line policy.
    pub fn with_multiline(mut self, policy: MultilinePolicy) -> Self {
        self.multiline = policy;
        self
    }

    /// Set the orphan-line policy.
    pub fn with_orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }

    /// Attach orphan lines to a synthetic field with the given name.
    pub fn attach_orphans(self, field: impl Into<String>) -> Self {
        self.with_orphans(OrphanPolicy::Attach(field.into()))
    }

    /// Set the maximum label length in words.
    pub fn with_max_label_words(mut self, words: usize) -> Self {
        self.max_label_words = words;
        self
    }

    /// Set the length ratio that makes the following line visually distinct.
    pub fn with_distinct_length_ratio(mut self, ratio: f32) -> Self {
        self.distinct_length_ratio = ratio;
        self
    }

    /// Drop fields that end up without a value.
    pub fn skip_empty_values(mut self, skip: bool) -> Self {
        self.skip_empty_values = skip;
        self
    }

    /// Whether header detection is driven by the known-field set.
    pub fn has_known_fields(&self) -> bool {
        self.known_fields.iter().any(|f| !f.trim().is_empty())
    }

    fn validate(&self) -> Result<()> {
        if self.max_label_words == 0 {
            return Err(Error::Profile("max_label_words must be at least 1".into()));
        }
        if !(self.distinct_length_ratio > 0.0) {
            return Err(Error::Profile(
                "distinct_length_ratio must be positive".into(),
            ));
        }
        if let OrphanPolicy::Attach(name) = &self.orphans {
            if name.trim().is_empty() {
                return Err(Error::Profile("orphan field name is empty".into()));
            }
        }
        Ok(())
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            known_fields: Vec::new(),
            separators: Separators::default(),
            multiline: MultilinePolicy::Join,
            orphans: OrphanPolicy::Discard,
            max_label_words: 6,
            distinct_length_ratio: 1.5,
            skip_empty_values: false,
        }
    }
}

/// Enabled field/value separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Separators {
    /// `Field: value` (colon followed by whitespace or end of line)
    pub colon: bool,
    /// `Field - value` (dash surrounded by whitespace)
    pub dash: bool,
    /// `Field    value` (run of whitespace or a tab before the value)
    pub space_gap: bool,
    /// `Total $500` (capitalized label followed by a number).
    ///
    /// Also fires on continuation lines such as `Suite 200`; turn it off
    /// for documents whose values wrap onto lines of that shape.
    pub label_number: bool,
}

impl Separators {
    /// All separators enabled.
    pub fn all() -> Self {
        Self {
            colon: true,
            dash: true,
            space_gap: true,
            label_number: true,
        }
    }

    /// Only the colon separator.
    pub fn colon_only() -> Self {
        Self {
            colon: true,
            dash: false,
            space_gap: false,
            label_number: false,
        }
    }

    /// Whether no separator is enabled.
    pub fn is_none(&self) -> bool {
        !(self.colon || self.dash || self.space_gap || self.label_number)
    }
}

impl Default for Separators {
    fn default() -> Self {
        Self::all()
    }
}

/// Handling of continuation lines after a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultilinePolicy {
    /// Append continuation lines to the value, space-joined
    #[default]
    Join,
    /// Keep only the first line of each value
    FirstLine,
}

/// Handling of continuation lines that appear before any header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Drop them
    #[default]
    Discard,
    /// Collect them under a synthetic field with this name
    Attach(String),
}
