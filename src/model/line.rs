//! Text lines and OCR tokens.

use serde::{Deserialize, Serialize};

/// A single line of extracted text in approximate reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// The line text as produced by the extractor
    pub text: String,

    /// Whether the line is visually emphasized (bold, larger font).
    ///
    /// `None` when the extractor has no formatting information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<bool>,
}

impl Line {
    /// Create a line without formatting information.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: None,
        }
    }

    /// Create a line with a known emphasis flag.
    pub fn styled(text: impl Into<String>, emphasis: bool) -> Self {
        Self {
            text: text.into(),
            emphasis: Some(emphasis),
        }
    }

    /// Check if the line has no visible content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::new(text)
    }
}

impl From<&String> for Line {
    fn from(text: &String) -> Self {
        Line::new(text.as_str())
    }
}

impl From<&Line> for Line {
    fn from(line: &Line) -> Self {
        line.clone()
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Line::new(text)
    }
}

/// Split a block of text into lines.
pub fn lines_from_text(text: &str) -> Vec<Line> {
    text.lines().map(Line::new).collect()
}

/// Pixel bounding box of an OCR token (origin at the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// A recognized word with its position and recognizer confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrToken {
    /// Recognized text
    pub text: String,

    /// Position on the page image
    pub bbox: BoundingBox,

    /// Recognizer confidence in percent (0-100; negative for non-word rows)
    pub confidence: f32,
}

impl OcrToken {
    /// Create a token.
    pub fn new(text: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence,
        }
    }

    /// Create a fully confident token at `(left, top)` with a default size.
    ///
    /// Convenient for engines that report positions but no confidence.
    pub fn at(text: impl Into<String>, left: f32, top: f32) -> Self {
        let text = text.into();
        let width = 8.0 * text.chars().count() as f32;
        Self::new(text, BoundingBox::new(left, top, width, 12.0), 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_blank() {
        assert!(Line::new("   \t").is_blank());
        assert!(!Line::new(" a ").is_blank());
    }

    #[test]
    fn test_lines_from_text() {
        let lines = lines_from_text("Date: 7/23/25\r\nTotal $500\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Date: 7/23/25");
        assert_eq!(lines[1].emphasis, None);
    }

    #[test]
    fn test_bbox_geometry() {
        let bbox = BoundingBox::new(10.0, 100.0, 40.0, 20.0);
        assert_eq!(bbox.center_y(), 110.0);
    }
}
