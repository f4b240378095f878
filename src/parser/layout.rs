//! Spatial grouping of OCR tokens into text lines.
//!
//! OCR engines report words with bounding boxes rather than lines. Tokens
//! whose vertical centers are close enough form a line band; each band is
//! read left to right.

use crate::model::{Line, OcrToken};
use serde::{Deserialize, Serialize};

/// Options for grouping OCR tokens into lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingOptions {
    /// Maximum vertical center distance (pixels) within one band
    pub band_tolerance: f32,

    /// Tokens below this recognizer confidence are discarded
    pub min_confidence: f32,
}

impl GroupingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the band tolerance in pixels.
    pub fn with_band_tolerance(mut self, pixels: f32) -> Self {
        self.band_tolerance = pixels;
        self
    }

    /// Set the minimum confidence (0-100).
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            band_tolerance: 10.0,
            min_confidence: 0.0,
        }
    }
}

/// Groups OCR tokens into lines in reading order.
#[derive(Debug, Clone, Default)]
pub struct LineGrouper {
    options: GroupingOptions,
}

impl LineGrouper {
    pub fn new(options: GroupingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GroupingOptions {
        &self.options
    }

    /// Group tokens into lines, top to bottom.
    pub fn group(&self, tokens: &[OcrToken]) -> Vec<Line> {
        self.group_bands(tokens)
            .into_iter()
            .map(|band| {
                let text = band
                    .iter()
                    .map(|t| t.text.trim())
                    .collect::<Vec<_>>()
                    .join(" ");
                Line::new(text)
            })
            .collect()
    }

    /// Group tokens into bands, each sorted left to right.
    pub fn group_bands<'a>(&self, tokens: &'a [OcrToken]) -> Vec<Vec<&'a OcrToken>> {
        let before = tokens.len();
        let mut tokens: Vec<&OcrToken> = tokens
            .iter()
            .filter(|t| !t.text.trim().is_empty() && t.confidence >= self.options.min_confidence)
            .collect();
        log::debug!(
            "kept {} of {} OCR tokens (min confidence {})",
            tokens.len(),
            before,
            self.options.min_confidence
        );

        tokens.sort_by(|a, b| {
            a.bbox
                .center_y()
                .partial_cmp(&b.bbox.center_y())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut bands: Vec<Vec<&OcrToken>> = Vec::new();
        let mut current: Vec<&OcrToken> = Vec::new();
        let mut anchor: Option<f32> = None;

        for token in tokens {
            let center = token.bbox.center_y();
            match anchor {
                Some(y) if (center - y).abs() < self.options.band_tolerance => {
                    current.push(token);
                }
                _ => {
                    if !current.is_empty() {
                        bands.push(std::mem::take(&mut current));
                    }
                    anchor = Some(center);
                    current.push(token);
                }
            }
        }
        if !current.is_empty() {
            bands.push(current);
        }

        for band in &mut bands {
            band.sort_by(|a, b| {
                a.bbox
                    .left
                    .partial_cmp(&b.bbox.left)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        bands
    }
}
