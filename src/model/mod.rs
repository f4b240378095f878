//! Data model shared by extraction, parsing, and rendering.
//!
//! Extractors produce [`Line`]s (or [`OcrToken`]s that are grouped into
//! lines), the parser turns lines into a [`FieldMap`], and the renderers
//! consume [`Record`]s assembled into a [`ResultTable`].

mod field;
mod line;
mod record;

pub use field::{FieldMap, FieldPair};
pub use line::{lines_from_text, BoundingBox, Line, OcrToken};
pub use record::{Record, ResultTable};
