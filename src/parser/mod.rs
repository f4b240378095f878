//! Field/value parsing.
//!
//! - [`FieldParser`] turns text lines into a [`FieldMap`](crate::FieldMap)
//! - [`LineGrouper`] rebuilds lines from OCR tokens before parsing
//! - [`pair_cells`] and [`pair_rows`] read pairs out of table cells
//! - [`HandlerRegistry`] splits composite fields after parsing

mod handlers;
mod layout;
mod line_parser;
mod normalize;
mod options;
mod separator;
mod table;

pub use handlers::{ContactSplitter, FieldHandler, HandlerRegistry};
pub use layout::{GroupingOptions, LineGrouper};
pub use line_parser::{FieldParser, LineKind};
pub use normalize::{collapse_whitespace, normalize_field, normalize_value};
pub use options::{MultilinePolicy, OrphanPolicy, ParserOptions, Separators};
pub use separator::{SeparatorKind, SeparatorMatcher, Split};
pub use table::{pair_cells, pair_rows, table_fields, TableLayout};
