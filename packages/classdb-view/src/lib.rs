//! Filter/sort/search engine and presentation adapter.
//!
//! Consumes the cached row sets produced by `classdb-core` and turns them
//! into ordered, filtered views and renderable cells.

pub mod engine;
pub mod format;
pub mod render;

pub use engine::{apply_view, FilterCriterion, FilterSet, SortCriterion, DEFAULT_SEARCH_FIELDS};
pub use format::{format_currency, format_date, format_duration, format_status, StatusStyle};
pub use render::{render_row, render_rows, Cell, DisplayConfig};
