//! Formula engine API.
//!
//! This module provides everything the sheet consumes to compute values:
//!
//! - [`Position`], [`Size`] - Bounded cell coordinates (A1 notation ↔ row/col indices)
//! - [`CellValue`], [`FormulaError`] - Evaluated values, with errors as values
//! - [`FormulaEngine`], [`Formula`] - Parse formulas and evaluate them with Rhai
//! - [`format_number`] - Format numbers for display

mod eval;
mod format;
mod formula;
mod position;
mod preprocess;
mod value;

pub use format::format_number;
pub use formula::{Formula, FormulaEngine, FormulaParseError};
pub use position::{MAX_COLS, MAX_ROWS, Position, Size};
pub use value::{CellValue, FormulaError};
