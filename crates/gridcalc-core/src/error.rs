//! Error types for Gridcalc core.

use gridcalc_engine::{FormulaParseError, Position};
use thiserror::Error;

/// Errors that can occur while editing a sheet.
///
/// Formula evaluation failures are not errors; they are
/// [`CellValue::Error`](gridcalc_engine::CellValue::Error) values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Invalid position: row {}, column {}", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error(transparent)]
    Parse(#[from] FormulaParseError),

    #[error("Circular dependency detected at {0}")]
    CircularDependency(Position),
}

pub type Result<T> = std::result::Result<T, SheetError>;
