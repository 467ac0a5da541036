//! gridcalc-core - Sheet model: cells, dependency graph, printing.

pub mod error;
pub mod sheet;

pub use error::{Result, SheetError};
pub use sheet::{Cell, CellContent, CellMut, ESCAPE_SIGN, FORMULA_SIGN, FormulaCell, Rows, Sheet};

pub use gridcalc_engine::{CellValue, FormulaError, Position, Size};
