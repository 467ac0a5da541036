//! gridcalc_engine - Positions, values and Rhai-backed formulas.

pub mod engine;

pub use engine::{
    CellValue, Formula, FormulaEngine, FormulaError, FormulaParseError, MAX_COLS, MAX_ROWS,
    Position, Size, format_number,
};
