//! Sheet state and logic.

mod cell;
mod graph;
mod ops;
mod print;
mod state;

pub use cell::{Cell, CellContent, CellMut, FormulaCell};
pub use print::Rows;
pub use state::Sheet;

/// Leading character marking a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character forcing the rest of the input to be read as text.
pub const ESCAPE_SIGN: char = '\'';
