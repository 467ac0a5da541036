//! Evaluated cell values.
//!
//! Formula failures are values, not errors: a [`FormulaError`] stored in a
//! cell propagates through every formula that reads it.

use std::fmt;

use super::format::format_number;

/// A structured evaluation failure.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FormulaError {
    /// Reference to a position outside the sheet bounds.
    Ref,
    /// Reference to a cell whose value is not a number.
    Value,
    /// Division by zero or a non-finite result.
    Arithmetic,
}

impl FormulaError {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Arithmetic => "#ARITHM!",
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value a cell presents to readers and to the printer.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl CellValue {
    /// Interpret the value as a formula operand.
    ///
    /// Blank cells and empty text read as zero; text must parse as a number
    /// in full.
    pub fn as_operand(&self) -> Result<f64, FormulaError> {
        match self {
            CellValue::Empty => Ok(0.0),
            CellValue::Number(n) => Ok(*n),
            CellValue::Error(e) => Err(*e),
            CellValue::Text(s) if s.is_empty() => Ok(0.0),
            CellValue::Text(s) => s.parse::<f64>().map_err(|_| FormulaError::Value),
        }
    }
}

impl From<Result<f64, FormulaError>> for CellValue {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}
