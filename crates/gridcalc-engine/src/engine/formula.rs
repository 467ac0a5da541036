//! Formula parsing.
//!
//! [`FormulaEngine`] owns the Rhai engine that compiles formula skeletons
//! produced by the preprocessor. A compiled [`Formula`] remembers which
//! operands it binds so it can be evaluated repeatedly against fresh cell
//! values.

use rhai::{AST, Engine};
use thiserror::Error;

use super::position::Position;
use super::preprocess::preprocess_formula;

/// A malformed formula.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("Formula parse error: {message}")]
pub struct FormulaParseError {
    pub message: String,
}

impl FormulaParseError {
    pub fn new(message: impl Into<String>) -> Self {
        FormulaParseError {
            message: message.into(),
        }
    }
}

/// A compiled formula.
#[derive(Clone, Debug)]
pub struct Formula {
    pub(crate) ast: AST,
    pub(crate) literals: Vec<f64>,
    /// Operand positions in binding order (may include out-of-range positions).
    pub(crate) bindings: Vec<Position>,
    expression: String,
    referenced: Vec<Position>,
}

impl Formula {
    /// Canonical expression text, without the leading `=`.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Sorted, de-duplicated positions inside the sheet bounds that this formula reads.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced
    }
}

/// Nesting bound for compiled formulas.
///
/// Rhai's default limits reject long `+` chains (each operator adds a level)
/// and differ between debug and release builds.
const MAX_FORMULA_DEPTH: usize = 1024;

/// Rhai-backed formula compiler and evaluator.
pub struct FormulaEngine {
    pub(crate) engine: Engine,
}

impl FormulaEngine {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.set_max_expr_depths(MAX_FORMULA_DEPTH, MAX_FORMULA_DEPTH);
        FormulaEngine { engine }
    }

    /// Parse a formula body (the text after the leading `=`).
    pub fn parse(&self, text: &str) -> Result<Formula, FormulaParseError> {
        let pre = preprocess_formula(text)?;
        let ast = self
            .engine
            .compile_expression(&pre.script)
            .map_err(|e| FormulaParseError::new(e.to_string()))?;

        let mut referenced: Vec<Position> =
            pre.refs.iter().copied().filter(Position::is_valid).collect();
        referenced.sort();

        log::trace!("compiled formula '{}' as '{}'", pre.canonical, pre.script);
        Ok(Formula {
            ast,
            literals: pre.literals,
            bindings: pre.refs,
            expression: pre.canonical,
            referenced,
        })
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}
