//! Formula evaluation.
//!
//! Operands are resolved through a caller-supplied lookup before Rhai runs the
//! compiled skeleton, so an error value in any referenced cell short-circuits
//! evaluation.

use rhai::{Dynamic, Scope};

use super::formula::{Formula, FormulaEngine};
use super::position::Position;
use super::value::{CellValue, FormulaError};

impl FormulaEngine {
    /// Evaluate `formula`, reading referenced cells through `lookup`.
    ///
    /// The first failing operand in textual order determines the error.
    pub fn evaluate<F>(&self, formula: &Formula, mut lookup: F) -> Result<f64, FormulaError>
    where
        F: FnMut(Position) -> CellValue,
    {
        let mut scope = Scope::new();
        for (i, value) in formula.literals.iter().enumerate() {
            scope.push_constant(format!("n{}", i), *value);
        }
        for (i, pos) in formula.bindings.iter().enumerate() {
            if !pos.is_valid() {
                return Err(FormulaError::Ref);
            }
            let operand = lookup(*pos).as_operand()?;
            scope.push_constant(format!("r{}", i), operand);
        }

        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &formula.ast)
            .map_err(|err| {
                log::trace!("formula '{}' failed: {}", formula.expression(), err);
                FormulaError::Arithmetic
            })?;

        let n = match result.as_float() {
            Ok(n) => n,
            Err(_) => result.as_int().map_err(|_| FormulaError::Value)? as f64,
        };
        if n.is_finite() {
            Ok(n)
        } else {
            Err(FormulaError::Arithmetic)
        }
    }
}
