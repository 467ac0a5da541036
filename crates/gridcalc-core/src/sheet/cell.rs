//! Cell data structures for the sheet.
//!
//! - [`CellContent`] - What a cell holds (empty, literal text, or a formula)
//! - [`Cell`] - Content plus dependency edges in both directions
//! - [`FormulaCell`] - A compiled formula with its lazily computed value
//! - [`CellMut`] - Mutable handle to a cell that keeps the sheet consistent

use std::cell::OnceCell;
use std::collections::BTreeSet;

use gridcalc_engine::{CellValue, Formula, FormulaError, Position};

use super::{ESCAPE_SIGN, FORMULA_SIGN, Sheet};

/// A formula and its cached result.
///
/// The cache is filled on first read and emptied whenever anything the
/// formula transitively reads is edited.
#[derive(Clone, Debug)]
pub struct FormulaCell {
    formula: Formula,
    cache: OnceCell<Result<f64, FormulaError>>,
}

impl FormulaCell {
    pub(crate) fn new(formula: Formula) -> Self {
        FormulaCell {
            formula,
            cache: OnceCell::new(),
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn cached_value(&self) -> Option<CellValue> {
        self.cache.get().map(|result| CellValue::from(*result))
    }

    fn value(&self, sheet: &Sheet) -> CellValue {
        let result = self.cache.get_or_init(|| {
            log::trace!("evaluating ={}", self.formula.expression());
            sheet
                .formula_engine()
                .evaluate(&self.formula, |pos| sheet.value_at(pos))
        });
        CellValue::from(*result)
    }

    /// Returns true if a cached value was dropped.
    fn invalidate(&mut self) -> bool {
        self.cache.take().is_some()
    }
}

/// The type of content stored in a cell.
#[derive(Clone, Debug, Default)]
pub enum CellContent {
    #[default]
    Empty,
    /// Literal text as entered, including any leading escape sign.
    Text(String),
    Formula(FormulaCell),
}

/// A cell in the sheet: a node of the dependency graph.
///
/// `children` are the cells this cell's formula reads; `parents` are the
/// formula cells that read this one. Both are kept as positions into the
/// owning [`Sheet`].
#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub(crate) content: CellContent,
    pub(crate) children: BTreeSet<Position>,
    pub(crate) parents: BTreeSet<Position>,
}

impl Cell {
    pub(crate) fn new_empty() -> Cell {
        Cell::default()
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Evaluated value of the cell, computing and caching formulas on demand.
    pub fn value(&self, sheet: &Sheet) -> CellValue {
        match &self.content {
            CellContent::Empty => CellValue::Empty,
            CellContent::Text(text) => {
                let literal = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                CellValue::Text(literal.to_string())
            }
            CellContent::Formula(formula) => {
                if formula.cache.get().is_none() {
                    sheet.evaluate_dependencies(self.dependencies());
                }
                formula.value(sheet)
            }
        }
    }

    /// The editable representation of the cell.
    pub fn text(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(formula) => {
                format!("{}{}", FORMULA_SIGN, formula.formula().expression())
            }
        }
    }

    /// Sorted positions the current formula reads; empty for non-formula content.
    pub fn referenced_cells(&self) -> Vec<Position> {
        match &self.content {
            CellContent::Formula(formula) => formula.formula().referenced_cells().to_vec(),
            _ => Vec::new(),
        }
    }

    /// True when at least one formula reads this cell.
    pub fn is_referenced(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Cells whose formulas read this cell.
    pub fn dependents(&self) -> impl Iterator<Item = Position> + '_ {
        self.parents.iter().copied()
    }

    /// Cells this cell's formula reads.
    pub fn dependencies(&self) -> impl Iterator<Item = Position> + '_ {
        self.children.iter().copied()
    }

    /// The cached formula result, if the cell holds a formula that has been evaluated.
    pub fn cached_value(&self) -> Option<CellValue> {
        match &self.content {
            CellContent::Formula(formula) => formula.cached_value(),
            _ => None,
        }
    }

    /// A formula whose value has not been computed since its last invalidation.
    pub(crate) fn needs_evaluation(&self) -> bool {
        matches!(&self.content, CellContent::Formula(formula) if formula.cache.get().is_none())
    }

    pub(crate) fn invalidate_cache(&mut self) -> bool {
        match &mut self.content {
            CellContent::Formula(formula) => formula.invalidate(),
            _ => false,
        }
    }
}

/// Mutable access to a cell that routes edits through its sheet.
pub struct CellMut<'a> {
    pub(crate) sheet: &'a mut Sheet,
    pub(crate) pos: Position,
}

impl CellMut<'_> {
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn cell(&self) -> &Cell {
        // A handle is only created for a present cell, and edits through it never remove the entry.
        &self.sheet.cells[&self.pos]
    }

    /// Replace the cell's content, with the same semantics as [`Sheet::set`].
    pub fn set_content(&mut self, text: &str) -> crate::Result<()> {
        self.sheet.set_content(self.pos, text)
    }

    /// Empty the cell's content; the cell itself stays in the sheet.
    pub fn clear(&mut self) -> crate::Result<()> {
        self.set_content("")
    }

    pub fn value(&self) -> CellValue {
        self.cell().value(&*self.sheet)
    }

    pub fn text(&self) -> String {
        self.cell().text()
    }

    pub fn referenced_cells(&self) -> Vec<Position> {
        self.cell().referenced_cells()
    }

    pub fn is_referenced(&self) -> bool {
        self.cell().is_referenced()
    }
}
