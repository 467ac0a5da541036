use std::collections::HashMap;

use gridcalc_engine::{CellValue, FormulaEngine, Position, Size};

use super::cell::{Cell, CellMut};
use crate::error::{Result, SheetError};

/// Sparse sheet: owns every cell by position and tracks the printable area.
pub struct Sheet {
    /// Cell arena. Absent positions are implicitly empty.
    pub(crate) cells: HashMap<Position, Cell>,
    /// Per row, one past the last occupied column (0 for an empty row).
    /// Trailing empty rows are never stored.
    pub(crate) row_widths: Vec<usize>,
    pub(crate) size: Size,
    engine: FormulaEngine,
}

impl Sheet {
    pub fn new() -> Self {
        Sheet {
            cells: HashMap::new(),
            row_widths: Vec::new(),
            size: Size::default(),
            engine: FormulaEngine::new(),
        }
    }

    /// Look up a cell. `None` if the position was never written or has been cleared.
    pub fn get(&self, pos: Position) -> Result<Option<&Cell>> {
        check_position(pos)?;
        Ok(self.cells.get(&pos))
    }

    /// Mutable variant of [`Sheet::get`].
    pub fn get_mut(&mut self, pos: Position) -> Result<Option<CellMut<'_>>> {
        check_position(pos)?;
        if !self.cells.contains_key(&pos) {
            return Ok(None);
        }
        Ok(Some(CellMut { sheet: self, pos }))
    }

    /// Evaluated value at `pos`; absent cells read as empty.
    pub fn value(&self, pos: Position) -> Result<CellValue> {
        check_position(pos)?;
        Ok(self.value_at(pos))
    }

    /// Smallest rectangle anchored at A1 covering every present cell.
    pub fn printable_size(&self) -> Size {
        self.size
    }

    /// Number of present cells, placeholders included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn value_at(&self, pos: Position) -> CellValue {
        match self.cells.get(&pos) {
            Some(cell) => cell.value(self),
            None => CellValue::Empty,
        }
    }

    pub(crate) fn formula_engine(&self) -> &FormulaEngine {
        &self.engine
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_position(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidPosition(pos))
    }
}
