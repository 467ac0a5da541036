use gridcalc_engine::Position;

use super::FORMULA_SIGN;
use super::cell::{Cell, CellContent, FormulaCell};
use super::state::{Sheet, check_position};
use crate::error::{Result, SheetError};

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// - Empty string -> Empty
    /// - `=` followed by at least one character -> Formula
    /// - Anything else -> Text, verbatim
    ///
    /// The box grows to cover `pos` (and any placeholder created for a formula
    /// reference) even if the edit is then rejected.
    pub fn set(&mut self, pos: Position, text: &str) -> Result<()> {
        check_position(pos)?;
        self.ensure_cell(pos);
        self.set_content(pos, text)
    }

    /// Clear the specified cell.
    ///
    /// A cell still read by other formulas keeps its entry as an empty
    /// placeholder; otherwise the entry is removed and the printable area
    /// shrinks to the remaining cells.
    pub fn clear(&mut self, pos: Position) -> Result<()> {
        check_position(pos)?;
        let Some(cell) = self.cells.get(&pos) else {
            return Ok(());
        };
        let referenced = cell.is_referenced();

        self.commit(pos, CellContent::Empty, Vec::new());
        if referenced {
            log::debug!("cleared {} but kept it as a referenced placeholder", pos);
            return Ok(());
        }

        self.cells.remove(&pos);
        self.shrink_after_remove(pos);
        log::debug!(
            "removed {}, printable size now {}x{}",
            pos,
            self.size.rows,
            self.size.cols
        );
        Ok(())
    }

    /// Replace the content of the (present) cell at `pos`.
    pub(crate) fn set_content(&mut self, pos: Position, text: &str) -> Result<()> {
        if text.is_empty() {
            self.commit(pos, CellContent::Empty, Vec::new());
            return Ok(());
        }

        let formula = match text.strip_prefix(FORMULA_SIGN) {
            Some(body) if !body.is_empty() => body,
            _ => {
                self.commit(pos, CellContent::Text(text.to_string()), Vec::new());
                return Ok(());
            }
        };

        let formula = self.formula_engine().parse(formula)?;
        let refs = formula.referenced_cells().to_vec();

        // Every edge endpoint must resolve to a node, even if the edit is rejected below.
        for r in &refs {
            self.ensure_cell(*r);
        }

        if self.would_create_cycle(pos, &refs) {
            log::debug!("rejected ={} at {}: circular dependency", formula.expression(), pos);
            return Err(SheetError::CircularDependency(pos));
        }

        self.commit(pos, CellContent::Formula(FormulaCell::new(formula)), refs);
        Ok(())
    }

    /// Install validated content at `pos`, rewire its outgoing edges to
    /// `refs` and invalidate everything that reads it.
    fn commit(&mut self, pos: Position, content: CellContent, refs: Vec<Position>) {
        let Some(cell) = self.cells.get_mut(&pos) else {
            return;
        };
        cell.content = content;
        let reads = refs.len();
        let old_children = std::mem::take(&mut cell.children);

        for child in &old_children {
            if let Some(child_cell) = self.cells.get_mut(child) {
                child_cell.parents.remove(&pos);
            }
        }
        for r in &refs {
            if let Some(child_cell) = self.cells.get_mut(r) {
                child_cell.parents.insert(pos);
            }
        }
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.children = refs.into_iter().collect();
        }

        log::debug!("set {} (reads {} cells, previously {})", pos, reads, old_children.len());
        self.invalidate_from(pos);
    }

    /// Grow the printable area to cover `pos` and create an empty cell there if absent.
    pub(crate) fn ensure_cell(&mut self, pos: Position) {
        if self.row_widths.len() <= pos.row {
            self.row_widths.resize(pos.row + 1, 0);
        }
        let width = &mut self.row_widths[pos.row];
        *width = (*width).max(pos.col + 1);

        self.size.rows = self.size.rows.max(pos.row + 1);
        self.size.cols = self.size.cols.max(pos.col + 1);

        self.cells.entry(pos).or_insert_with(Cell::new_empty);
    }

    /// Recompute the printable area after the entry at `pos` was removed.
    fn shrink_after_remove(&mut self, pos: Position) {
        if let Some(width) = self.row_widths.get(pos.row).copied() {
            let mut width = width;
            while width > 0 && !self.cells.contains_key(&Position::new(pos.row, width - 1)) {
                width -= 1;
            }
            self.row_widths[pos.row] = width;
        }
        while self.row_widths.last() == Some(&0) {
            self.row_widths.pop();
        }

        self.size.rows = self.row_widths.len();
        self.size.cols = self.row_widths.iter().copied().max().unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_engine::{CellValue, FormulaError, Size};

    fn pos(name: &str) -> Position {
        Position::from_str(name).unwrap()
    }

    fn value(sheet: &Sheet, name: &str) -> CellValue {
        sheet.value(pos(name)).unwrap()
    }

    #[test]
    fn test_set_grows_printable_size() {
        let mut sheet = Sheet::new();
        sheet.set(pos("B3"), "x").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(3, 2));
        sheet.set(pos("D1"), "y").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(3, 4));
        sheet.set(pos("A1"), "z").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(3, 4));
    }

    #[test]
    fn test_set_classifies_content() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "hello").unwrap();
        sheet.set(pos("A2"), "42").unwrap();
        sheet.set(pos("A3"), "=A2/4").unwrap();
        sheet.set(pos("A4"), "").unwrap();

        assert_eq!(value(&sheet, "A1"), CellValue::Text("hello".into()));
        assert_eq!(value(&sheet, "A2"), CellValue::Text("42".into()));
        assert_eq!(value(&sheet, "A3"), CellValue::Number(10.5));
        assert_eq!(value(&sheet, "A4"), CellValue::Empty);
        assert!(sheet.get(pos("A4")).unwrap().is_some());
    }

    #[test]
    fn test_reference_to_absent_cell_creates_placeholder() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "=B5").unwrap();

        let b5 = sheet.get(pos("B5")).unwrap().unwrap();
        assert_eq!(b5.text(), "");
        assert_eq!(b5.value(&sheet), CellValue::Empty);
        assert!(b5.is_referenced());
        assert_eq!(sheet.printable_size(), Size::new(5, 2));
        assert_eq!(value(&sheet, "A1"), CellValue::Number(0.0));
    }

    #[test]
    fn test_formula_edit_rewires_edges() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "=B1+C1").unwrap();
        sheet.set(pos("A1"), "=C1+D1").unwrap();

        assert!(!sheet.get(pos("B1")).unwrap().unwrap().is_referenced());
        let c1 = sheet.get(pos("C1")).unwrap().unwrap();
        assert_eq!(c1.dependents().collect::<Vec<_>>(), vec![pos("A1")]);
        let a1 = sheet.get(pos("A1")).unwrap().unwrap();
        assert_eq!(a1.dependencies().collect::<Vec<_>>(), vec![pos("C1"), pos("D1")]);

        sheet.set(pos("A1"), "plain").unwrap();
        assert!(!sheet.get(pos("C1")).unwrap().unwrap().is_referenced());
        assert_eq!(sheet.get(pos("A1")).unwrap().unwrap().dependencies().count(), 0);
    }

    #[test]
    fn test_chain_recomputes_after_edit() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "1").unwrap();
        sheet.set(pos("B1"), "=A1+1").unwrap();
        sheet.set(pos("C1"), "=B1+1").unwrap();
        assert_eq!(value(&sheet, "C1"), CellValue::Number(3.0));

        sheet.set(pos("A1"), "2").unwrap();
        assert_eq!(value(&sheet, "C1"), CellValue::Number(4.0));
    }

    #[test]
    fn test_errors_propagate_as_values() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "abc").unwrap();
        sheet.set(pos("B1"), "=A1*2").unwrap();
        sheet.set(pos("C1"), "=B1+1").unwrap();
        sheet.set(pos("D1"), "=1/0").unwrap();
        sheet.set(pos("E1"), "=D1-C1").unwrap();

        assert_eq!(value(&sheet, "B1"), CellValue::Error(FormulaError::Value));
        assert_eq!(value(&sheet, "C1"), CellValue::Error(FormulaError::Value));
        assert_eq!(value(&sheet, "D1"), CellValue::Error(FormulaError::Arithmetic));
        assert_eq!(value(&sheet, "E1"), CellValue::Error(FormulaError::Arithmetic));

        sheet.set(pos("A1"), "4").unwrap();
        assert_eq!(value(&sheet, "C1"), CellValue::Number(9.0));
    }

    #[test]
    fn test_out_of_range_reference_is_ref_error_value() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "=ZZZZ1+1").unwrap();
        assert_eq!(value(&sheet, "A1"), CellValue::Error(FormulaError::Ref));
        assert_eq!(sheet.printable_size(), Size::new(1, 1));
    }

    #[test]
    fn test_parse_error_leaves_content_unchanged() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "5").unwrap();
        let err = sheet.set(pos("A1"), "=1+").unwrap_err();
        assert!(matches!(err, SheetError::Parse(_)));
        assert_eq!(sheet.get(pos("A1")).unwrap().unwrap().text(), "5");
    }

    #[test]
    fn test_juxtaposed_operands_are_parse_errors() {
        let mut sheet = Sheet::new();
        sheet.set(pos("B1"), "1").unwrap();
        assert!(matches!(sheet.set(pos("A1"), "=2(3)"), Err(SheetError::Parse(_))));
        assert!(matches!(sheet.set(pos("A2"), "=B1(2)"), Err(SheetError::Parse(_))));
        assert!(!sheet.get(pos("B1")).unwrap().unwrap().is_referenced());
    }

    #[test]
    fn test_rejected_edit_keeps_placeholders() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "=B1").unwrap();
        let err = sheet.set(pos("B1"), "=A1+C7").unwrap_err();
        assert_eq!(err, SheetError::CircularDependency(pos("B1")));

        let c7 = sheet.get(pos("C7")).unwrap().unwrap();
        assert_eq!(c7.text(), "");
        assert!(!c7.is_referenced());
        assert_eq!(sheet.printable_size(), Size::new(7, 3));
    }

    #[test]
    fn test_emptying_content_detaches_edges_and_invalidates_dependents() {
        let mut sheet = Sheet::new();
        sheet.set(pos("C1"), "2").unwrap();
        sheet.set(pos("B1"), "=C1*10").unwrap();
        sheet.set(pos("A1"), "=B1+1").unwrap();
        assert_eq!(value(&sheet, "A1"), CellValue::Number(21.0));

        sheet.set(pos("B1"), "").unwrap();

        assert!(!sheet.get(pos("C1")).unwrap().unwrap().is_referenced());
        let b1 = sheet.get(pos("B1")).unwrap().unwrap();
        assert_eq!(b1.dependencies().count(), 0);
        assert!(b1.is_referenced());
        assert!(sheet.get(pos("A1")).unwrap().unwrap().cached_value().is_none());
        assert_eq!(value(&sheet, "A1"), CellValue::Number(1.0));
    }

    #[test]
    fn test_clear_far_corner_shrinks_to_remaining_cells() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "a").unwrap();
        sheet.set(pos("B2"), "b").unwrap();
        sheet.set(pos("D5"), "corner").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(5, 4));

        sheet.clear(pos("D5")).unwrap();
        assert!(sheet.get(pos("D5")).unwrap().is_none());
        assert_eq!(sheet.printable_size(), Size::new(2, 2));

        sheet.clear(pos("B2")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(1, 1));

        sheet.clear(pos("A1")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_clear_trims_columns_across_rows() {
        let mut sheet = Sheet::new();
        sheet.set(pos("E1"), "wide").unwrap();
        sheet.set(pos("B1"), "narrow").unwrap();
        sheet.set(pos("C3"), "mid").unwrap();

        sheet.clear(pos("E1")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(3, 3));

        sheet.clear(pos("C3")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(1, 2));
    }

    #[test]
    fn test_clear_interior_cell_keeps_size() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "a").unwrap();
        sheet.set(pos("C3"), "c").unwrap();
        sheet.clear(pos("A1")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(3, 3));
    }

    #[test]
    fn test_clear_absent_cell_is_noop() {
        let mut sheet = Sheet::new();
        sheet.set(pos("B2"), "x").unwrap();
        sheet.clear(pos("Z99")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(2, 2));
    }

    #[test]
    fn test_clear_referenced_cell_keeps_placeholder() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "=B2+1").unwrap();
        sheet.set(pos("B2"), "5").unwrap();
        assert_eq!(value(&sheet, "A1"), CellValue::Number(6.0));

        sheet.clear(pos("B2")).unwrap();

        let b2 = sheet.get(pos("B2")).unwrap().unwrap();
        assert_eq!(b2.text(), "");
        assert!(b2.is_referenced());
        assert_eq!(sheet.printable_size(), Size::new(2, 2));
        assert_eq!(value(&sheet, "A1"), CellValue::Number(1.0));

        // Once nothing reads it, a clear removes it.
        sheet.set(pos("A1"), "").unwrap();
        sheet.clear(pos("B2")).unwrap();
        assert!(sheet.get(pos("B2")).unwrap().is_none());
        assert_eq!(sheet.printable_size(), Size::new(1, 1));
    }

    #[test]
    fn test_clear_formula_cell_detaches_from_its_dependencies() {
        let mut sheet = Sheet::new();
        sheet.set(pos("B1"), "=A1").unwrap();
        sheet.clear(pos("B1")).unwrap();
        assert!(!sheet.get(pos("A1")).unwrap().unwrap().is_referenced());
        assert_eq!(sheet.printable_size(), Size::new(1, 1));
    }
}
