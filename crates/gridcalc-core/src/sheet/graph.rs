//! Dependency graph traversal.
//!
//! Edges live on the cells themselves (`children` / `parents`). The cycle
//! check and invalidation follow `parents`, outward to everything that reads
//! a cell; cold evaluation follows `children`. All three use an explicit
//! worklist and visited set so stack depth stays constant on long chains.

use std::collections::HashSet;

use gridcalc_engine::Position;

use super::Sheet;

impl Sheet {
    /// Would giving `pos` a formula that reads `refs` close a cycle?
    ///
    /// Everything reachable from `pos` through `parents` already reads `pos`;
    /// if any of those cells is in `refs`, `pos` would end up reading itself.
    /// `pos` is part of its own reachable set, so self-references are caught too.
    pub(crate) fn would_create_cycle(&self, pos: Position, refs: &[Position]) -> bool {
        let targets: HashSet<Position> = refs
            .iter()
            .copied()
            .filter(|r| self.cells.contains_key(r))
            .collect();
        if targets.is_empty() {
            return false;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![pos];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if targets.contains(&current) {
                return true;
            }
            if let Some(cell) = self.cells.get(&current) {
                stack.extend(cell.dependents().filter(|p| !visited.contains(p)));
            }
        }
        false
    }

    /// Compute, leaves first, every uncached formula transitively read from `roots`.
    ///
    /// Once this returns, evaluating a formula over `roots` only reads cached
    /// values, so a cold read of a long chain never recurses.
    pub(crate) fn evaluate_dependencies(&self, roots: impl IntoIterator<Item = Position>) {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<(Position, bool)> = roots.into_iter().map(|p| (p, false)).collect();
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            if !visited.insert(current) {
                continue;
            }
            let Some(cell) = self.cells.get(&current) else {
                continue;
            };
            if !cell.needs_evaluation() {
                continue;
            }
            stack.push((current, true));
            stack.extend(
                cell.dependencies()
                    .filter(|p| !visited.contains(p))
                    .map(|p| (p, false)),
            );
        }

        if !order.is_empty() {
            log::trace!("evaluating {} stale formulas bottom-up", order.len());
        }
        for pos in order {
            if let Some(cell) = self.cells.get(&pos) {
                cell.value(self);
            }
        }
    }

    /// Drop the cached value of `pos` and of every cell that transitively reads it.
    pub(crate) fn invalidate_from(&mut self, pos: Position) {
        let mut visited = HashSet::new();
        let mut stack = vec![pos];
        let mut dropped = 0usize;
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(cell) = self.cells.get_mut(&current) {
                if cell.invalidate_cache() {
                    dropped += 1;
                }
                stack.extend(cell.dependents().filter(|p| !visited.contains(p)));
            }
        }
        log::trace!(
            "invalidated from {}: visited {} cells, dropped {} cached values",
            pos,
            visited.len(),
            dropped
        );
    }
}
