//! The sheet: a sparse grid of cells, the dependency graph stitched across
//! them, and the transactional edit protocol that keeps the two in sync.

use std::collections::{BTreeSet, HashMap, HashSet};

use formula::{CellValue, Position, SheetView};

use crate::cell::{Cell, CellContent};
use crate::error::{EngineError, Result};

/// A sparse spreadsheet. Cells are created lazily: reading an untouched
/// position reports an empty cell without ever allocating one.
#[derive(Debug, Default)]
pub struct Sheet {
    cells: HashMap<Position, Cell>,
    printable_rows: i64,
    printable_cols: i64,
}

impl Sheet {
    pub fn new() -> Self {
        Sheet {
            cells: HashMap::new(),
            printable_rows: 0,
            printable_cols: 0,
        }
    }

    pub fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// The smallest rectangle, anchored at (0, 0), that contains every
    /// cell worth printing: every non-empty cell and every cell some
    /// other formula still references (an implicit empty precedent can
    /// sit inside the printable area even though it holds nothing).
    pub fn printable_size(&self) -> (i64, i64) {
        (self.printable_rows, self.printable_cols)
    }

    /// Set the content of `pos` from the literal text a user would type:
    /// empty string clears the cell, a leading `=` marks a formula, and
    /// anything else is stored verbatim as text.
    ///
    /// On any error the sheet is left byte-for-byte as it was: the
    /// candidate content and its dependency edges are built and
    /// cycle-checked entirely off to the side before anything is
    /// mutated.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        if !pos.is_valid() {
            return Err(EngineError::InvalidPosition(pos));
        }

        // Fast path: textually unchanged input touches nothing.
        let unchanged = match self.cells.get(&pos) {
            Some(cell) => cell.literal_text() == text,
            None => text.is_empty(),
        };
        if unchanged {
            return Ok(());
        }

        let (content, mut referenced) = build_content(text)?;
        referenced.dedup();

        for &candidate in &referenced {
            if candidate == pos || self.depends_on(candidate, pos) {
                log::debug!("rejecting {pos}: {candidate} would close a cycle back to it");
                return Err(EngineError::CircularDependency(pos));
            }
        }

        let new_precedents: BTreeSet<Position> = referenced.into_iter().collect();
        let old_precedents = self
            .cells
            .get(&pos)
            .map(|c| c.precedents().clone())
            .unwrap_or_default();

        for p in &old_precedents {
            if let Some(precedent_cell) = self.cells.get_mut(p) {
                precedent_cell.dependents_mut().remove(&pos);
            }
        }
        // Only valid positions get materialized into the grid; an
        // out-of-bounds reference stays a dangling entry in this cell's own
        // precedent set and is never inserted as a node (it resolves to
        // `#REF!` at evaluation time instead, formula::eval::resolve).
        for &p in &new_precedents {
            if p.is_valid() {
                self.cells
                    .entry(p)
                    .or_insert_with(Cell::empty)
                    .dependents_mut()
                    .insert(pos);
            }
        }

        self.cells
            .entry(pos)
            .or_insert_with(Cell::empty)
            .set_content(content, new_precedents.clone());

        self.invalidate_transitive(pos);

        // `pos` itself may have grown or shrunk the printable rectangle,
        // and so may any precedent whose "referenced" status just flipped:
        // a freshly materialized empty precedent can extend it, and an old
        // precedent this edit just dropped can shrink it.
        self.update_printable_size(pos);
        for p in new_precedents.into_iter().chain(old_precedents) {
            self.update_printable_size(p);
        }

        Ok(())
    }

    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.set_cell(pos, "")
    }

    /// The value at `pos`, evaluating and memoizing it if necessary.
    /// Absent or empty cells read as `0`, the arithmetic default for a
    /// referenced-but-blank operand.
    pub fn value_at(&self, pos: Position) -> CellValue {
        let Some(cell) = self.cells.get(&pos) else {
            return CellValue::Number(0.0);
        };
        match cell.content() {
            CellContent::Empty => CellValue::Number(0.0),
            CellContent::Text(text) => CellValue::Text(strip_escape(text).to_string()),
            CellContent::Formula { ast, .. } => {
                if let Some(cached) = cell.cached_value() {
                    return cached;
                }
                let value = formula::execute(ast, self);
                cell.set_cached_value(value.clone());
                value
            }
        }
    }

    /// The literal text a user would see re-opening `pos` for editing.
    pub fn text_at(&self, pos: Position) -> String {
        self.cells
            .get(&pos)
            .map(|c| c.literal_text().to_string())
            .unwrap_or_default()
    }

    /// The value at `pos` formatted for display: blank for an empty
    /// cell, rather than the `0` an evaluating formula would see.
    pub fn display_value(&self, pos: Position) -> String {
        let Some(cell) = self.cells.get(&pos) else {
            return String::new();
        };
        match cell.content() {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => strip_escape(text).to_string(),
            CellContent::Formula { .. } => match self.value_at(pos) {
                CellValue::Number(n) => format!("{n}"),
                CellValue::Text(s) => s,
                CellValue::Error(e) => e.token().to_string(),
            },
        }
    }

    /// Whether `from`'s precedent chain already reaches `target` — i.e.
    /// whether wiring `target` as a fresh precedent of `from` would close
    /// a cycle back through `target`.
    fn depends_on(&self, from: Position, target: Position) -> bool {
        let mut stack = vec![from];
        let mut visited = HashSet::new();
        while let Some(p) = stack.pop() {
            if p == target {
                return true;
            }
            if !visited.insert(p) {
                continue;
            }
            if let Some(cell) = self.cells.get(&p) {
                stack.extend(cell.precedents().iter().copied());
            }
        }
        false
    }

    fn invalidate_transitive(&self, start: Position) {
        let mut stack = vec![start];
        let mut visited = HashSet::new();
        while let Some(p) = stack.pop() {
            if !visited.insert(p) {
                continue;
            }
            if let Some(cell) = self.cells.get(&p) {
                cell.invalidate_cache();
                stack.extend(cell.dependents().iter().copied());
            }
        }
        log::trace!("invalidated {} cached value(s) downstream of {start}", visited.len());
    }

    fn is_interesting(pos: Position, cell: &Cell) -> bool {
        pos.is_valid() && (!cell.is_empty_content() || cell.is_referenced())
    }

    fn update_printable_size(&mut self, touched: Position) {
        let still_interesting = self
            .cells
            .get(&touched)
            .is_some_and(|c| Self::is_interesting(touched, c));

        if still_interesting {
            self.printable_rows = self.printable_rows.max(touched.row + 1);
            self.printable_cols = self.printable_cols.max(touched.col + 1);
            return;
        }

        // `touched` stopped being interesting. If it sat on the current
        // boundary, the bound may have shrunk — recompute exactly rather
        // than guess.
        if touched.row + 1 == self.printable_rows || touched.col + 1 == self.printable_cols {
            self.recompute_printable_size();
        }
    }

    fn recompute_printable_size(&mut self) {
        let mut rows = 0;
        let mut cols = 0;
        for (&pos, cell) in &self.cells {
            if Self::is_interesting(pos, cell) {
                rows = rows.max(pos.row + 1);
                cols = cols.max(pos.col + 1);
            }
        }
        self.printable_rows = rows;
        self.printable_cols = cols;
    }
}

impl SheetView for Sheet {
    fn value_at(&self, pos: Position) -> CellValue {
        Sheet::value_at(self, pos)
    }
}

fn build_content(text: &str) -> Result<(CellContent, Vec<Position>)> {
    if text.is_empty() {
        return Ok((CellContent::Empty, Vec::new()));
    }
    if let Some(body) = text.strip_prefix('=') {
        let ast = formula::parse(body)?;
        let referenced = formula::referenced_positions(&ast);
        Ok((
            CellContent::Formula {
                raw: format!("={}", formula::pretty_print(&ast)),
                ast,
            },
            referenced,
        ))
    } else {
        Ok((CellContent::Text(text.to_string()), Vec::new()))
    }
}

/// A single leading apostrophe escapes what would otherwise look like a
/// formula or be mangled by leading whitespace; it survives in
/// `literal_text`/`GetText` but is stripped from the value a reference or
/// a VALUES-mode print ever sees.
fn strip_escape(text: &str) -> &str {
    text.strip_prefix('\'').unwrap_or(text)
}
