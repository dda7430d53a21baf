//! A single cell: its content, its memoized value, and its place in the
//! dependency graph.

use std::cell::RefCell;
use std::collections::BTreeSet;

use formula::{Ast, CellValue, Position};

/// What a cell actually holds, before any evaluation.
#[derive(Clone, Debug)]
pub enum CellContent {
    Empty,
    Text(String),
    /// `raw` is the literal user-entered text, including the leading `=`.
    /// Kept verbatim so `Sheet::set_cell` can short-circuit on an
    /// unchanged literal input without re-parsing or touching the graph.
    Formula { raw: String, ast: Ast },
}

/// A cell: content plus the edges of the dependency graph it sits in.
///
/// Both directions live on the node (spec's design choice over a pair of
/// sheet-owned adjacency maps): `is_referenced` needs to read
/// `dependents` without borrowing the sheet, which matters once
/// `Cell::dependents` is walked recursively during cache invalidation.
#[derive(Clone, Debug)]
pub struct Cell {
    content: CellContent,
    cache: RefCell<Option<CellValue>>,
    /// Cells this cell's formula reads from.
    precedents: BTreeSet<Position>,
    /// Cells whose formula reads from this cell.
    dependents: BTreeSet<Position>,
}

impl Cell {
    pub fn empty() -> Self {
        Cell {
            content: CellContent::Empty,
            cache: RefCell::new(None),
            precedents: BTreeSet::new(),
            dependents: BTreeSet::new(),
        }
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn is_empty_content(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.content, CellContent::Formula { .. })
    }

    /// The literal text the user would see if they edited this cell again:
    /// empty string, the plain text verbatim (leading apostrophe escape
    /// included), or `=` followed by the canonical pretty-printed formula.
    pub fn literal_text(&self) -> &str {
        match &self.content {
            CellContent::Empty => "",
            CellContent::Text(s) => s,
            CellContent::Formula { raw, .. } => raw,
        }
    }

    pub fn precedents(&self) -> &BTreeSet<Position> {
        &self.precedents
    }

    pub fn dependents(&self) -> &BTreeSet<Position> {
        &self.dependents
    }

    pub fn dependents_mut(&mut self) -> &mut BTreeSet<Position> {
        &mut self.dependents
    }

    /// Whether any other cell reads from this one.
    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    pub fn cached_value(&self) -> Option<CellValue> {
        self.cache.borrow().clone()
    }

    pub fn set_cached_value(&self, value: CellValue) {
        *self.cache.borrow_mut() = Some(value);
    }

    pub fn invalidate_cache(&self) {
        *self.cache.borrow_mut() = None;
    }

    /// Replace this cell's content and precedent set, wiping its cache.
    /// Does not touch `dependents` — those belong to whoever references
    /// this cell and are rewired independently.
    pub(crate) fn set_content(&mut self, content: CellContent, precedents: BTreeSet<Position>) {
        self.content = content;
        self.precedents = precedents;
        self.cache = RefCell::new(None);
    }
}
