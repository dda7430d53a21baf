//! Extraction of the positions a formula references.
//!
//! Returns raw left-to-right traversal order with no deduplication — the
//! same position may appear more than once if it is referenced more than
//! once. Collapsing adjacent duplicates is the caller's concern (the
//! engine deduplicates when it rewires dependency edges), not this one's.

use crate::ast::Expr;
use crate::position::Position;

pub fn referenced_positions(expr: &Expr) -> Vec<Position> {
    let mut out = Vec::new();
    walk(expr, &mut out);
    out
}

fn walk(expr: &Expr, out: &mut Vec<Position>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Ref(pos) => out.push(*pos),
        Expr::Neg(inner) => walk(inner, out),
        Expr::BinOp(_, lhs, rhs) => {
            walk(lhs, out);
            walk(rhs, out);
        }
    }
}
