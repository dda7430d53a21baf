//! Evaluation of a parsed formula against an evaluation context.
//!
//! The context is supplied by the caller as a [`SheetView`] so that this
//! crate never needs to know what a sheet, a cell, or a dependency graph
//! is — it only needs "what value sits at this position".

use crate::ast::{BinOp, Expr};
use crate::error::FormulaError;
use crate::position::Position;

/// The value an evaluation context reports for a given position.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

/// Evaluation context: "what is the value at this position, right now".
///
/// Implementors decide what an empty cell reports (typically `Number(0.0)`,
/// spreadsheet convention) — this crate takes no position on storage.
pub trait SheetView {
    fn value_at(&self, pos: Position) -> CellValue;
}

/// Evaluate `expr` to a final value, folding any errors encountered in
/// sub-expressions by fold precedence (`Ref` beats `Value` beats `Div0`,
/// see [`FormulaError`]'s `Ord`).
pub fn execute(expr: &Expr, view: &dyn SheetView) -> CellValue {
    match evaluate(expr, view) {
        Ok(n) => CellValue::Number(n),
        Err(e) => CellValue::Error(e),
    }
}

fn evaluate(expr: &Expr, view: &dyn SheetView) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(n.value()),
        Expr::Ref(pos) => resolve(*pos, view),
        Expr::Neg(inner) => evaluate(inner, view).map(|n| -n),
        Expr::BinOp(op, lhs, rhs) => {
            let left = evaluate(lhs, view);
            let right = evaluate(rhs, view);
            match (left, right) {
                (Ok(a), Ok(b)) => apply(*op, a, b),
                (Err(a), Err(b)) => Err(a.min(b)),
                (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            }
        }
    }
}

fn resolve(pos: Position, view: &dyn SheetView) -> Result<f64, FormulaError> {
    if !pos.is_valid() {
        return Err(FormulaError::Ref);
    }
    match view.value_at(pos) {
        CellValue::Number(n) => Ok(n),
        CellValue::Text(text) => text.trim().parse::<f64>().map_err(|_| FormulaError::Value),
        CellValue::Error(e) => Err(e),
    }
}

fn apply(op: BinOp, a: f64, b: f64) -> Result<f64, FormulaError> {
    let result = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
    };
    if result.is_finite() {
        Ok(result)
    } else {
        Err(FormulaError::Div0)
    }
}
