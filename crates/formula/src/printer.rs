//! Canonical pretty-printer. Produces a minimally-parenthesized rendering
//! such that `parse(pretty_print(parse(text))) == parse(text)` for any
//! formula body `text` that parses at all — printing is a fixed point once
//! applied once.

use crate::ast::{BinOp, Expr};

/// Binding power of atoms and unary minus, placed above the binary
/// operators' own `BinOp::precedence()` so they never need parens as a
/// left operand.
const ATOM_PRECEDENCE: u8 = 4;
const NEG_PRECEDENCE: u8 = 3;

pub fn pretty_print(expr: &Expr) -> String {
    render(expr, 0)
}

/// Render `expr`, wrapping it in parens if its own precedence is lower
/// than `min_precedence` (the precedence required by its parent context).
fn render(expr: &Expr, min_precedence: u8) -> String {
    let (text, own_precedence) = match expr {
        Expr::Number(n) => (format_number(n.value()), ATOM_PRECEDENCE),
        Expr::Ref(pos) => (pos.to_string(), ATOM_PRECEDENCE),
        Expr::Neg(inner) => (format!("-{}", render(inner, NEG_PRECEDENCE)), NEG_PRECEDENCE),
        Expr::BinOp(op, lhs, rhs) => {
            let prec = op.precedence();
            // Left operand keeps equal precedence unparenthesized (left
            // associativity); the right operand needs strictly higher
            // precedence, so `a-(b-c)` keeps its parens while `(a-b)-c`
            // sheds them.
            let left = render(lhs, prec);
            let right = render(rhs, prec + 1);
            (format!("{left}{}{right}", op.symbol()), prec)
        }
    };

    if own_precedence < min_precedence {
        format!("({text})")
    } else {
        text
    }
}

fn format_number(n: f64) -> String {
    format!("{n}")
}
