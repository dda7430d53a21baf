//! Recursive-descent parser over the token stream produced by [`crate::lexer`].
//!
//! Grammar (lowest to highest precedence):
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := '-' unary | atom
//! atom   := number | ref | '(' expr ')'
//! ```

use crate::ast::{BinOp, Expr, NumLit};
use crate::lexer::{self, LexError, Token};

#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("unexpected token: {0:?}")]
    UnexpectedToken(Token),
    #[error("trailing tokens after a complete expression")]
    TrailingTokens,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.advance().ok_or(ParseError::UnexpectedEnd)? {
            Token::Number(n) => Ok(Expr::Number(NumLit(n))),
            Token::Ref(pos) => Ok(Expr::Ref(pos)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(ParseError::UnexpectedToken(other)),
                    None => Err(ParseError::UnexpectedEnd),
                }
            }
            other => Err(ParseError::UnexpectedToken(other)),
        }
    }
}

/// Parse a formula body (the text after the leading `=`) into an [`Expr`].
pub fn parse(body: &str) -> Result<Expr, ParseError> {
    let tokens = lexer::tokenize(body)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(ParseError::TrailingTokens);
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn parses_precedence_correctly() {
        // 1+2*3 should be Add(1, Mul(2, 3)), not Mul(Add(1,2), 3)
        let ast = parse("1+2*3").unwrap();
        match ast {
            Expr::BinOp(BinOp::Add, lhs, rhs) => {
                assert_eq!(*lhs, Expr::Number(NumLit(1.0)));
                assert_eq!(*rhs, Expr::BinOp(BinOp::Mul, Box::new(Expr::Number(NumLit(2.0))), Box::new(Expr::Number(NumLit(3.0)))));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn parens_override_precedence() {
        let ast = parse("(1+2)*3").unwrap();
        assert_eq!(
            ast,
            Expr::BinOp(
                BinOp::Mul,
                Box::new(Expr::BinOp(BinOp::Add, Box::new(Expr::Number(NumLit(1.0))), Box::new(Expr::Number(NumLit(2.0))))),
                Box::new(Expr::Number(NumLit(3.0))),
            )
        );
    }

    #[test]
    fn unary_minus_binds_tighter_than_multiplication() {
        let ast = parse("-2*3").unwrap();
        assert_eq!(
            ast,
            Expr::BinOp(
                BinOp::Mul,
                Box::new(Expr::Neg(Box::new(Expr::Number(NumLit(2.0))))),
                Box::new(Expr::Number(NumLit(3.0))),
            )
        );
    }

    #[test]
    fn parses_cell_references() {
        let ast = parse("A1+B2").unwrap();
        assert_eq!(
            ast,
            Expr::BinOp(
                BinOp::Add,
                Box::new(Expr::Ref(Position::new(0, 0))),
                Box::new(Expr::Ref(Position::new(1, 1))),
            )
        );
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert!(parse("(1+2").is_err());
        assert!(parse("1+2)").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("1 2").is_err());
    }

    #[test]
    fn rejects_empty_body() {
        assert!(matches!(parse(""), Err(ParseError::UnexpectedEnd)));
    }
}
