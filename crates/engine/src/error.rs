//! Error types for the engine crate.

use formula::{ParseError, Position};
use thiserror::Error;

/// Errors that can occur while editing a sheet.
///
/// Note what's absent: a formula that *evaluates* to `#REF!`/`#VALUE!`/
/// `#DIV/0!` is not an error here — those are ordinary cell values (see
/// `formula::FormulaError`). `EngineError` is reserved for edits the
/// sheet refuses to apply at all.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("position {0} is outside the sheet's bounds")]
    InvalidPosition(Position),

    #[error("formula does not parse: {0}")]
    Formula(#[from] ParseError),

    #[error("formula at {0} would create a circular dependency")]
    CircularDependency(Position),
}

pub type Result<T> = std::result::Result<T, EngineError>;
