//! Cell coordinates in spreadsheet ("A1") notation.
//!
//! Mirrors the teacher's `cell_ref.rs`: regex-based `A1` parsing plus
//! base-26 column letters. Generalized with an explicit validity bound
//! (the teacher's grid is unbounded) and a total order, needed here for
//! sorted precedent lists and the cycle-detection traversal.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Maximum row index (exclusive), matching the spec's own example bound.
pub const MAX_ROW: i64 = 16384;
/// Maximum column index (exclusive).
pub const MAX_COL: i64 = 16384;

static A1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").unwrap());

/// A (row, column) coordinate, zero-indexed internally.
///
/// `Position` does not enforce validity at construction time: a formula may
/// textually reference a position outside the configured bound, and that
/// reference must still round-trip through `referenced_positions` so the
/// evaluator can fold it to `#REF!`. Validity is a predicate, not an
/// invariant of the type.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub row: i64,
    pub col: i64,
}

impl Position {
    pub fn new(row: i64, col: i64) -> Position {
        Position { row, col }
    }

    /// True iff both coordinates lie within the configured grid bounds.
    pub fn is_valid(&self) -> bool {
        self.row >= 0 && self.row < MAX_ROW && self.col >= 0 && self.col < MAX_COL
    }

    /// Parse spreadsheet notation ("A1", "AA10"). Returns `None` on malformed
    /// input; out-of-bound but well-formed references parse successfully
    /// (`is_valid` is a separate check — see spec §9's note on the source's
    /// inconsistency here, resolved by always parsing and letting validity
    /// be checked downstream).
    pub fn parse(text: &str) -> Option<Position> {
        let caps = A1_RE.captures(text)?;
        let letters = &caps[1];
        let digits = &caps[2];

        let col = letters
            .to_ascii_uppercase()
            .bytes()
            .fold(0i64, |acc, c| acc * 26 + (c - b'A') as i64 + 1)
            - 1;
        let row = digits.parse::<i64>().ok()?.checked_sub(1)?;

        Some(Position::new(row, col))
    }

    /// Column index to spreadsheet letters (0 -> "A", 25 -> "Z", 26 -> "AA").
    pub fn col_to_letters(col: i64) -> String {
        let mut result = String::new();
        let mut n = col + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}
