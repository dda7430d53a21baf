//! Tabular rendering of a sheet's printable area, in TEXT mode (literal
//! cell input) or VALUES mode (evaluated display value).

use std::fmt::Write;

use formula::Position;

use crate::sheet::Sheet;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrintMode {
    Text,
    Values,
}

/// Render the sheet's printable rectangle as a tab-separated grid, one
/// row per line. An empty sheet renders as an empty string.
pub fn print_sheet(sheet: &Sheet, mode: PrintMode) -> String {
    let (rows, cols) = sheet.printable_size();
    let mut out = String::new();

    for row in 0..rows {
        for col in 0..cols {
            if col > 0 {
                out.push('\t');
            }
            let pos = Position::new(row, col);
            let cell_text = match mode {
                PrintMode::Text => sheet.text_at(pos),
                PrintMode::Values => sheet.display_value(pos),
            };
            write!(out, "{cell_text}").expect("writing to a String cannot fail");
        }
        out.push('\n');
    }

    out
}
