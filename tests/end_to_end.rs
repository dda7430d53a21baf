//! End-to-end scenarios exercising the sheet through its public API only.

use engine::{print_sheet, EngineError, FormulaError, PrintMode, Sheet};
use formula::{CellValue, Position};

fn pos(row: i64, col: i64) -> Position {
    Position::new(row, col)
}

#[test]
fn simple_arithmetic_chain() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "10").unwrap();
    sheet.set_cell(pos(0, 1), "=A1*2").unwrap();
    sheet.set_cell(pos(0, 2), "=A1+B1").unwrap();

    assert_eq!(sheet.value_at(pos(0, 1)), CellValue::Number(20.0));
    assert_eq!(sheet.value_at(pos(0, 2)), CellValue::Number(30.0));
}

#[test]
fn editing_a_precedent_propagates_transitively() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "1").unwrap();
    sheet.set_cell(pos(0, 1), "=A1+1").unwrap();
    sheet.set_cell(pos(0, 2), "=B1+1").unwrap();
    sheet.set_cell(pos(0, 3), "=C1+1").unwrap();

    assert_eq!(sheet.value_at(pos(0, 3)), CellValue::Number(4.0));

    sheet.set_cell(pos(0, 0), "100").unwrap();
    assert_eq!(sheet.value_at(pos(0, 3)), CellValue::Number(103.0));
}

#[test]
fn direct_and_indirect_cycles_are_rejected() {
    let mut sheet = Sheet::new();
    let err = sheet.set_cell(pos(0, 0), "=A1+1").unwrap_err();
    assert!(matches!(err, EngineError::CircularDependency(_)));

    sheet.set_cell(pos(1, 0), "=A2").unwrap();
    sheet.set_cell(pos(2, 0), "=A1").unwrap();
    let err = sheet.set_cell(pos(0, 0), "=A3").unwrap_err();
    assert!(matches!(err, EngineError::CircularDependency(_)));
}

#[test]
fn setting_a_formula_materializes_untouched_precedents_as_empty() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "=D10").unwrap();
    assert_eq!(sheet.value_at(pos(0, 0)), CellValue::Number(0.0));
    assert_eq!(sheet.text_at(pos(9, 3)), "");
}

#[test]
fn formula_errors_propagate_as_plain_values() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "hello").unwrap();
    sheet.set_cell(pos(0, 1), "=A1+1").unwrap();
    sheet.set_cell(pos(0, 2), "=B1*2").unwrap();

    assert_eq!(
        sheet.value_at(pos(0, 2)),
        CellValue::Error(FormulaError::Value)
    );
    // The error is a value, not a crash: downstream cells keep evaluating.
    sheet.set_cell(pos(0, 3), "=B1+C1").unwrap();
    assert_eq!(
        sheet.value_at(pos(0, 3)),
        CellValue::Error(FormulaError::Value)
    );
}

#[test]
fn printable_size_tracks_content_and_shrinks_on_clear() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "1").unwrap();
    sheet.set_cell(pos(4, 4), "=A1").unwrap();
    assert_eq!(sheet.printable_size(), (5, 5));

    sheet.clear_cell(pos(4, 4)).unwrap();
    assert_eq!(sheet.printable_size(), (1, 1));

    let rendered = print_sheet(&sheet, PrintMode::Values);
    assert_eq!(rendered, "1\n");
}

/// A rejected `set_cell` must leave the sheet in exactly the state it was
/// in before the attempt — not merely "functionally equivalent", but
/// structurally identical, down to the debug representation of every
/// cell. This is the strong exception-safety guarantee the transactional
/// edit protocol exists to provide.
#[test]
fn rejected_edit_leaves_the_sheet_byte_identical() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "1").unwrap();
    sheet.set_cell(pos(0, 1), "=A1+1").unwrap();
    sheet.set_cell(pos(0, 2), "=B1+1").unwrap();

    let snapshot_before = format!(
        "{:?}|{:?}|{:?}|{:?}",
        sheet.get_cell(pos(0, 0)).map(|c| c.literal_text().to_string()),
        sheet.get_cell(pos(0, 1)).map(|c| c.literal_text().to_string()),
        sheet.get_cell(pos(0, 2)).map(|c| c.literal_text().to_string()),
        sheet.printable_size(),
    );

    let err = sheet.set_cell(pos(0, 0), "=C1").unwrap_err();
    assert!(matches!(err, EngineError::CircularDependency(_)));

    let snapshot_after = format!(
        "{:?}|{:?}|{:?}|{:?}",
        sheet.get_cell(pos(0, 0)).map(|c| c.literal_text().to_string()),
        sheet.get_cell(pos(0, 1)).map(|c| c.literal_text().to_string()),
        sheet.get_cell(pos(0, 2)).map(|c| c.literal_text().to_string()),
        sheet.printable_size(),
    );

    assert_eq!(snapshot_before, snapshot_after);
}
