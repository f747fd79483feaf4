// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use kicad_parts_placer::{normalize_table, validate, Cell, Error, Side, Table, ValidatedTable};

fn create_test_table(headers: &[&str], rows: Vec<Vec<Cell>>) -> Table {
    Table::from_rows(headers.iter().map(|h| h.to_string()).collect(), rows)
}

fn valid_table() -> Table {
    normalize_table(create_test_table(
        &["refdes", "x", "y", "rotation", "side"],
        vec![
            vec![
                "C1".into(),
                10.0.into(),
                5.0.into(),
                90.0.into(),
                "top".into(),
            ],
            vec![
                "R1".into(),
                "2.5".into(),
                "-1".into(),
                0.0.into(),
                "bottom".into(),
            ],
        ],
    ))
}

#[test]
fn test_valid_table() {
    let report = validate(&valid_table());
    assert!(report.is_valid(), "{:?}", report.errors);
}

#[test]
fn test_missing_fields_reported_without_row_checks() {
    let table = create_test_table(
        &["refdes", "rotation", "side"],
        vec![vec![Cell::Empty, "abc".into(), "top".into()]],
    );

    let report = validate(&table);

    assert_eq!(
        report.errors,
        vec!["Missing field: x".to_string(), "Missing field: y".to_string()]
    );
}

#[test]
fn test_invalid_rows_reported_one_message_each() {
    let table = create_test_table(
        &["refdes", "x", "y", "rotation", "side"],
        vec![
            vec!["C1".into(), 1.0.into(), 1.0.into(), 0.0.into(), "top".into()],
            vec!["C2".into(), "abc".into(), 1.0.into(), 0.0.into(), "top".into()],
            vec![Cell::Empty, 1.0.into(), 1.0.into(), 0.0.into(), "top".into()],
            vec!["C4".into(), 1.0.into(), 1.0.into(), 0.0.into(), "sideways".into()],
        ],
    );

    let report = validate(&table);

    assert!(!report.is_valid());
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors[0].starts_with("Row 1:"));
    assert!(report.errors[0].contains("x is not numeric"));
    assert!(report.errors[1].starts_with("Row 2:"));
    assert!(report.errors[1].contains("refdes is empty"));
    assert!(report.errors[2].starts_with("Row 3:"));
    assert!(report.errors[2].contains("sideways"));
}

#[test]
fn test_column_order_does_not_matter() {
    let table = create_test_table(
        &["side", "rotation", "y", "x", "refdes"],
        vec![vec![
            "top".into(),
            45.0.into(),
            3.0.into(),
            4.0.into(),
            "U1".into(),
        ]],
    );

    let validated = ValidatedTable::try_from(&table).unwrap();
    let row = &validated.rows()[0];

    assert_eq!(row.refdes, "U1");
    assert_eq!(row.x, 4.0);
    assert_eq!(row.y, 3.0);
    assert_eq!(row.rotation, 45.0);
    assert_eq!(row.side, Side::Top);
}

#[test]
fn test_validated_table_parses_numeric_text() {
    let validated = ValidatedTable::new(&valid_table()).unwrap();

    assert_eq!(validated.len(), 2);
    assert_eq!(validated.rows()[1].x, 2.5);
    assert_eq!(validated.rows()[1].y, -1.0);
    assert_eq!(validated.rows()[1].side, Side::Bottom);
}

#[test]
fn test_validated_table_rejects_invalid() {
    let table = create_test_table(
        &["refdes", "x", "y", "rotation", "side"],
        vec![vec!["C1".into(), "n/a".into(), 1.0.into(), 0.0.into(), "top".into()]],
    );

    match ValidatedTable::new(&table) {
        Err(Error::Validation(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_empty_table_is_valid() {
    let table = normalize_table(create_test_table(&["refdes", "x", "y"], Vec::new()));

    let validated = ValidatedTable::new(&table).unwrap();

    assert!(validated.is_empty());
}

#[test]
fn test_mirrored_negates_x_only() {
    let validated = ValidatedTable::new(&valid_table()).unwrap();
    let mirrored = validated.mirrored();

    for (original, flipped) in validated.rows().iter().zip(mirrored.rows()) {
        assert_eq!(flipped.x, -original.x);
        assert_eq!(flipped.y, original.y);
        assert_eq!(flipped.rotation, original.rotation);
        assert_eq!(flipped.side, original.side);
    }
}

#[test]
fn test_non_finite_numbers_rejected() {
    let table = normalize_table(create_test_table(
        &["ref", "x", "y", "rot"],
        vec![
            vec!["C1".into(), "nan".into(), "inf".into(), 0.0.into()],
            vec!["C2".into(), 1.0.into(), 1.0.into(), "-inf".into()],
            vec!["C3".into(), Cell::Number(f64::NAN), "1e400".into(), 0.0.into()],
        ],
    ));

    let report = validate(&table);

    assert_eq!(report.errors.len(), 3);
    assert!(report.errors[0].contains("x is not a finite number"));
    assert!(report.errors[0].contains("y is not a finite number"));
    assert!(report.errors[1].contains("rotation is not a finite number"));
    assert!(report.errors[2].contains("x is not a finite number"));
    assert!(report.errors[2].contains("y is not a finite number"));
    assert!(ValidatedTable::new(&table).is_err());
}

#[test]
fn test_row_order_does_not_change_verdicts() {
    let good: Vec<Cell> = vec!["C1".into(), 1.0.into(), 1.0.into(), 0.0.into(), "top".into()];
    let bad: Vec<Cell> = vec!["C2".into(), "abc".into(), 1.0.into(), 0.0.into(), "top".into()];
    let headers = ["refdes", "x", "y", "rotation", "side"];

    let forward = validate(&create_test_table(&headers, vec![good.clone(), bad.clone()]));
    let swapped = validate(&create_test_table(&headers, vec![bad, good]));

    assert_eq!(forward.is_valid(), swapped.is_valid());
    assert_eq!(forward.errors.len(), 1);
    assert_eq!(swapped.errors.len(), 1);
    // Same message, only the row index moves
    assert_eq!(
        forward.errors[0].strip_prefix("Row 1:"),
        swapped.errors[0].strip_prefix("Row 0:")
    );
    assert!(forward.errors[0].strip_prefix("Row 1:").is_some());
}
