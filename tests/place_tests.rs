// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use kicad_parts_placer::board::{from_mm, BACK_COPPER, FRONT_COPPER};
use kicad_parts_placer::place::{NegativeCoordinates, RowOutcome, SkipReason};
use kicad_parts_placer::{
    group_parts, mirror_parts, place, Board, ComponentRow, Error, MemoryBoard, MemoryFootprint,
    PlaceOptions, Side, ValidatedTable, Vec2I,
};

fn create_test_row(refdes: &str, x: f64, y: f64, rotation: f64, side: Side) -> ComponentRow {
    ComponentRow {
        refdes: refdes.to_string(),
        x,
        y,
        rotation,
        side,
    }
}

fn create_test_board() -> MemoryBoard {
    MemoryBoard::new()
        .with_footprint(MemoryFootprint::new("C1", FRONT_COPPER))
        .with_footprint(MemoryFootprint::new("R1", BACK_COPPER).at(Vec2I::from_mm(3.0, 4.0)))
        .with_footprint(MemoryFootprint::new("U1", FRONT_COPPER))
}

#[test]
fn test_place_single_part() {
    let mut board = create_test_board();
    let row = create_test_row("C1", 10.0, 5.0, 90.0, Side::Bottom);
    let table = ValidatedTable::from_rows(vec![row]);

    let report = place(&mut board, &table, &PlaceOptions::default()).unwrap();

    let c1 = board.footprint("C1").unwrap();
    assert_eq!(c1.position, Vec2I::new(from_mm(10.0), from_mm(-5.0)));
    assert_eq!(c1.position, Vec2I::new(10_000_000, -5_000_000));
    assert_eq!(c1.orientation, 90.0);
    assert_eq!(c1.layer, BACK_COPPER);
    assert_eq!(c1.flips, 1);

    assert_eq!(report.applied_count(), 1);
    assert!(report.rows[0].flipped);
}

#[test]
fn test_empty_table_leaves_board_unchanged() {
    let mut board = create_test_board();
    let before = board.clone();

    let report = place(&mut board, &ValidatedTable::default(), &PlaceOptions::default()).unwrap();

    assert!(report.rows.is_empty());
    assert_eq!(board, before);
}

#[test]
fn test_flip_only_when_side_differs() {
    let mut board = create_test_board();
    let table = ValidatedTable::from_rows(vec![
        create_test_row("C1", 0.0, 0.0, 0.0, Side::Top),
        create_test_row("R1", 0.0, 0.0, 0.0, Side::Bottom),
        create_test_row("U1", 0.0, 0.0, 0.0, Side::Current),
    ]);

    place(&mut board, &table, &PlaceOptions::default()).unwrap();

    for refdes in ["C1", "R1", "U1"] {
        assert_eq!(board.footprint(refdes).unwrap().flips, 0, "{refdes}");
    }
    assert_eq!(board.footprint("R1").unwrap().layer, BACK_COPPER);
}

#[test]
fn test_rotation_is_absolute_after_flip() {
    let mut board = create_test_board();
    board.footprints[0].orientation = 30.0;
    let row = create_test_row("C1", 1.0, 1.0, 45.0, Side::Bottom);
    let table = ValidatedTable::from_rows(vec![row]);

    place(&mut board, &table, &PlaceOptions::default()).unwrap();

    // Flip changes the orientation; the move pass then overwrites it
    assert_eq!(board.footprint("C1").unwrap().orientation, 45.0);
}

#[test]
fn test_missing_part_is_skipped() {
    let mut board = create_test_board();
    let table = ValidatedTable::from_rows(vec![
        create_test_row("C99", 1.0, 1.0, 0.0, Side::Top),
        create_test_row("U1", 2.0, 3.0, 180.0, Side::Current),
    ]);

    let report = place(&mut board, &table, &PlaceOptions::default()).unwrap();

    assert_eq!(report.rows[0].outcome, RowOutcome::Skipped(SkipReason::NotFound));
    assert_eq!(report.rows[1].outcome, RowOutcome::Applied);
    assert_eq!(
        board.footprint("U1").unwrap().position,
        Vec2I::from_mm(2.0, -3.0)
    );
    assert_eq!(report.skipped().collect::<Vec<_>>(), vec![("C99", SkipReason::NotFound)]);
}

#[test]
fn test_locked_part_is_untouched() {
    let mut board = MemoryBoard::new()
        .with_footprint(MemoryFootprint::new("J1", FRONT_COPPER).locked().at(Vec2I::new(7, 8)));
    let before = board.clone();
    let row = create_test_row("J1", 5.0, 5.0, 90.0, Side::Bottom);
    let table = ValidatedTable::from_rows(vec![row]);

    let report = place(&mut board, &table, &PlaceOptions::default()).unwrap();

    assert_eq!(board, before);
    assert_eq!(report.rows[0].outcome, RowOutcome::Skipped(SkipReason::Locked));
    assert!(!report.rows[0].flipped);
}

#[test]
fn test_origin_offset() {
    let mut board = create_test_board();
    let row = create_test_row("C1", 10.0, 5.0, 0.0, Side::Current);
    let table = ValidatedTable::from_rows(vec![row]);
    let options = PlaceOptions::with_origin((100.0, 50.0));

    place(&mut board, &table, &options).unwrap();

    assert_eq!(
        board.footprint("C1").unwrap().position,
        Vec2I::from_mm(110.0, 45.0)
    );
}

#[test]
fn test_mirror_parts_matches_negated_placement() {
    let rows = vec![
        create_test_row("C1", 10.0, 5.0, 90.0, Side::Bottom),
        create_test_row("R1", -3.5, 2.0, 0.0, Side::Top),
    ];
    let table = ValidatedTable::from_rows(rows.clone());
    let negated = ValidatedTable::from_rows(
        rows.into_iter()
            .map(|row| ComponentRow { x: -row.x, ..row })
            .collect(),
    );

    let mut mirrored_board = create_test_board();
    let mut placed_board = create_test_board();
    mirror_parts(&mut mirrored_board, &table, &PlaceOptions::default()).unwrap();
    place(&mut placed_board, &negated, &PlaceOptions::default()).unwrap();

    assert_eq!(mirrored_board, placed_board);
    assert_eq!(
        mirrored_board.footprint("C1").unwrap().position,
        Vec2I::from_mm(-10.0, -5.0)
    );
}

#[test]
fn test_reject_negative_coordinates_before_editing() {
    let mut board = create_test_board();
    let before = board.clone();
    let table = ValidatedTable::from_rows(vec![
        create_test_row("U1", 10.0, -10.0, 0.0, Side::Bottom),
        create_test_row("C1", 10.0, 5.0, 0.0, Side::Bottom),
    ]);
    let options = PlaceOptions {
        negative_coordinates: NegativeCoordinates::Reject,
        ..PlaceOptions::default()
    };

    match place(&mut board, &table, &options) {
        Err(Error::NegativeCoordinate { refdes, .. }) => assert_eq!(refdes, "C1"),
        other => panic!("expected negative coordinate error, got {other:?}"),
    }
    assert_eq!(board, before);
}

#[test]
fn test_group_parts() {
    let mut board = create_test_board();
    let table = ValidatedTable::from_rows(vec![
        create_test_row("C1", 0.0, 0.0, 0.0, Side::Current),
        create_test_row("R1", 0.0, 0.0, 0.0, Side::Current),
        create_test_row("X9", 0.0, 0.0, 0.0, Side::Current),
    ]);

    let added = group_parts(&mut board, &table, "panel");

    assert_eq!(added, Some(2));
    assert_eq!(board.group_count(), 1);
    assert_eq!(board.groups[0].name, "panel");
    assert_eq!(board.groups[0].members, vec!["C1", "R1"]);
}

#[test]
fn test_group_parts_empty_table() {
    let mut board = create_test_board();

    assert_eq!(group_parts(&mut board, &ValidatedTable::default(), "panel"), None);
    assert_eq!(board.group_count(), 0);
}
