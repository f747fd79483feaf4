// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use kicad_parts_placer::board::{BACK_COPPER, FRONT_COPPER};
use kicad_parts_placer::export::export_report_to_csv;
use kicad_parts_placer::{
    place, ComponentRow, MemoryBoard, MemoryFootprint, PlaceOptions, Side, ValidatedTable,
};
use std::fs;

fn create_test_row(refdes: &str, x: f64, y: f64, rotation: f64, side: Side) -> ComponentRow {
    ComponentRow {
        refdes: refdes.to_string(),
        x,
        y,
        rotation,
        side,
    }
}

#[test]
fn test_report_csv() {
    let mut board = MemoryBoard::new()
        .with_footprint(MemoryFootprint::new("C1", FRONT_COPPER))
        .with_footprint(MemoryFootprint::new("J1", BACK_COPPER).locked());
    let table = ValidatedTable::from_rows(vec![
        create_test_row("C1", 10.0, -5.5, 90.0, Side::Bottom),
        create_test_row("J1", 1.0, 1.0, 0.0, Side::Top),
        create_test_row("U7", 2.0, 2.0, 0.0, Side::Current),
    ]);
    let report = place(&mut board, &table, &PlaceOptions::default()).unwrap();

    let temp_file = std::env::temp_dir().join("kicad_parts_placer_report.csv");
    export_report_to_csv(&report, &temp_file).unwrap();

    let content = fs::read_to_string(&temp_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(
        lines[0],
        "Refdes,X (mm),Y (mm),Rotation,Side,Flipped,Status,Reason"
    );
    assert_eq!(lines[1], "C1,10.0,-5.5,90.0,bottom,true,placed,");
    assert_eq!(lines[2], "J1,1.0,1.0,0.0,top,false,skipped,footprint locked");
    assert_eq!(lines[3], "U7,2.0,2.0,0.0,current,false,skipped,not found on board");
    assert_eq!(lines.len(), 4);

    fs::remove_file(&temp_file).unwrap();
}

#[test]
fn test_report_csv_empty() {
    let mut board = MemoryBoard::new();
    let report = place(&mut board, &ValidatedTable::default(), &PlaceOptions::default()).unwrap();

    let temp_file = std::env::temp_dir().join("kicad_parts_placer_report_empty.csv");
    export_report_to_csv(&report, &temp_file).unwrap();

    let content = fs::read_to_string(&temp_file).unwrap();
    assert!(content.is_empty());

    fs::remove_file(&temp_file).unwrap();
}
