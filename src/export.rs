// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::place::{PlacementReport, RowOutcome, RowReport};

#[derive(Debug, Serialize)]
pub struct PlacementCsvRecord {
    #[serde(rename = "Refdes")]
    pub refdes: String,
    #[serde(rename = "X (mm)")]
    pub x: f64,
    #[serde(rename = "Y (mm)")]
    pub y: f64,
    #[serde(rename = "Rotation")]
    pub rotation: f64,
    #[serde(rename = "Side")]
    pub side: String,
    #[serde(rename = "Flipped")]
    pub flipped: bool,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Reason")]
    pub reason: String,
}

/// Convert a RowReport to a PlacementCsvRecord
fn row_to_csv_record(report: &RowReport) -> PlacementCsvRecord {
    let (status, reason) = match report.outcome {
        RowOutcome::Applied => ("placed".to_string(), String::new()),
        RowOutcome::Skipped(reason) => ("skipped".to_string(), reason.to_string()),
    };
    PlacementCsvRecord {
        refdes: report.row.refdes.clone(),
        x: report.row.x,
        y: report.row.y,
        rotation: report.row.rotation,
        side: report.row.side.to_string(),
        flipped: report.flipped,
        status,
        reason,
    }
}

/// Export a placement report to a CSV file, one record per input row
pub fn export_report_to_csv<P: AsRef<Path>>(
    report: &PlacementReport,
    file_path: P,
) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    for row in &report.rows {
        writer.serialize(row_to_csv_record(row))?;
    }

    writer.flush()?;
    Ok(())
}
