// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Input validation for normalized tables

use serde::Serialize;

use crate::error::{Error, Result};
use crate::normalize::{Side, CANONICAL_FIELDS, REFDES, ROTATION, SIDE, X, Y};
use crate::table::{Cell, Table};

/// Outcome of validating a table. Valid iff there are no errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a normalized table.
///
/// Missing canonical columns produce one message each and stop there. Otherwise
/// every row is checked and each invalid row contributes one message.
pub fn validate(table: &Table) -> ValidationReport {
    let missing: Vec<String> = CANONICAL_FIELDS
        .iter()
        .filter(|field| !table.has_column(field))
        .map(|field| format!("Missing field: {field}"))
        .collect();
    if !missing.is_empty() {
        return ValidationReport { errors: missing };
    }

    let errors = (0..table.len())
        .filter_map(|row| {
            let problems = row_problems(table, row);
            if problems.is_empty() {
                None
            } else {
                Some(format!(
                    "Row {row}: {} ({})",
                    table.describe_row(row),
                    problems.join(", ")
                ))
            }
        })
        .collect();

    ValidationReport { errors }
}

/// `nan`, `inf` and overflowing literals parse as floats but cannot be placed
fn is_non_finite(cell: &Cell) -> bool {
    match cell {
        Cell::Number(value) => !value.is_finite(),
        Cell::Text(text) => text.trim().parse::<f64>().is_ok_and(|v| !v.is_finite()),
        Cell::Empty => false,
    }
}

fn row_problems(table: &Table, row: usize) -> Vec<String> {
    let mut problems = Vec::new();

    for field in [ROTATION, X, Y] {
        let cell = table.cell(row, field);
        if cell.and_then(Cell::as_f64).is_some() {
            continue;
        }
        if cell.is_some_and(is_non_finite) {
            problems.push(format!("{field} is not a finite number"));
        } else {
            problems.push(format!("{field} is not numeric"));
        }
    }

    let side = table.cell(row, SIDE).and_then(Cell::as_text);
    if side.and_then(Side::parse).is_none() {
        problems.push(format!("{SIDE} is not one of top, bottom, current"));
    }

    let refdes = table.cell(row, REFDES).and_then(Cell::as_text);
    if refdes.is_none_or(|text| text.trim().is_empty()) {
        problems.push(format!("{REFDES} is empty"));
    }

    problems
}

/// One normalized, validated component record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRow {
    pub refdes: String,
    /// Millimetres, cartesian (Y up)
    pub x: f64,
    pub y: f64,
    /// Absolute orientation in degrees
    pub rotation: f64,
    pub side: Side,
}

/// Rows that passed `validate`, in table order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedTable {
    rows: Vec<ComponentRow>,
}

impl ValidatedTable {
    /// Validate a normalized table and extract typed rows.
    ///
    /// # Errors
    /// `Error::Validation` carrying every message from `validate`.
    pub fn new(table: &Table) -> Result<Self> {
        let report = validate(table);
        if !report.is_valid() {
            return Err(Error::Validation(report.errors));
        }

        let rows = (0..table.len())
            .filter_map(|row| {
                Some(ComponentRow {
                    refdes: table.cell(row, REFDES)?.as_text()?.to_string(),
                    x: table.cell(row, X)?.as_f64()?,
                    y: table.cell(row, Y)?.as_f64()?,
                    rotation: table.cell(row, ROTATION)?.as_f64()?,
                    side: Side::parse(table.cell(row, SIDE)?.as_text()?)?,
                })
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<ComponentRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ComponentRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of the table with every `x` negated
    pub fn mirrored(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| ComponentRow {
                x: -row.x,
                ..row.clone()
            })
            .collect();
        Self { rows }
    }
}

impl TryFrom<&Table> for ValidatedTable {
    type Error = Error;

    fn try_from(table: &Table) -> Result<Self> {
        Self::new(table)
    }
}
