// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use thiserror::Error;

/// Errors raised while reading inputs, validating them or editing a board.
///
/// Board-state problems (unknown reference designator, locked footprint) are
/// not errors: they are reported per row by the placement step.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// File extension not handled by any reader
    #[error("Extension {extension} unsupported")]
    UnsupportedExtension { extension: String },

    /// Spreadsheet has no sheet, or no header row
    #[error("Spreadsheet '{path}' contains no data")]
    EmptySpreadsheet { path: String },

    /// One message per missing field or invalid row
    #[error("Input validation failed with {} error(s)", .0.len())]
    Validation(Vec<String>),

    #[error("Failed to parse board: {0}")]
    BoardParse(String),

    #[error("{refdes} would be placed at negative coordinates ({x}, {y})")]
    NegativeCoordinate { refdes: String, x: i64, y: i64 },
}

pub type Result<T> = std::result::Result<T, Error>;
