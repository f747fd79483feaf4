// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! KiCad Parts Placer Library
//!
//! Moves, rotates and flips footprints on a KiCad board from coordinates
//! given in a spreadsheet. The pipeline is: read a table, normalize its
//! headers, validate the rows, then place them on a board.

pub mod board;
pub mod error;
pub mod export;
pub mod kicad;
pub mod normalize;
pub mod place;
pub mod table;
pub mod validate;

// Re-export commonly used types
pub use board::{Board, Footprint, MemoryBoard, MemoryFootprint, Vec2I};
pub use error::{Error, Result};
pub use kicad::KicadBoard;
pub use normalize::{normalize_table, Side};
pub use place::{group_parts, mirror_parts, place, PlaceOptions, PlacementReport};
pub use table::reader::SpreadsheetReader;
pub use table::{Cell, Table};
pub use validate::{validate, ComponentRow, ValidatedTable, ValidationReport};
