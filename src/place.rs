// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Placement transformer
//!
//! Turns validated millimetre rows into native-unit placement commands and
//! applies them to a board in two passes: every side flip first, then every
//! rotation and position write. Unknown or locked footprints are skipped per
//! row; the rest of the table is still placed.

use serde::Serialize;
use std::fmt;

use crate::board::{from_mm, Board, Footprint, Vec2I};
use crate::error::{Error, Result};
use crate::normalize::Side;
use crate::validate::{ComponentRow, ValidatedTable};

/// What to do with commands that land on negative native coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum NegativeCoordinates {
    #[default]
    Allow,
    /// Fail before touching the board
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaceOptions {
    /// Reference point in millimetres, added to every row
    pub origin_mm: (f64, f64),
    pub negative_coordinates: NegativeCoordinates,
}

impl PlaceOptions {
    pub fn with_origin(origin_mm: (f64, f64)) -> Self {
        Self {
            origin_mm,
            ..Self::default()
        }
    }
}

/// One row converted to board units, ready to apply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementCommand {
    pub refdes: String,
    pub position: Vec2I,
    pub rotation: f64,
    pub side: Side,
}

impl PlacementCommand {
    /// Cartesian millimetres (Y up) to board units (Y down), shifted by `origin_mm`
    pub fn from_row(row: &ComponentRow, origin_mm: (f64, f64)) -> Self {
        let x = from_mm(row.x + origin_mm.0);
        let y = from_mm(-row.y + origin_mm.1);
        Self {
            refdes: row.refdes.clone(),
            position: Vec2I::new(x, y),
            rotation: row.rotation,
            side: row.side,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    NotFound,
    Locked,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "not found on board"),
            SkipReason::Locked => write!(f, "footprint locked"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowOutcome {
    Applied,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    pub row: ComponentRow,
    pub command: PlacementCommand,
    pub flipped: bool,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlacementReport {
    pub rows: Vec<RowReport>,
}

impl PlacementReport {
    pub fn applied_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.outcome == RowOutcome::Applied)
            .count()
    }

    /// `(refdes, reason)` for every skipped row
    pub fn skipped(&self) -> impl Iterator<Item = (&str, SkipReason)> {
        self.rows.iter().filter_map(|row| match row.outcome {
            RowOutcome::Skipped(reason) => Some((row.row.refdes.as_str(), reason)),
            RowOutcome::Applied => None,
        })
    }
}

/// Find a footprint that may be edited, logging why not otherwise
fn editable_footprint<'a, B: Board>(
    board: &'a mut B,
    refdes: &str,
) -> std::result::Result<&'a mut B::Footprint, SkipReason> {
    let Some(footprint) = board.find_footprint_by_reference_mut(refdes) else {
        log::warn!("{refdes} not found");
        return Err(SkipReason::NotFound);
    };
    log::debug!("{refdes} found");

    if footprint.is_locked() {
        log::info!("{refdes} locked, skip");
        return Err(SkipReason::Locked);
    }
    Ok(footprint)
}

/// Put a footprint on the requested side. Returns whether a flip happened.
pub fn flip_footprint<B: Board>(
    board: &mut B,
    refdes: &str,
    side: Side,
) -> std::result::Result<bool, SkipReason> {
    let footprint = editable_footprint(board, refdes)?;

    let needs_flip = match side {
        Side::Top => !footprint.is_on_front(),
        Side::Bottom => !footprint.is_on_back(),
        Side::Current => false,
    };
    if needs_flip {
        log::debug!("{refdes}: flip from {} to {side}", footprint.layer_name());
        footprint.flip_left_right();
    }
    Ok(needs_flip)
}

/// Set absolute rotation, then position
pub fn move_footprint<B: Board>(
    board: &mut B,
    command: &PlacementCommand,
) -> std::result::Result<(), SkipReason> {
    let refdes = command.refdes.as_str();
    let footprint = editable_footprint(board, refdes)?;

    log::debug!(
        "{refdes}: move from {:?} to {:?}",
        footprint.center(),
        command.position
    );
    footprint.set_orientation_degrees(command.rotation);
    footprint.set_position(command.position);
    log::debug!(
        "{refdes}: rotate {} about {:?}",
        command.rotation,
        command.position
    );
    Ok(())
}

fn check_negative(commands: &[PlacementCommand]) -> Result<()> {
    match commands
        .iter()
        .find(|command| command.position.x < 0 || command.position.y < 0)
    {
        Some(command) => Err(Error::NegativeCoordinate {
            refdes: command.refdes.clone(),
            x: command.position.x,
            y: command.position.y,
        }),
        None => Ok(()),
    }
}

/// Place every row of `table` on `board`.
///
/// # Errors
/// `Error::NegativeCoordinate` when `options` reject negative positions and a
/// row lands on one; the board is not modified in that case.
pub fn place<B: Board>(
    board: &mut B,
    table: &ValidatedTable,
    options: &PlaceOptions,
) -> Result<PlacementReport> {
    if table.is_empty() {
        return Ok(PlacementReport::default());
    }

    let commands: Vec<PlacementCommand> = table
        .rows()
        .iter()
        .map(|row| PlacementCommand::from_row(row, options.origin_mm))
        .collect();

    if options.negative_coordinates == NegativeCoordinates::Reject {
        check_negative(&commands)?;
    }

    let flips: Vec<std::result::Result<bool, SkipReason>> = commands
        .iter()
        .map(|command| flip_footprint(board, &command.refdes, command.side))
        .collect();

    let rows = table
        .rows()
        .iter()
        .zip(commands)
        .zip(flips)
        .map(|((row, command), flip)| {
            let outcome = match move_footprint(board, &command) {
                Ok(()) => RowOutcome::Applied,
                Err(reason) => RowOutcome::Skipped(reason),
            };
            RowReport {
                row: row.clone(),
                command,
                flipped: flip.unwrap_or(false),
                outcome,
            }
        })
        .collect();

    let report = PlacementReport { rows };
    log::info!(
        "Placed {} of {} parts",
        report.applied_count(),
        report.rows.len()
    );
    Ok(report)
}

/// Collect every footprint of `table` present on `board` into a group named
/// `group_name`. Returns the member count, or `None` when the table is empty
/// and no group was created.
pub fn group_parts<B: Board>(
    board: &mut B,
    table: &ValidatedTable,
    group_name: &str,
) -> Option<usize> {
    if table.is_empty() {
        return None;
    }

    let references: Vec<&str> = table
        .rows()
        .iter()
        .map(|row| row.refdes.as_str())
        .filter(|refdes| {
            let found = board.find_footprint_by_reference(refdes).is_some();
            if !found {
                log::debug!("{refdes} not on board, not grouped");
            }
            found
        })
        .collect();

    let added = board.add_group(group_name, &references);
    log::info!("Grouped {added} parts as {group_name:?}");
    Some(added)
}

/// Place the horizontal mirror image of `table`: every `x` negated, same origin
pub fn mirror_parts<B: Board>(
    board: &mut B,
    table: &ValidatedTable,
    options: &PlaceOptions,
) -> Result<PlacementReport> {
    place(board, &table.mirrored(), options)
}
