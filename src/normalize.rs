// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Header normalization
//!
//! Maps the many spellings spreadsheets use for the same column ("Ref Des",
//! "Designator", "PosX", "Mid X", ...) onto the canonical names
//! `refdes`, `x`, `y`, `rotation` and `side`, and fills the optional columns.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use crate::table::{Cell, Table};

pub const REFDES: &str = "refdes";
pub const X: &str = "x";
pub const Y: &str = "y";
pub const ROTATION: &str = "rotation";
pub const SIDE: &str = "side";

/// Every column a normalized table carries
pub const CANONICAL_FIELDS: [&str; 5] = [REFDES, X, Y, ROTATION, SIDE];

const HEADER_PSEUDONYMS: [(&str, &[&str]); 5] = [
    (
        REFDES,
        &["designator", "referencedesignator", "ref", "refdes"],
    ),
    (
        X,
        &["posx", "positionx", "xpos", "xposition", "midx", "xmid", "x"],
    ),
    (
        Y,
        &["posy", "positiony", "ypos", "yposition", "midy", "ymid", "y"],
    ),
    (ROTATION, &["rot", "angle", "rotate", "rotation"]),
    (SIDE, &["layer", "side"]),
];

/// Squashed spelling -> canonical name
static HEADER_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HEADER_PSEUDONYMS
        .iter()
        .flat_map(|(canonical, aliases)| aliases.iter().map(move |alias| (*alias, *canonical)))
        .collect()
});

/// Target board face of a component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    /// Leave the footprint on whatever side it is on
    #[default]
    Current,
}

impl Side {
    /// Map free text onto a side; anything unrecognized means `Current`
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "front" | "top" | "f.cu" => Side::Top,
            "back" | "bottom" | "b.cu" => Side::Bottom,
            _ => Side::Current,
        }
    }

    /// Strict parse of the canonical spelling only
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "top" => Some(Side::Top),
            "bottom" => Some(Side::Bottom),
            "current" => Some(Side::Current),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Current => "current",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-case and drop all whitespace, then look the header up in the alias table.
/// Unknown headers are returned unchanged.
pub fn normalize_header(raw: &str) -> String {
    let squashed: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    match HEADER_ALIASES.get(squashed.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => raw.to_string(),
    }
}

/// Normalize a header row. When two headers collapse onto the same canonical
/// name the first keeps it and later ones keep their raw spelling. A raw
/// spelling that is itself taken gets a numeric suffix (`x_2`, `x_3`, ...),
/// so the returned names are always unique.
pub fn normalize_headers(raw_headers: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    raw_headers
        .iter()
        .map(|raw| {
            let normalized = normalize_header(raw);
            if taken.insert(normalized.clone()) {
                return normalized;
            }

            let name = if taken.contains(raw) {
                (2..)
                    .map(|n| format!("{raw}_{n}"))
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or_else(|| raw.clone())
            } else {
                raw.clone()
            };
            log::warn!("Column {raw:?} duplicates {normalized:?}, renamed to {name:?}");
            taken.insert(name.clone());
            name
        })
        .collect()
}

fn coerce_side_cell(cell: &Cell) -> Cell {
    let side = match cell {
        Cell::Text(text) => Side::coerce(text),
        _ => Side::Current,
    };
    Cell::Text(side.as_str().to_string())
}

/// Rename headers, synthesize `rotation` (0.0) and `side` (current) when
/// absent, and coerce every side value onto the closed `Side` set.
pub fn normalize_table(mut table: Table) -> Table {
    let headers = normalize_headers(table.headers());
    table.set_headers(headers);

    if !table.has_column(ROTATION) {
        log::debug!("No rotation column, defaulting to 0");
        table.add_column(ROTATION, Cell::Number(0.0));
    }

    if !table.has_column(SIDE) {
        log::debug!("No side column, parts stay on their current side");
        table.add_column(SIDE, Cell::Text(Side::Current.as_str().to_string()));
    }

    table.map_column(SIDE, coerce_side_cell);
    table
}
