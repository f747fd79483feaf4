// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! In-memory spreadsheet table
//!
//! A `Table` is an ordered list of column headers plus rows of cells. Every
//! row holds exactly one cell per column.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from raw spreadsheet text: trimmed, numbers detected
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else if let Some(value) = trimmed.parse::<f64>().ok().filter(|v| v.is_finite()) {
            Cell::Number(value)
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    /// Numeric value of the cell. Text holding a number counts as numeric;
    /// NaN and infinities do not.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(text) => text.trim().parse::<f64>().ok(),
            Cell::Empty => None,
        };
        value.filter(|v| v.is_finite())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table, padding short rows with `Cell::Empty` and cutting long ones
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell at `row` in the column named `name`
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let column = self.column_index(name)?;
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Replace every header; `headers` must have one entry per column
    pub fn set_headers(&mut self, headers: Vec<String>) {
        assert_eq!(
            headers.len(),
            self.headers.len(),
            "header count must match column count"
        );
        self.headers = headers;
    }

    /// Append a column with `fill` in every row
    pub fn add_column(&mut self, name: &str, fill: Cell) {
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
    }

    /// Rewrite every cell of a column in place. Returns false if the column is absent.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&Cell) -> Cell,
    {
        let Some(column) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(column) {
                *cell = f(cell);
            }
        }
        true
    }

    /// Render one row as `{header: value, ...}` for error messages
    pub fn describe_row(&self, row: usize) -> String {
        let Some(cells) = self.rows.get(row) else {
            return "{}".to_string();
        };
        let fields: Vec<String> = self
            .headers
            .iter()
            .zip(cells)
            .map(|(header, cell)| match cell {
                Cell::Text(text) => format!("{header}: {text:?}"),
                other => format!("{header}: {other}"),
            })
            .collect();
        format!("{{{}}}", fields.join(", "))
    }
}

pub mod reader;
