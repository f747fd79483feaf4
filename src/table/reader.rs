// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use calamine::{open_workbook_auto, Data, Reader};
use std::fs;
use std::path::Path;

use super::{Cell, Table};
use crate::error::{Error, Result};

const TEXT_EXTENSIONS: &[&str] = &["csv", "txt"];
const EXCEL_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb"];
const OPENDOCUMENT_EXTENSIONS: &[&str] = &["ods"];

/// Delimiters tried when sniffing a text file, in tie-break order
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Text,
    Excel,
    OpenDocument,
}

impl SpreadsheetFormat {
    /// Pick the reader for a path from its (case-insensitive) extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if TEXT_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::Text)
        } else if EXCEL_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::Excel)
        } else if OPENDOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::OpenDocument)
        } else {
            Err(Error::UnsupportedExtension { extension })
        }
    }
}

/// Every extension `SpreadsheetReader` can dispatch on
pub fn supported_extensions() -> Vec<&'static str> {
    TEXT_EXTENSIONS
        .iter()
        .chain(EXCEL_EXTENSIONS)
        .chain(OPENDOCUMENT_EXTENSIONS)
        .copied()
        .collect()
}

pub struct SpreadsheetReader;

impl SpreadsheetReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let format = SpreadsheetFormat::from_path(path)?;
        log::debug!("Loading {format:?} spreadsheet: {}", path.display());

        let table = match format {
            SpreadsheetFormat::Text => {
                let content = fs::read_to_string(path)?;
                read_csv_str(&content, sniff_delimiter(&content))?
            }
            SpreadsheetFormat::Excel => read_workbook(path, false)?,
            SpreadsheetFormat::OpenDocument => read_workbook(path, true)?,
        };

        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            table.len(),
            table.headers(),
            path.display()
        );
        Ok(table)
    }
}

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a delimited text file with a fixed delimiter
pub fn read_csv_with_delimiter<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Table> {
    let content = fs::read_to_string(path)?;
    read_csv_str(&content, delimiter)
}

/// Guess the delimiter from the header line: the candidate seen most often wins
pub fn sniff_delimiter(content: &str) -> u8 {
    let header = content
        .lines()
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .unwrap_or("");

    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;
    for candidate in CANDIDATE_DELIMITERS {
        let count = header.bytes().filter(|byte| *byte == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Parse delimited text; `#` starts a comment line, blank records are dropped
pub fn read_csv_str(content: &str, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers);

    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        table.push_row(record.iter().map(Cell::from_raw).collect());
    }

    Ok(table)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::String(text) => Cell::from_raw(text),
        other => Cell::from_raw(&other.to_string()),
    }
}

/// Number of cells up to and including the last non-empty one
fn filled_length(row: &[Cell]) -> usize {
    row.iter()
        .rposition(|cell| !cell.is_empty())
        .map(|index| index + 1)
        .unwrap_or(0)
}

/// Build a table from raw worksheet rows.
///
/// Fully empty rows are skipped. With `drop_short_rows`, rows shorter than the
/// mean row length are treated as preamble (titles, notes) and discarded before
/// the header is taken. Blank header cells are named `Unnamed: {index}`; empty
/// cells after the last filled header cell do not become columns. Returns
/// `None` when no header row remains.
pub fn table_from_sheet_rows(rows: Vec<Vec<Cell>>, drop_short_rows: bool) -> Option<Table> {
    let mut rows: Vec<Vec<Cell>> = rows
        .into_iter()
        .filter(|row| filled_length(row) > 0)
        .collect();

    if drop_short_rows && !rows.is_empty() {
        let total: usize = rows.iter().map(|row| filled_length(row)).sum();
        let mean = total as f64 / rows.len() as f64;
        rows.retain(|row| filled_length(row) as f64 >= mean);
    }

    let mut rows = rows.into_iter();
    let header_row = rows.next()?;
    let headers: Vec<String> = header_row
        .iter()
        .take(filled_length(&header_row))
        .enumerate()
        .map(|(index, cell)| match cell {
            Cell::Empty => format!("Unnamed: {index}"),
            other => other.to_string(),
        })
        .collect();

    Some(Table::from_rows(headers, rows.collect()))
}

/// Read the first worksheet of an Excel or OpenDocument file
fn read_workbook(path: &Path, drop_short_rows: bool) -> Result<Table> {
    let empty = || Error::EmptySpreadsheet {
        path: path.display().to_string(),
    };

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or_else(empty)??;

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();

    table_from_sheet_rows(rows, drop_short_rows).ok_or_else(empty)
}
