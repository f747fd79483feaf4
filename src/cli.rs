// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fmt;

use kicad_parts_placer::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input error (missing file, unsupported extension, invalid rows, bad flags)
    Input = 2,
    /// Processing error (board parse or write failure, rejected placement)
    Processing = 3,
}

#[derive(Debug)]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
    /// Extra lines printed after the message, e.g. one per invalid row
    pub details: Vec<String>,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Input,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Processing,
            message: message.into(),
            details: Vec::new(),
        }
    }
}

impl From<Error> for CliError {
    fn from(error: Error) -> Self {
        match error {
            Error::Validation(errors) => Self {
                code: ErrorCode::Input,
                message: "Input validation failed".to_string(),
                details: errors,
            },
            Error::Io(_)
            | Error::Csv(_)
            | Error::Spreadsheet(_)
            | Error::UnsupportedExtension { .. }
            | Error::EmptySpreadsheet { .. } => Self::input(error.to_string()),
            Error::BoardParse(_) | Error::NegativeCoordinate { .. } => {
                Self::processing(error.to_string())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for detail in &self.details {
            write!(f, "\n  {detail}")?;
        }
        Ok(())
    }
}
