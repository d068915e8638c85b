// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for locating, loading and charting benchmark workbooks

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Missing column '{column}' in {}; available columns: {available}", .path.display())]
    MissingColumn {
        column: String,
        path: PathBuf,
        available: String,
    },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Workbook {} has no worksheet with data", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl ReportError {
    /// True for the two conditions the user is expected to fix by
    /// adding or renaming input files.
    pub fn is_input_problem(&self) -> bool {
        matches!(
            self,
            ReportError::MissingFile(_) | ReportError::MissingColumn { .. }
        )
    }
}

impl From<serde_yaml_ng::Error> for ReportError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ReportError::Configuration(e.to_string())
    }
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for ReportError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ReportError::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
