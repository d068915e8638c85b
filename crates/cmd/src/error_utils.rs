// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error handling utilities: context mapping and user-facing status text

use anyhow::{Result, anyhow};
use report::ReportError;

/// Extension trait for Results to provide standardized error mapping
pub trait ErrorContext<T> {
    /// Map error with a context message
    fn with_context_msg(self, msg: &str) -> Result<T>;

    /// Map error with a formatted context message
    fn with_context_fmt(self, msg: &str, args: &dyn std::fmt::Display) -> Result<T>;

    /// Common error mapping for output operations
    fn output_context(self) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context_msg(self, msg: &str) -> Result<T> {
        self.map_err(|e| anyhow!("{}: {}", msg, e))
    }

    fn with_context_fmt(self, msg: &str, args: &dyn std::fmt::Display) -> Result<T> {
        self.map_err(|e| anyhow!("{} {}: {}", msg, args, e))
    }

    fn output_context(self) -> Result<T> {
        self.with_context_msg("Failed to write output")
    }
}

/// True when the failure comes from the input tree (a missing workbook or
/// column) rather than from the tool itself.
pub fn is_input_problem(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ReportError>()
        .is_some_and(ReportError::is_input_problem)
}

/// Status text shown to the user for a failed action.
///
/// Missing files and missing columns get their own wording since the user
/// is expected to fix the input tree; everything else is reported as is.
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ReportError>() {
        Some(ReportError::MissingFile(path)) => format!(
            "File not found:\n{}\n\nCheck the dataset size and node count; only combinations with data are available.",
            path.display()
        ),
        Some(ReportError::MissingColumn {
            column,
            path,
            available,
        }) => format!(
            "Column '{}' not found in {}.\nAvailable columns: {}",
            column,
            path.display(),
            available
        ),
        Some(ReportError::NoData(reason)) => format!("Nothing to show: {}.", reason),
        Some(ReportError::InvalidSelection(reason)) => format!("Invalid selection: {}.", reason),
        _ => format!("Error: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};
    use std::path::PathBuf;

    #[test]
    fn test_error_context_extension() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let result: std::result::Result<(), _> = Err(io_error);

        let mapped = result.with_context_fmt("Failed to read", &"/test/path");
        assert!(
            mapped
                .expect_err("mapped")
                .to_string()
                .contains("Failed to read /test/path")
        );
    }

    #[test]
    fn test_output_context() {
        let io_error = IoError::new(ErrorKind::BrokenPipe, "pipe closed");
        let result: std::result::Result<(), _> = Err(io_error);
        let err = result.output_context().expect_err("mapped");
        assert_eq!(err.to_string(), "Failed to write output: pipe closed");
    }

    #[test]
    fn test_input_problems() {
        let missing = anyhow::Error::from(ReportError::MissingFile(PathBuf::from("a.xlsx")));
        assert!(is_input_problem(&missing));

        let column = anyhow::Error::from(ReportError::MissingColumn {
            column: "HDFS_Total".to_string(),
            path: PathBuf::from("a.xlsx"),
            available: "Query".to_string(),
        });
        assert!(is_input_problem(&column));

        let render = anyhow::Error::from(ReportError::Render("no font".to_string()));
        assert!(!is_input_problem(&render));
        assert!(!is_input_problem(&anyhow!("disk full")));
    }

    #[test]
    fn test_missing_file_message() {
        let err = anyhow::Error::from(ReportError::MissingFile(PathBuf::from(
            ".benchmark_data/1Gb/tpc_h-1Gb-W-7-node(s).xlsx",
        )));
        let message = user_message(&err);
        assert!(message.starts_with("File not found:"));
        assert!(message.contains("tpc_h-1Gb-W-7-node(s).xlsx"));
    }

    #[test]
    fn test_missing_column_message() {
        let err = anyhow::Error::from(ReportError::MissingColumn {
            column: "MINIO_Total".to_string(),
            path: PathBuf::from("book.xlsx"),
            available: "Query, HDFS_Total".to_string(),
        });
        let message = user_message(&err);
        assert!(message.contains("Column 'MINIO_Total' not found in book.xlsx"));
        assert!(message.contains("Available columns: Query, HDFS_Total"));
    }

    #[test]
    fn test_other_errors_keep_their_text() {
        let err = anyhow!("disk full");
        assert_eq!(user_message(&err), "Error: disk full");
    }
}
