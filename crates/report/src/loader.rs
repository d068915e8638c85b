// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Workbook loader.
//!
//! Reads the first worksheet of a workbook into an Arrow `RecordBatch`:
//! the first column becomes a Utf8 `Query` label column, every other column
//! a nullable Float64 column named after its header cell.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::error::{ReportError, Result};

/// Label of the summary row in response-time workbooks.
pub const TOTAL_LABEL: &str = "Total";

/// A loaded benchmark sheet.
#[derive(Debug, Clone)]
pub struct MetricTable {
    path: PathBuf,
    batch: RecordBatch,
}

/// Open a workbook and load its first worksheet.
pub fn load_workbook(path: &Path) -> Result<MetricTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::EmptyWorkbook(path.to_path_buf()))??;
    let table = MetricTable::from_range(path, &range)?;
    let display = path.display().to_string();
    let rows = table.num_rows();
    let columns = table.num_columns();
    diagnostics::info!("Loaded {display}: {rows} rows, {columns} columns", display: display, rows: rows, columns: columns);
    Ok(table)
}

impl MetricTable {
    /// Build a table from a worksheet range. The first row is the header.
    pub fn from_range(path: &Path, range: &Range<Data>) -> Result<Self> {
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| ReportError::EmptyWorkbook(path.to_path_buf()))?;
        if header.is_empty() {
            return Err(ReportError::EmptyWorkbook(path.to_path_buf()));
        }

        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell_label(cell) {
                Some(name) => name,
                None if i == 0 => "Query".to_string(),
                None => format!("column_{}", i),
            })
            .collect();

        let mut labels: Vec<Option<String>> = Vec::new();
        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len() - 1];
        for row in rows {
            if row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }
            labels.push(row.first().and_then(cell_label));
            for (col, column) in values.iter_mut().enumerate() {
                column.push(row.get(col + 1).and_then(cell_number));
            }
        }

        let mut fields = Vec::with_capacity(names.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(names.len());
        fields.push(Field::new(names[0].as_str(), DataType::Utf8, true));
        arrays.push(Arc::new(StringArray::from(labels)));
        for (name, column) in names.iter().skip(1).zip(values) {
            fields.push(Field::new(name.as_str(), DataType::Float64, true));
            arrays.push(Arc::new(Float64Array::from(column)));
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Self {
            path: path.to_path_buf(),
            batch,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Header names in sheet order, including the label column.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Case-insensitive, whitespace-trimmed lookup of a value column.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.batch
            .schema()
            .fields()
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, f)| f.name().trim().to_lowercase() == wanted)
            .map(|(i, _)| i)
    }

    /// Like [`find_column`](Self::find_column) but fails with a
    /// missing-column error naming `name`.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.find_column(name)
            .ok_or_else(|| self.missing_column(name))
    }

    /// First match among `aliases`; the error names the first alias.
    pub fn require_any(&self, aliases: &[&str]) -> Result<usize> {
        aliases
            .iter()
            .find_map(|alias| self.find_column(alias))
            .ok_or_else(|| self.missing_column(aliases.first().copied().unwrap_or_default()))
    }

    /// Value columns whose header starts with `prefix`, ignoring case.
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<usize> {
        let wanted = prefix.to_lowercase();
        self.batch
            .schema()
            .fields()
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, f)| f.name().trim().to_lowercase().starts_with(&wanted))
            .map(|(i, _)| i)
            .collect()
    }

    /// Missing-column error for `name`, listing what the sheet does have.
    pub fn missing_column(&self, name: &str) -> ReportError {
        ReportError::MissingColumn {
            column: name.to_string(),
            path: self.path.clone(),
            available: self.column_names().join(", "),
        }
    }

    /// Float values of a value column.
    pub fn values(&self, column: usize) -> &Float64Array {
        self.batch
            .column(column)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap_or_else(|| unreachable!("value columns are always Float64"))
    }

    /// Value at (row, column), `None` for blank or non-numeric cells.
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        let array = self.values(column);
        (row < array.len() && array.is_valid(row)).then(|| array.value(row))
    }

    /// Row labels from the first column; blank labels are empty strings.
    pub fn labels(&self) -> Vec<String> {
        let labels = self.label_array();
        (0..labels.len())
            .map(|i| {
                if labels.is_valid(i) {
                    labels.value(i).to_string()
                } else {
                    String::new()
                }
            })
            .collect()
    }

    pub fn label(&self, row: usize) -> Option<&str> {
        let labels = self.label_array();
        (row < labels.len() && labels.is_valid(row)).then(|| labels.value(row))
    }

    /// Index of the row labelled `Total`, if any.
    pub fn total_row(&self) -> Option<usize> {
        (0..self.num_rows()).find(|&row| is_total_label(self.label(row)))
    }

    /// Every row except the total row, in sheet order.
    pub fn query_rows(&self) -> Vec<usize> {
        (0..self.num_rows())
            .filter(|&row| !is_total_label(self.label(row)))
            .collect()
    }

    fn label_array(&self) -> &StringArray {
        self.batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap_or_else(|| unreachable!("label column is always Utf8"))
    }
}

fn is_total_label(label: Option<&str>) -> bool {
    label.is_some_and(|l| l.trim().eq_ignore_ascii_case(TOTAL_LABEL))
}

/// Text form of a cell: integral numbers print without a fraction.
fn cell_label(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a worksheet range from a header and rows of cells.
    pub(crate) fn sheet(header: &[&str], rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = header.len() as u32;
        let mut range = Range::new((0, 0), (height, width.saturating_sub(1)));
        for (col, name) in header.iter().enumerate() {
            range.set_value((0, col as u32), Data::String((*name).to_string()));
        }
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32 + 1, c as u32), cell);
            }
        }
        range
    }

    pub(crate) fn table(header: &[&str], rows: Vec<Vec<Data>>) -> MetricTable {
        MetricTable::from_range(Path::new("test.xlsx"), &sheet(header, rows))
            .expect("table from range")
    }

    #[test]
    fn test_header_and_values() {
        let t = table(
            &["Query", "HDFS_Average", "MINIO_Average"],
            vec![
                vec![Data::Int(1), Data::Float(1.5), Data::Float(2.0)],
                vec![Data::Int(2), Data::String(" 3.25 ".into()), Data::Empty],
                vec![Data::String("Total".into()), Data::Float(4.75), Data::Float(2.0)],
            ],
        );
        assert_eq!(t.num_rows(), 3);
        assert_eq!(t.column_names(), vec!["Query", "HDFS_Average", "MINIO_Average"]);
        assert_eq!(t.labels(), vec!["1", "2", "Total"]);
        assert_eq!(t.value(1, 1), Some(3.25));
        assert_eq!(t.value(1, 2), None);
        assert_eq!(t.total_row(), Some(2));
        assert_eq!(t.query_rows(), vec![0, 1]);
    }

    #[test]
    fn test_find_column_ignores_case() {
        let t = table(
            &["Query", "HDFS_Average", "MinIO_Average"],
            vec![vec![Data::Int(1), Data::Float(1.0), Data::Float(2.0)]],
        );
        assert_eq!(t.find_column("hdfs_average"), Some(1));
        assert_eq!(t.find_column("MINIO_AVERAGE"), Some(2));
        assert_eq!(t.find_column("Query"), None);
    }

    #[test]
    fn test_missing_column_names_expected_column() {
        let t = table(
            &["Query", "HDFS_Average"],
            vec![vec![Data::Int(1), Data::Float(1.0)]],
        );
        match t.require_column("MINIO_Average") {
            Err(ReportError::MissingColumn { column, available, .. }) => {
                assert_eq!(column, "MINIO_Average");
                assert!(available.contains("HDFS_Average"));
            }
            other => panic!("expected missing column, got {:?}", other),
        }
        let err = t.require_any(&["CPU_Peak_HDFS(%)", "CPU Peak HDFS (%)"]).expect_err("missing");
        assert!(err.to_string().contains("CPU_Peak_HDFS(%)"));
    }

    #[test]
    fn test_prefix_columns_and_blank_rows() {
        let t = table(
            &["Query", "HDFS_Set1", "hdfs_set2", "MINIO_Set1", ""],
            vec![
                vec![Data::Int(1), Data::Float(1.0), Data::Float(1.1), Data::Float(0.9), Data::Empty],
                vec![Data::Empty, Data::Empty, Data::Empty, Data::Empty, Data::Empty],
                vec![Data::Int(2), Data::Float(2.0), Data::Float(2.1), Data::Float(1.9), Data::Empty],
            ],
        );
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.columns_with_prefix("HDFS_Set"), vec![1, 2]);
        assert_eq!(t.columns_with_prefix("minio_set"), vec![3]);
        assert_eq!(t.column_names()[4], "column_4");
    }

    #[test]
    fn test_float_labels_print_as_integers() {
        assert_eq!(cell_label(&Data::Float(7.0)), Some("7".to_string()));
        assert_eq!(cell_label(&Data::Float(7.5)), Some("7.5".to_string()));
        assert_eq!(cell_label(&Data::String("  ".into())), None);
        assert_eq!(cell_number(&Data::String("n/a".into())), None);
        assert_eq!(cell_number(&Data::Bool(true)), None);
    }

    #[test]
    fn test_empty_sheet_is_rejected() {
        let range: Range<Data> = Range::empty();
        let err = MetricTable::from_range(Path::new("empty.xlsx"), &range).expect_err("empty");
        assert!(matches!(err, ReportError::EmptyWorkbook(_)));
    }
}
