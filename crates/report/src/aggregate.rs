// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Turn loaded tables into the data each chart draws.
//!
//! Every function here is a pure function of the table and the request, so
//! running it twice yields identical results.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use arrow::array::Float64Array;
use regex::Regex;

use crate::error::{ReportError, Result};
use crate::loader::MetricTable;
use crate::locator::{DatasetSize, Environment, NodeCount, PeakMetric};
use crate::stats::{BoxStats, Summary};

/// Which summary column of a response-time workbook to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeType {
    Average,
    Total,
}

impl TimeType {
    pub const ALL: [TimeType; 2] = [TimeType::Average, TimeType::Total];

    /// "Average Time" / "Total Time"
    pub fn label(self) -> &'static str {
        match self {
            TimeType::Average => "Average Time",
            TimeType::Total => "Total Time",
        }
    }

    /// Column suffix: `HDFS_<suffix>`.
    pub fn column_suffix(self) -> &'static str {
        match self {
            TimeType::Average => "Average",
            TimeType::Total => "Total",
        }
    }

    /// Lowercase tag for generated file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            TimeType::Average => "average",
            TimeType::Total => "total",
        }
    }
}

impl fmt::Display for TimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" | "average time" | "avg" => Ok(TimeType::Average),
            "total" | "total time" => Ok(TimeType::Total),
            other => Err(ReportError::InvalidSelection(format!(
                "unknown time type '{}'",
                other
            ))),
        }
    }
}

/// A query picked by the user: one TPC-H query or the summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuerySelector {
    Query(u32),
    Total,
}

static QUERY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:query\s*|q)?(\d+)\s*$").expect("valid query pattern")
});

impl QuerySelector {
    /// "Q3" / "Total"
    pub fn short_label(self) -> String {
        match self {
            QuerySelector::Query(n) => format!("Q{}", n),
            QuerySelector::Total => "Total".to_string(),
        }
    }

    /// Row index in `table`, `None` when the sheet has no such row.
    pub fn row(self, table: &MetricTable) -> Option<usize> {
        match self {
            QuerySelector::Total => table.total_row(),
            QuerySelector::Query(n) => {
                let index = usize::try_from(n).ok()?.checked_sub(1)?;
                table.query_rows().get(index).copied()
            }
        }
    }
}

impl fmt::Display for QuerySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySelector::Query(n) => write!(f, "Query {}", n),
            QuerySelector::Total => f.write_str("Total"),
        }
    }
}

impl FromStr for QuerySelector {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("total") {
            return Ok(QuerySelector::Total);
        }
        let number = QUERY_PATTERN
            .captures(s)
            .and_then(|c| c[1].parse::<u32>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| ReportError::InvalidSelection(format!("'{}' is not a query", s.trim())))?;
        Ok(QuerySelector::Query(number))
    }
}

/// Summary of the named column over the query rows (the total row is
/// excluded).
pub fn column_summary(table: &MetricTable, column: &str) -> Result<Summary> {
    let index = table.require_column(column)?;
    let values: Float64Array = table
        .query_rows()
        .into_iter()
        .map(|row| table.value(row, index))
        .collect();
    Summary::of_array(&values).ok_or_else(|| {
        ReportError::NoData(format!("column '{}' has no numeric values", column))
    })
}

/// Per-environment summary of the Average or Total column.
pub fn environment_summary(
    table: &MetricTable,
    environment: Environment,
    time_type: TimeType,
) -> Result<Summary> {
    column_summary(table, &environment.column(time_type.column_suffix()))
}

// ---------------------------------------------------------------------------
// Peak & spill

struct SeriesSpec {
    name: &'static str,
    short_name: &'static str,
    color: &'static str,
    aliases: &'static [&'static str],
}

struct PeakSpec {
    title: &'static str,
    y_title: &'static str,
    unit: &'static str,
    sort_by_query: bool,
    series: &'static [SeriesSpec],
}

fn peak_spec(metric: PeakMetric) -> PeakSpec {
    match metric {
        PeakMetric::CpuPeak => PeakSpec {
            title: "CPU Peak (%) HDFS vs MinIO",
            y_title: "CPU Peak (%)",
            unit: "%",
            sort_by_query: false,
            series: &[
                SeriesSpec {
                    name: "CPU Peak HDFS (%)",
                    short_name: "HDFS",
                    color: "red",
                    aliases: &["CPU_Peak_HDFS(%)", "CPU Peak HDFS (%)"],
                },
                SeriesSpec {
                    name: "CPU Peak MinIO (%)",
                    short_name: "MinIO",
                    color: "purple",
                    aliases: &["CPU_Peak_MinIO(%)", "CPU Peak MinIO (%)"],
                },
            ],
        },
        PeakMetric::MemoryPeak => PeakSpec {
            title: "Peak Memory (GiB)",
            y_title: "GiB",
            unit: " GiB",
            sort_by_query: true,
            series: &[SeriesSpec {
                name: "Peak Memory (GiB)",
                short_name: "Memory",
                color: "skyblue",
                aliases: &["Peak Memory (GiB)", "Peak_Memory(GiB)"],
            }],
        },
        PeakMetric::Spill => PeakSpec {
            title: "Spill (GiB) HDFS vs MinIO",
            y_title: "GiB",
            unit: " GiB",
            sort_by_query: true,
            series: &[
                SeriesSpec {
                    name: "HDFS Spill (GiB)",
                    short_name: "HDFS",
                    color: "orange",
                    aliases: &["HDFS_Spill(GiB)", "HDFS Spill (GiB)"],
                },
                SeriesSpec {
                    name: "MinIO Spill (GiB)",
                    short_name: "MinIO",
                    color: "green",
                    aliases: &["MinIO_Spill(GiB)", "MinIO Spill (GiB)"],
                },
            ],
        },
    }
}

/// One bar series of a peak chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakSeries {
    pub name: String,
    /// Name used in hover text: `HDFS`, `MinIO`, `Memory`
    pub short_name: String,
    pub color: String,
    pub values: Vec<Option<f64>>,
    pub summary: Option<Summary>,
}

/// Everything the peak & spill chart draws.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakChartData {
    pub metric: PeakMetric,
    pub title: String,
    pub y_title: String,
    pub unit: String,
    /// `Q1…Qn`
    pub labels: Vec<String>,
    /// Query labels as written in the sheet, shown on hover
    pub query_labels: Vec<String>,
    pub series: Vec<PeakSeries>,
}

pub fn peak_chart_data(table: &MetricTable, metric: PeakMetric) -> Result<PeakChartData> {
    let spec = peak_spec(metric);
    let columns = spec
        .series
        .iter()
        .map(|s| table.require_any(s.aliases))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = table.query_rows();
    if spec.sort_by_query {
        rows.sort_by(|a, b| query_order(table.label(*a)).total_cmp(&query_order(table.label(*b))));
    }
    if rows.is_empty() {
        return Err(ReportError::NoData(format!(
            "{} has no query rows",
            table.path().display()
        )));
    }

    let series = spec
        .series
        .iter()
        .zip(columns)
        .map(|(s, column)| {
            let values: Vec<Option<f64>> = rows.iter().map(|&row| table.value(row, column)).collect();
            let summary = Summary::of_array(&Float64Array::from(values.clone()));
            PeakSeries {
                name: s.name.to_string(),
                short_name: s.short_name.to_string(),
                color: s.color.to_string(),
                values,
                summary,
            }
        })
        .collect();

    diagnostics::debug!("Peak chart {metric}: {count} queries", metric: metric.label(), count: rows.len());

    Ok(PeakChartData {
        metric,
        title: spec.title.to_string(),
        y_title: spec.y_title.to_string(),
        unit: spec.unit.to_string(),
        labels: (1..=rows.len()).map(|i| format!("Q{}", i)).collect(),
        query_labels: rows
            .iter()
            .map(|&row| table.label(row).unwrap_or_default().to_string())
            .collect(),
        series,
    })
}

/// Numeric sort key of a query label; non-numeric labels sort last.
fn query_order(label: Option<&str>) -> f64 {
    label
        .and_then(|l| QUERY_PATTERN.captures(l))
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(f64::INFINITY)
}

// ---------------------------------------------------------------------------
// Bar chart

/// HDFS vs MinIO response time of one selected query.
#[derive(Debug, Clone, PartialEq)]
pub struct BarEntry {
    pub label: String,
    pub hdfs: f64,
    pub minio: f64,
}

impl BarEntry {
    /// `(hdfs - minio) / hdfs` in percent; positive means MinIO is faster.
    pub fn difference(&self) -> f64 {
        if self.hdfs != 0.0 {
            (self.hdfs - self.minio) / self.hdfs * 100.0
        } else {
            0.0
        }
    }

    pub fn value(&self, environment: Environment) -> f64 {
        match environment {
            Environment::Serverful => self.hdfs,
            Environment::Serverless => self.minio,
        }
    }

    /// One-line comparison of the two environments.
    pub fn comparison(&self) -> String {
        let difference = self.difference();
        if difference > 0.0 {
            format!("MinIO {:.2}% faster than HDFS", difference)
        } else if difference < 0.0 {
            format!("HDFS {:.2}% faster than MinIO", -difference)
        } else {
            "Both environments have the same response time".to_string()
        }
    }

    /// Hover lines for one environment's bar.
    pub fn hover_lines(&self, environment: Environment) -> Vec<String> {
        let difference = self.difference();
        let magnitude = difference.abs();
        let relation = match environment {
            Environment::Serverful if difference > 0.0 => {
                format!("HDFS is {:.2}% slower than MinIO", magnitude)
            }
            Environment::Serverful if difference < 0.0 => {
                format!("HDFS is {:.2}% faster than MinIO", magnitude)
            }
            Environment::Serverless if difference > 0.0 => {
                format!("MinIO is {:.2}% faster than HDFS", magnitude)
            }
            Environment::Serverless if difference < 0.0 => {
                format!("MinIO is {:.2}% slower than HDFS", magnitude)
            }
            _ => "Same time".to_string(),
        };
        vec![
            self.label.clone(),
            format!("{}: {:.6} s", environment.label(), self.value(environment)),
            relation,
        ]
    }
}

/// Everything the response-time bar chart draws.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartData {
    pub time_type: TimeType,
    pub entries: Vec<BarEntry>,
    /// Selections that could not be resolved against the sheet
    pub warnings: Vec<String>,
}

impl BarChartData {
    pub fn title(&self, size: &DatasetSize, nodes: NodeCount) -> String {
        format!(
            "{} Response Time per Query ({}, {} Node(s))",
            self.time_type.column_suffix(),
            size,
            nodes
        )
    }

    pub fn y_title(&self) -> String {
        format!("{} Response Time (seconds)", self.time_type.column_suffix())
    }

    /// `[max(0, min * 0.9), max * 1.2]` over all bars.
    pub fn y_range(&self) -> (f64, f64) {
        let values = self.entries.iter().flat_map(|e| [e.hdfs, e.minio]);
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        let y_min = (lo * 0.9).max(0.0);
        let y_max = hi * 1.2;
        if y_max <= y_min {
            (y_min, y_min + 1.0)
        } else {
            (y_min, y_max)
        }
    }
}

/// Resolve selections against the sheet. `Total` wins over individual
/// queries. Unresolvable queries become warnings; nothing left is an error.
pub fn bar_chart_data(
    table: &MetricTable,
    selection: &[QuerySelector],
    time_type: TimeType,
) -> Result<BarChartData> {
    let hdfs_col = table.require_column(&Environment::Serverful.column(time_type.column_suffix()))?;
    let minio_col = table.require_column(&Environment::Serverless.column(time_type.column_suffix()))?;

    let selection: Vec<QuerySelector> = if selection.contains(&QuerySelector::Total) {
        vec![QuerySelector::Total]
    } else {
        selection.to_vec()
    };
    if selection.is_empty() {
        return Err(ReportError::InvalidSelection("no queries chosen".to_string()));
    }

    let mut entries = Vec::new();
    let mut warnings = Vec::new();
    for selector in selection {
        let Some(row) = selector.row(table) else {
            let selector = selector.to_string();
            diagnostics::warn!("{selector} does not exist in the sheet", selector: selector);
            warnings.push(format!("Error: {} does not exist!", selector));
            continue;
        };
        entries.push(BarEntry {
            label: selector.short_label(),
            hdfs: table.value(row, hdfs_col).unwrap_or(0.0),
            minio: table.value(row, minio_col).unwrap_or(0.0),
        });
    }

    if entries.is_empty() {
        return Err(ReportError::NoData("no valid queries chosen".to_string()));
    }
    Ok(BarChartData {
        time_type,
        entries,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Boxplot

/// What a boxplot's distributions are made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxplotMode {
    /// All repetitions (`HDFS_Set*`, `MINIO_Set*`) of one query
    ByRepetitions(QuerySelector),
    /// One value per query from the Average/Total columns
    ByQueries,
}

impl BoxplotMode {
    /// Fragment of the output file name.
    pub fn file_part(self) -> String {
        match self {
            BoxplotMode::ByRepetitions(QuerySelector::Query(n)) => format!("query_query{}", n),
            BoxplotMode::ByRepetitions(QuerySelector::Total) => "query_total".to_string(),
            BoxplotMode::ByQueries => "all_queries".to_string(),
        }
    }
}

/// One environment's values and their statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub environment: Environment,
    pub values: Vec<f64>,
    pub stats: BoxStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxplotData {
    pub mode: BoxplotMode,
    pub distributions: Vec<Distribution>,
}

pub fn boxplot_data(
    table: &MetricTable,
    mode: BoxplotMode,
    time_type: TimeType,
    query_count: usize,
) -> Result<BoxplotData> {
    let per_environment: Vec<(Environment, Vec<f64>)> = match mode {
        BoxplotMode::ByRepetitions(selector) => {
            let columns = Environment::ALL
                .iter()
                .map(|env| {
                    let prefix = env.column("Set");
                    let columns = table.columns_with_prefix(&prefix);
                    if columns.is_empty() {
                        Err(table.missing_column(&format!("{}*", prefix)))
                    } else {
                        Ok((*env, columns))
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            let row = selector.row(table).ok_or_else(|| {
                ReportError::InvalidSelection(format!("wrong query number: {}", selector))
            })?;
            columns
                .into_iter()
                .map(|(env, cols)| {
                    let values = cols.iter().filter_map(|&c| table.value(row, c)).collect();
                    (env, values)
                })
                .collect()
        }
        BoxplotMode::ByQueries => {
            let columns = Environment::ALL
                .iter()
                .map(|env| Ok((*env, table.require_column(&env.column(time_type.column_suffix()))?)))
                .collect::<Result<Vec<_>>>()?;
            let rows: Vec<usize> = table.query_rows().into_iter().take(query_count).collect();
            columns
                .into_iter()
                .map(|(env, col)| {
                    let values = rows.iter().filter_map(|&r| table.value(r, col)).collect();
                    (env, values)
                })
                .collect()
        }
    };

    let distributions = per_environment
        .into_iter()
        .map(|(environment, values)| {
            let stats = BoxStats::of_values(&values).ok_or_else(|| match mode {
                BoxplotMode::ByRepetitions(selector) => ReportError::NoData(format!(
                    "no {} repetitions to show for {}",
                    environment.storage(),
                    selector
                )),
                BoxplotMode::ByQueries => ReportError::NoData(format!(
                    "no {} values to show",
                    environment.storage()
                )),
            })?;
            Ok(Distribution {
                environment,
                values,
                stats,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BoxplotData {
        mode,
        distributions,
    })
}

// ---------------------------------------------------------------------------
// Heatmap

/// Environments × queries grid of response times.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    pub time_type: TimeType,
    /// Query numbers along the x axis
    pub queries: Vec<u32>,
    /// One row per environment; `None` marks a blank cell
    pub rows: Vec<(Environment, Vec<Option<f64>>)>,
    pub min: f64,
    pub max: f64,
}

pub fn heatmap_grid(table: &MetricTable, time_type: TimeType, query_count: usize) -> Result<HeatmapGrid> {
    let columns = Environment::ALL
        .iter()
        .map(|env| Ok((*env, table.require_column(&env.column(time_type.column_suffix()))?)))
        .collect::<Result<Vec<_>>>()?;
    let query_rows: Vec<usize> = table.query_rows().into_iter().take(query_count).collect();

    let rows: Vec<(Environment, Vec<Option<f64>>)> = columns
        .into_iter()
        .map(|(env, col)| (env, query_rows.iter().map(|&r| table.value(r, col)).collect()))
        .collect();

    let (min, max) = rows
        .iter()
        .flat_map(|(_, cells)| cells.iter().flatten())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if !min.is_finite() {
        return Err(ReportError::NoData(format!(
            "{} has no {} values",
            table.path().display(),
            time_type.label().to_lowercase()
        )));
    }

    Ok(HeatmapGrid {
        time_type,
        queries: (1..=query_rows.len() as u32).collect(),
        rows,
        min,
        max,
    })
}
