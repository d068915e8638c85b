// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Benchmark report library.
//!
//! Reads Excel snapshots of TPC-H runs on a serverful (HDFS) and a
//! serverless (MinIO) cluster and renders comparison charts:
//!
//! - [`locator`] resolves workbook paths from dataset size and node count
//! - [`loader`] reads the first worksheet into an Arrow `RecordBatch`
//! - [`aggregate`] and [`stats`] compute what each chart draws
//! - [`render`] writes HTML and PNG charts
//! - [`pipeline`] chains the above, one function per chart

pub mod aggregate;
pub mod config;
pub mod error;
pub mod loader;
pub mod locator;
pub mod pipeline;
pub mod render;
pub mod stats;

pub use aggregate::{BoxplotMode, QuerySelector, TimeType};
pub use config::{CONFIG_FILE_NAME, ReportConfig, ReportLayout};
pub use error::{ReportError, Result};
pub use loader::{MetricTable, load_workbook};
pub use locator::{DatasetSize, Environment, Locator, NodeCount, PeakMetric, RunIdentity};
pub use pipeline::{
    BarChartRequest, BoxplotRequest, HeatmapRequest, generate_bar_chart, generate_boxplot,
    generate_heatmap, generate_peak_chart,
};
pub use render::ChartArtifact;
