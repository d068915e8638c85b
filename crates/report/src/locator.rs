// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Workbook locator.
//!
//! Input workbooks live under `<data_dir>/<size folder>/`:
//!
//! ```text
//! .benchmark_data/
//!     1Gb/
//!         tpc_h-1Gb-W-1-node(s).xlsx
//!         tpc_h-1Gb-W-2-node(s).xlsx
//!         cpu_peak_1Gb.xlsx
//!         memory_peak_1Gb.xlsx
//!         spill_1Gb.xlsx
//!     10Gb/
//!         ...
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::ReportLayout;
use crate::error::{ReportError, Result};

/// Dataset size label as typed or picked by the user (`1GB`, `20Gb`, `50GB`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetSize(String);

impl DatasetSize {
    pub fn new(label: &str) -> Result<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ReportError::InvalidSelection(
                "dataset size cannot be empty".to_string(),
            ));
        }
        if label.contains(['/', '\\']) || label == "." || label == ".." {
            return Err(ReportError::InvalidSelection(format!(
                "dataset size '{}' is not a valid folder name",
                label
            )));
        }
        Ok(Self(label.to_string()))
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Folder name under the data directory: `GB` is spelled `Gb`.
    pub fn folder(&self) -> String {
        self.0.replace("GB", "Gb")
    }

    /// Lowercase tag used in generated file names.
    pub fn file_tag(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for DatasetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DatasetSize {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Number of worker nodes in the benchmark cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeCount(u32);

impl NodeCount {
    pub fn new(count: u32) -> Result<Self> {
        if count == 0 {
            return Err(ReportError::InvalidSelection(
                "number of nodes must be greater than 0".to_string(),
            ));
        }
        Ok(Self(count))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeCount {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let count = s.trim().parse::<u32>().map_err(|_| {
            ReportError::InvalidSelection(format!("'{}' is not a valid number of nodes", s.trim()))
        })?;
        Self::new(count)
    }
}

/// Cluster execution model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Persistent HDFS cluster
    Serverful,
    /// Object-store-backed ephemeral compute (MinIO)
    Serverless,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Serverful, Environment::Serverless];

    /// Display name used in chart legends.
    pub fn label(self) -> &'static str {
        match self {
            Environment::Serverful => "Serverful (HDFS)",
            Environment::Serverless => "Serverless (MinIO)",
        }
    }

    /// Storage system name.
    pub fn storage(self) -> &'static str {
        match self {
            Environment::Serverful => "HDFS",
            Environment::Serverless => "MinIO",
        }
    }

    /// Prefix of this environment's columns in response-time workbooks.
    pub fn column_prefix(self) -> &'static str {
        match self {
            Environment::Serverful => "HDFS",
            Environment::Serverless => "MINIO",
        }
    }

    /// `<PREFIX>_<suffix>`, e.g. `HDFS_Average`.
    pub fn column(self, suffix: &str) -> String {
        format!("{}_{}", self.column_prefix(), suffix)
    }

    /// Chart color for this environment.
    pub fn color(self) -> &'static str {
        match self {
            Environment::Serverful => "#00C853",
            Environment::Serverless => "#0288D1",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Environment {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serverful" | "hdfs" => Ok(Environment::Serverful),
            "serverless" | "minio" => Ok(Environment::Serverless),
            other => Err(ReportError::InvalidSelection(format!(
                "unknown environment '{}'",
                other
            ))),
        }
    }
}

/// Peak & spill metrics, each stored in its own workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeakMetric {
    MemoryPeak,
    CpuPeak,
    Spill,
}

impl PeakMetric {
    pub const ALL: [PeakMetric; 3] = [PeakMetric::MemoryPeak, PeakMetric::CpuPeak, PeakMetric::Spill];

    pub fn label(self) -> &'static str {
        match self {
            PeakMetric::MemoryPeak => "Memory Peak",
            PeakMetric::CpuPeak => "CPU Peak",
            PeakMetric::Spill => "Spill",
        }
    }

    /// Workbook stem: `<stem>_<size folder>.xlsx`.
    pub fn file_stem(self) -> &'static str {
        match self {
            PeakMetric::MemoryPeak => "memory_peak",
            PeakMetric::CpuPeak => "cpu_peak",
            PeakMetric::Spill => "spill",
        }
    }
}

impl fmt::Display for PeakMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PeakMetric {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace([' ', '_', '-'], "").as_str() {
            "memory" | "memorypeak" => Ok(PeakMetric::MemoryPeak),
            "cpu" | "cpupeak" => Ok(PeakMetric::CpuPeak),
            "spill" => Ok(PeakMetric::Spill),
            _ => Err(ReportError::InvalidSelection(format!(
                "unknown metric '{}'",
                s.trim()
            ))),
        }
    }
}

/// Identity of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunIdentity {
    pub environment: Environment,
    pub size: DatasetSize,
    pub nodes: NodeCount,
}

impl RunIdentity {
    pub fn new(environment: Environment, size: DatasetSize, nodes: NodeCount) -> Self {
        Self {
            environment,
            size,
            nodes,
        }
    }

    /// Column holding this run's values, e.g. `MINIO_Total`.
    pub fn column(&self, suffix: &str) -> String {
        self.environment.column(suffix)
    }
}

/// Resolves workbook paths under a report layout.
#[derive(Debug, Clone)]
pub struct Locator {
    data_dir: PathBuf,
}

impl Locator {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn for_layout(layout: &ReportLayout) -> Self {
        Self::new(layout.data_dir())
    }

    /// Expected path of the response-time workbook. Both environments share
    /// one workbook, so only size and node count matter.
    pub fn response_time_path(&self, size: &DatasetSize, nodes: NodeCount) -> PathBuf {
        let folder = size.folder();
        self.data_dir
            .join(&folder)
            .join(format!("tpc_h-{}-W-{}-node(s).xlsx", folder, nodes))
    }

    /// Expected path of a peak & spill workbook.
    pub fn peak_path(&self, metric: PeakMetric, size: &DatasetSize) -> PathBuf {
        let folder = size.folder();
        self.data_dir
            .join(&folder)
            .join(format!("{}_{}.xlsx", metric.file_stem(), folder))
    }

    /// Resolve the workbook for a run, failing if it is absent.
    pub fn locate(&self, run: &RunIdentity) -> Result<PathBuf> {
        Self::existing(self.response_time_path(&run.size, run.nodes))
    }

    /// Resolve the peak & spill workbook, failing if it is absent.
    pub fn locate_peak(&self, metric: PeakMetric, size: &DatasetSize) -> Result<PathBuf> {
        Self::existing(self.peak_path(metric, size))
    }

    fn existing(path: PathBuf) -> Result<PathBuf> {
        if path.is_file() {
            let display = path.display().to_string();
            diagnostics::info!("Resolved workbook {display}", display: display);
            Ok(path)
        } else {
            let display = path.display().to_string();
            diagnostics::warn!("Workbook not found: {display}", display: display);
            Err(ReportError::MissingFile(path))
        }
    }
}
