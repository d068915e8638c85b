// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Report configuration, parsed from `benchviz.yaml` at the report root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Name of the optional configuration file looked up in the report root.
pub const CONFIG_FILE_NAME: &str = "benchviz.yaml";

/// Report configuration. Every field has a default, so an empty file
/// (or no file at all) is valid.
///
/// ```yaml
/// data_dir: .benchmark_data
/// output_dir: .generated_files
/// query_count: 22
/// dataset_sizes: ["1GB", "10GB", "20GB"]
/// peak_spill_sizes: ["1Gb", "10Gb", "20Gb"]
/// node_counts: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 15]
/// open_command: firefox
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Input tree, relative to the root unless absolute
    pub data_dir: PathBuf,
    /// Output tree, relative to the root unless absolute
    pub output_dir: PathBuf,
    /// Number of TPC-H queries considered for boxplots and heatmaps
    pub query_count: usize,
    /// Dataset sizes offered by the response-time screens
    pub dataset_sizes: Vec<String>,
    /// Dataset sizes offered by the peak & spill screen
    pub peak_spill_sizes: Vec<String>,
    /// Node counts offered by the response-time screens
    pub node_counts: Vec<u32>,
    /// Program used to open generated charts instead of the platform default
    pub open_command: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".benchmark_data"),
            output_dir: PathBuf::from(".generated_files"),
            query_count: 22,
            dataset_sizes: vec!["1GB".into(), "10GB".into(), "20GB".into()],
            peak_spill_sizes: vec!["1Gb".into(), "10Gb".into(), "20Gb".into()],
            node_counts: vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 15],
            open_command: None,
        }
    }
}

impl ReportConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ReportConfig = if content.trim().is_empty() {
            ReportConfig::default()
        } else {
            serde_yaml_ng::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Load `<root>/benchviz.yaml` when it exists, defaults otherwise.
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            diagnostics::debug!("Loading configuration from {path}", path: candidate.display().to_string());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ReportError::Configuration(
                "data_dir cannot be empty".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ReportError::Configuration(
                "output_dir cannot be empty".to_string(),
            ));
        }
        if self.query_count == 0 {
            return Err(ReportError::Configuration(
                "query_count must be greater than 0".to_string(),
            ));
        }
        if self.dataset_sizes.is_empty()
            || self.peak_spill_sizes.is_empty()
            || self.node_counts.is_empty()
        {
            return Err(ReportError::Configuration(
                "dataset_sizes, peak_spill_sizes and node_counts need at least one entry"
                    .to_string(),
            ));
        }
        if self.dataset_sizes.iter().any(|s| s.trim().is_empty())
            || self.peak_spill_sizes.iter().any(|s| s.trim().is_empty())
        {
            return Err(ReportError::Configuration(
                "dataset sizes cannot be empty strings".to_string(),
            ));
        }
        if self.node_counts.contains(&0) {
            return Err(ReportError::Configuration(
                "node counts must be greater than 0".to_string(),
            ));
        }
        if matches!(&self.open_command, Some(cmd) if cmd.trim().is_empty()) {
            return Err(ReportError::Configuration(
                "open_command cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A configuration bound to the directory it applies to.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    root: PathBuf,
    config: ReportConfig,
}

impl ReportLayout {
    pub fn new(root: impl Into<PathBuf>, config: ReportConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Layout with `<root>/benchviz.yaml` applied when present.
    pub fn discover(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = ReportConfig::load_from_root(&root)?;
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Absolute or root-relative input tree
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(&self.config.data_dir)
    }

    /// Absolute or root-relative output tree
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    pub fn query_count(&self) -> usize {
        self.config.query_count
    }
}
