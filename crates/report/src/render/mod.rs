// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Chart renderers.
//!
//! Interactive charts are written as self-contained HTML (see [`html`]),
//! static charts as PNG (see [`png`]). Every renderer is independent and
//! writes one file whose location is derived from the request; the bar
//! chart also keeps a static PNG copy next to its HTML:
//!
//! ```text
//! .generated_files/
//!     cpu_peak_files/cpu_peak.html
//!     memory_peak_files/peak_memory.html
//!     spill_files/spill.html
//!     bar_chart_files/bar_average_1gb_1nodes.html
//!     bar_chart_files/bar_average_1gb_1nodes.png
//!     boxplot_files/boxplot_all_queries_1gb_1nodes.png
//!     heatmap_files/heatmap_average_time_1GB_1nodes.png
//! ```

pub mod html;
pub mod png;

use std::path::{Path, PathBuf};

use crate::aggregate::{BoxplotMode, TimeType};
use crate::error::Result;
use crate::locator::{DatasetSize, NodeCount, PeakMetric};

/// A written chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    /// The chart to open
    pub path: PathBuf,
    /// Other files written for the same chart
    pub companions: Vec<PathBuf>,
    /// Non-fatal problems met while building the chart
    pub warnings: Vec<String>,
}

impl ChartArtifact {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            companions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_companion(mut self, path: PathBuf) -> Self {
        self.companions.push(path);
        self
    }

    /// Every file written, the main chart first.
    pub fn files(&self) -> Vec<&Path> {
        std::iter::once(self.path.as_path())
            .chain(self.companions.iter().map(PathBuf::as_path))
            .collect()
    }
}

pub fn peak_chart_path(output_dir: &Path, metric: PeakMetric) -> PathBuf {
    let (folder, file) = match metric {
        PeakMetric::CpuPeak => ("cpu_peak_files", "cpu_peak.html"),
        PeakMetric::MemoryPeak => ("memory_peak_files", "peak_memory.html"),
        PeakMetric::Spill => ("spill_files", "spill.html"),
    };
    output_dir.join(folder).join(file)
}

pub fn bar_chart_path(output_dir: &Path, time_type: TimeType, size: &DatasetSize, nodes: NodeCount) -> PathBuf {
    output_dir.join("bar_chart_files").join(format!(
        "bar_{}_{}_{}nodes.html",
        time_type.file_tag(),
        size.file_tag(),
        nodes
    ))
}

/// Static copy of the bar chart, named like its HTML.
pub fn bar_chart_png_path(output_dir: &Path, time_type: TimeType, size: &DatasetSize, nodes: NodeCount) -> PathBuf {
    bar_chart_path(output_dir, time_type, size, nodes).with_extension("png")
}

pub fn boxplot_path(output_dir: &Path, mode: BoxplotMode, size: &DatasetSize, nodes: NodeCount) -> PathBuf {
    output_dir.join("boxplot_files").join(format!(
        "boxplot_{}_{}_{}nodes.png",
        mode.file_part(),
        size.file_tag(),
        nodes
    ))
}

/// Heatmap names keep the size as typed (`heatmap_total_time_10GB_2nodes.png`).
pub fn heatmap_path(output_dir: &Path, time_type: TimeType, size: &DatasetSize, nodes: NodeCount) -> PathBuf {
    output_dir.join("heatmap_files").join(format!(
        "heatmap_{}_time_{}_{}nodes.png",
        time_type.file_tag(),
        size.label(),
        nodes
    ))
}

/// Create the parent directory of `path` if needed.
pub(crate) fn prepare_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write `contents` to `path`, replacing any previous file.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    prepare_parent(path)?;
    std::fs::write(path, contents)?;
    let display = path.display().to_string();
    let bytes = contents.len();
    diagnostics::info!("Wrote {display} ({bytes} bytes)", display: display, bytes: bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::QuerySelector;

    fn size(label: &str) -> DatasetSize {
        DatasetSize::new(label).expect("size")
    }

    fn nodes(n: u32) -> NodeCount {
        NodeCount::new(n).expect("nodes")
    }

    #[test]
    fn test_output_names() {
        let out = Path::new("/out");
        assert_eq!(
            peak_chart_path(out, PeakMetric::MemoryPeak),
            PathBuf::from("/out/memory_peak_files/peak_memory.html")
        );
        assert_eq!(
            bar_chart_path(out, TimeType::Average, &size("10GB"), nodes(3)),
            PathBuf::from("/out/bar_chart_files/bar_average_10gb_3nodes.html")
        );
        assert_eq!(
            bar_chart_png_path(out, TimeType::Total, &size("10GB"), nodes(3)),
            PathBuf::from("/out/bar_chart_files/bar_total_10gb_3nodes.png")
        );
        assert_eq!(
            boxplot_path(out, BoxplotMode::ByRepetitions(QuerySelector::Query(4)), &size("1GB"), nodes(1)),
            PathBuf::from("/out/boxplot_files/boxplot_query_query4_1gb_1nodes.png")
        );
        assert_eq!(
            boxplot_path(out, BoxplotMode::ByRepetitions(QuerySelector::Total), &size("1GB"), nodes(15)),
            PathBuf::from("/out/boxplot_files/boxplot_query_total_1gb_15nodes.png")
        );
        assert_eq!(
            heatmap_path(out, TimeType::Total, &size("20GB"), nodes(2)),
            PathBuf::from("/out/heatmap_files/heatmap_total_time_20GB_2nodes.png")
        );
    }

    #[test]
    fn test_write_file_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a").join("b").join("chart.html");
        write_file(&path, "first").expect("write");
        write_file(&path, "second").expect("overwrite");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "second");
    }

    #[test]
    fn test_artifact_warnings() {
        let artifact = ChartArtifact::new(PathBuf::from("x.html"))
            .with_warnings(vec!["Error: Query 30 does not exist!".to_string()]);
        assert_eq!(artifact.warnings.len(), 1);
        assert_eq!(artifact.files(), vec![Path::new("x.html")]);

        let artifact = artifact.with_companion(PathBuf::from("x.png"));
        assert_eq!(artifact.files(), vec![Path::new("x.html"), Path::new("x.png")]);
    }
}
