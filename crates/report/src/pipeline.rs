// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! One entry point per chart: locate, load, aggregate, render.
//!
//! A missing workbook stops the run before anything is loaded, a missing
//! column stops it before anything is rendered, so a failed run never
//! leaves a partial chart behind.

use crate::aggregate::{self, BoxplotMode, QuerySelector, TimeType};
use crate::config::ReportLayout;
use crate::error::Result;
use crate::loader::{MetricTable, load_workbook};
use crate::locator::{DatasetSize, Environment, Locator, NodeCount, PeakMetric, RunIdentity};
use crate::render::{self, ChartArtifact, html, png};

/// Response-time bar chart request.
#[derive(Debug, Clone)]
pub struct BarChartRequest {
    pub size: DatasetSize,
    pub nodes: NodeCount,
    pub time_type: TimeType,
    pub selection: Vec<QuerySelector>,
}

#[derive(Debug, Clone)]
pub struct BoxplotRequest {
    pub size: DatasetSize,
    pub nodes: NodeCount,
    pub time_type: TimeType,
    pub mode: BoxplotMode,
}

#[derive(Debug, Clone)]
pub struct HeatmapRequest {
    pub size: DatasetSize,
    pub nodes: NodeCount,
    pub time_type: TimeType,
}

/// Load the response-time workbook shared by both environments.
pub fn load_response_times(layout: &ReportLayout, size: &DatasetSize, nodes: NodeCount) -> Result<MetricTable> {
    let run = RunIdentity::new(Environment::Serverful, size.clone(), nodes);
    let path = Locator::for_layout(layout).locate(&run)?;
    load_workbook(&path)
}

pub fn load_peak(layout: &ReportLayout, metric: PeakMetric, size: &DatasetSize) -> Result<MetricTable> {
    let path = Locator::for_layout(layout).locate_peak(metric, size)?;
    load_workbook(&path)
}

/// Memory peak, CPU peak or spill chart for one dataset size.
pub fn generate_peak_chart(layout: &ReportLayout, metric: PeakMetric, size: &DatasetSize) -> Result<ChartArtifact> {
    let table = load_peak(layout, metric, size)?;
    let data = aggregate::peak_chart_data(&table, metric)?;
    let path = render::peak_chart_path(&layout.output_dir(), metric);
    render::write_file(&path, &html::peak_chart_html(&data, size))?;
    Ok(ChartArtifact::new(path))
}

/// Interactive HTML bar chart plus its static PNG copy.
///
/// The PNG is best effort: when it cannot be drawn the HTML is still
/// written and the reason is reported as a warning.
pub fn generate_bar_chart(layout: &ReportLayout, request: &BarChartRequest) -> Result<ChartArtifact> {
    let table = load_response_times(layout, &request.size, request.nodes)?;
    let data = aggregate::bar_chart_data(&table, &request.selection, request.time_type)?;
    let output_dir = layout.output_dir();
    let path = render::bar_chart_path(&output_dir, request.time_type, &request.size, request.nodes);
    let png_path = render::bar_chart_png_path(&output_dir, request.time_type, &request.size, request.nodes);

    let mut warnings = data.warnings.clone();
    let png_written = if !png::fonts_available() {
        warnings.push("PNG export skipped: no system font available".to_string());
        false
    } else {
        let title = data.title(&request.size, request.nodes);
        match png::bar_chart_png(&data, &title, &data.y_title(), &png_path) {
            Ok(()) => true,
            Err(err) => {
                let message = err.to_string();
                diagnostics::warn!("Bar chart PNG failed: {message}", message: message);
                // drop a half-written image
                let _ = std::fs::remove_file(&png_path);
                warnings.push(format!(
                    "Error during PNG file saving for {}, {} nodes: {}",
                    request.size, request.nodes, err
                ));
                false
            }
        }
    };

    render::write_file(&path, &html::bar_chart_html(&data, &request.size, request.nodes))?;
    let artifact = ChartArtifact::new(path).with_warnings(warnings);
    Ok(if png_written {
        artifact.with_companion(png_path)
    } else {
        artifact
    })
}

pub fn generate_boxplot(layout: &ReportLayout, request: &BoxplotRequest) -> Result<ChartArtifact> {
    let table = load_response_times(layout, &request.size, request.nodes)?;
    let data = aggregate::boxplot_data(&table, request.mode, request.time_type, layout.query_count())?;
    let title = match request.mode {
        BoxplotMode::ByRepetitions(selector) => format!(
            "Time distribution for {} ({}, {} nodes)",
            selector, request.size, request.nodes
        ),
        BoxplotMode::ByQueries => format!(
            "Distribution of response time for all queries ({}, {} nodes)",
            request.size, request.nodes
        ),
    };
    let path = render::boxplot_path(&layout.output_dir(), request.mode, &request.size, request.nodes);
    png::boxplot_png(&data, &title, &path)?;
    Ok(ChartArtifact::new(path))
}

pub fn generate_heatmap(layout: &ReportLayout, request: &HeatmapRequest) -> Result<ChartArtifact> {
    let table = load_response_times(layout, &request.size, request.nodes)?;
    let grid = aggregate::heatmap_grid(&table, request.time_type, layout.query_count())?;
    let title = format!(
        "{} Heatmap ({}, {} node(s))",
        request.time_type, request.size, request.nodes
    );
    let path = render::heatmap_path(&layout.output_dir(), request.time_type, &request.size, request.nodes);
    png::heatmap_png(&grid, &title, &path)?;
    Ok(ChartArtifact::new(path))
}
