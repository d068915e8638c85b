// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Maud HTML charts.
//!
//! Each chart is a single self-contained page: an inline SVG grouped bar
//! chart (every bar carries a `<title>` tooltip) followed by a table of the
//! plotted numbers. No scripts, no external assets.

use maud::{DOCTYPE, Markup, html};

use crate::aggregate::{BarChartData, PeakChartData};
use crate::locator::{DatasetSize, Environment, NodeCount};

/// Version baked into generated HTML as `<meta name="generator">`.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 520.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;
const Y_TICKS: usize = 5;

/// Page and plot colors.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: &'static str,
    pub foreground: &'static str,
    pub axis: &'static str,
    pub grid: &'static str,
    pub panel: &'static str,
}

pub const LIGHT: Theme = Theme {
    background: "#FFFFFF",
    foreground: "#2A3F5F",
    axis: "#444444",
    grid: "#E5ECF6",
    panel: "#F7F9FC",
};

pub const DARK: Theme = Theme {
    background: "#1C2526",
    foreground: "#FFFFFF",
    axis: "#FFFFFF",
    grid: "#2E3B3C",
    panel: "#2E3B3C",
};

/// One plotted series.
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub name: String,
    pub color: String,
    pub outline: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Bar {
    /// `None` leaves a gap
    pub value: Option<f64>,
    /// Tooltip lines
    pub tooltip: Vec<String>,
}

/// Bars sharing one x position, one per series.
#[derive(Debug, Clone)]
pub struct BarGroup {
    pub label: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone)]
pub struct GroupedBars {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<SeriesStyle>,
    pub groups: Vec<BarGroup>,
    pub y_range: (f64, f64),
    pub theme: Theme,
}

impl GroupedBars {
    fn plot_width(&self) -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height(&self) -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    /// Pixel y of a data value, clamped to the plot area.
    fn y(&self, value: f64) -> f64 {
        let (lo, hi) = self.y_range;
        let span = if hi > lo { hi - lo } else { 1.0 };
        let fraction = ((value - lo) / span).clamp(0.0, 1.0);
        MARGIN_TOP + self.plot_height() * (1.0 - fraction)
    }

    fn ticks(&self) -> Vec<f64> {
        let (lo, hi) = self.y_range;
        (0..=Y_TICKS)
            .map(|i| lo + (hi - lo) * i as f64 / Y_TICKS as f64)
            .collect()
    }
}

fn tick_label(value: f64, span: f64) -> String {
    if span >= 50.0 {
        format!("{:.0}", value)
    } else if span >= 5.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Render the grouped bar chart as inline SVG.
pub fn grouped_bar_svg(chart: &GroupedBars) -> Markup {
    let theme = chart.theme;
    let groups = chart.groups.len().max(1) as f64;
    let group_width = chart.plot_width() / groups;
    let series = chart.series.len().max(1) as f64;
    let bar_width = group_width * 0.8 / series;
    let baseline = chart.y(chart.y_range.0);
    let span = chart.y_range.1 - chart.y_range.0;
    let legend_x = WIDTH - MARGIN_RIGHT - 200.0;

    html! {
        svg xmlns="http://www.w3.org/2000/svg" class="chart" width=(WIDTH) height=(HEIGHT)
            viewBox=(format!("0 0 {} {}", WIDTH, HEIGHT)) role="img" {
            rect x="0" y="0" width=(WIDTH) height=(HEIGHT) fill=(theme.background) {}
            text x=(WIDTH / 2.0) y="28" text-anchor="middle" font-size="16" fill=(theme.foreground) {
                (chart.title)
            }
            @for tick in chart.ticks() {
                @let y = chart.y(tick);
                line x1=(MARGIN_LEFT) x2=(WIDTH - MARGIN_RIGHT) y1=(y) y2=(y) stroke=(theme.grid) {}
                text x=(MARGIN_LEFT - 8.0) y=(y + 4.0) text-anchor="end" font-size="11" fill=(theme.foreground) {
                    (tick_label(tick, span))
                }
            }
            line x1=(MARGIN_LEFT) x2=(MARGIN_LEFT) y1=(MARGIN_TOP) y2=(baseline) stroke=(theme.axis) {}
            line x1=(MARGIN_LEFT) x2=(WIDTH - MARGIN_RIGHT) y1=(baseline) y2=(baseline) stroke=(theme.axis) {}
            @for (index, group) in chart.groups.iter().enumerate() {
                @let group_x = MARGIN_LEFT + index as f64 * group_width;
                g class="group" {
                    @for (s, bar) in group.bars.iter().enumerate() {
                        @if let (Some(value), Some(style)) = (bar.value, chart.series.get(s)) {
                            @let top = chart.y(value);
                            rect class="bar"
                                x=(format!("{:.2}", group_x + group_width * 0.1 + s as f64 * bar_width))
                                y=(format!("{:.2}", top))
                                width=(format!("{:.2}", bar_width))
                                height=(format!("{:.2}", (baseline - top).max(0.0)))
                                fill=(style.color)
                                stroke=[style.outline.as_deref()] {
                                title { (bar.tooltip.join("\n")) }
                            }
                        }
                    }
                    text x=(format!("{:.2}", group_x + group_width / 2.0)) y=(baseline + 18.0)
                        text-anchor="middle" font-size="11" fill=(theme.foreground) {
                        (group.label)
                    }
                }
            }
            text x=(MARGIN_LEFT + chart.plot_width() / 2.0) y=(HEIGHT - 20.0) text-anchor="middle"
                font-size="13" fill=(theme.foreground) {
                (chart.x_title)
            }
            text x="20" y=(MARGIN_TOP + chart.plot_height() / 2.0) text-anchor="middle" font-size="13"
                fill=(theme.foreground)
                transform=(format!("rotate(-90 20 {})", MARGIN_TOP + chart.plot_height() / 2.0)) {
                (chart.y_title)
            }
            g class="legend" {
                rect x=(legend_x - 10.0) y=(MARGIN_TOP - 5.0) width="210"
                    height=(chart.series.len() as f64 * 20.0 + 10.0)
                    fill=(theme.panel) stroke=(theme.axis) stroke-width="0.5" {}
                @for (s, style) in chart.series.iter().enumerate() {
                    @let y = MARGIN_TOP + 10.0 + s as f64 * 20.0;
                    rect x=(legend_x) y=(y - 9.0) width="12" height="12" fill=(style.color) {}
                    text x=(legend_x + 18.0) y=(y + 2.0) font-size="12" fill=(theme.foreground) {
                        (style.name)
                    }
                }
            }
        }
    }
}

/// Wrap chart content in a complete HTML document.
fn page(title: &str, theme: Theme, content: Markup) -> Markup {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="generator" content=(format!("benchviz v{}", VERSION));
                title { (title) }
                style {
                    (format!(
                        "body {{ background: {bg}; color: {fg}; font-family: Helvetica, Arial, sans-serif; margin: 2em; }}\n\
                         table {{ border-collapse: collapse; margin-top: 1.5em; }}\n\
                         th, td {{ border: 1px solid {grid}; padding: 4px 10px; text-align: right; }}\n\
                         th {{ background: {panel}; }}\n\
                         .bar:hover {{ opacity: 0.75; }}\n\
                         .warnings {{ color: #E53935; }}\n\
                         footer {{ margin-top: 2em; font-size: 0.8em; opacity: 0.7; }}",
                        bg = theme.background,
                        fg = theme.foreground,
                        grid = theme.grid,
                        panel = theme.panel,
                    ))
                }
            }
            body {
                main {
                    (content)
                }
                footer { "Generated " (generated) }
            }
        }
    }
}

fn format_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, unit),
        None => "-".to_string(),
    }
}

/// Peak & spill chart page.
pub fn peak_chart_html(data: &PeakChartData, size: &DatasetSize) -> String {
    let peak = data
        .series
        .iter()
        .filter_map(|s| s.summary.map(|summary| summary.max))
        .fold(0.0_f64, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let chart = GroupedBars {
        title: format!("{} ({})", data.title, size),
        x_title: "Query".to_string(),
        y_title: data.y_title.clone(),
        series: data
            .series
            .iter()
            .map(|s| SeriesStyle {
                name: s.name.clone(),
                color: s.color.clone(),
                outline: None,
            })
            .collect(),
        groups: data
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| BarGroup {
                label: label.clone(),
                bars: data
                    .series
                    .iter()
                    .map(|s| {
                        let value = s.values.get(i).copied().flatten();
                        Bar {
                            value,
                            tooltip: vec![
                                format!("Query {}", data.query_labels.get(i).map(String::as_str).unwrap_or_default()),
                                format!("{}: {}", s.short_name, format_value(value, &data.unit)),
                            ],
                        }
                    })
                    .collect(),
            })
            .collect(),
        y_range: (0.0, y_max),
        theme: LIGHT,
    };

    let content = html! {
        (grouped_bar_svg(&chart))
        table class="values" {
            thead {
                tr {
                    th { "Query" }
                    @for s in &data.series { th { (s.name) } }
                }
            }
            tbody {
                @for (i, label) in data.query_labels.iter().enumerate() {
                    tr {
                        td { (label) }
                        @for s in &data.series {
                            td { (format_value(s.values.get(i).copied().flatten(), &data.unit)) }
                        }
                    }
                }
            }
            tfoot {
                tr {
                    th { "Average" }
                    @for s in &data.series { th { (format_value(s.summary.map(|m| m.mean), &data.unit)) } }
                }
                tr {
                    th { "Peak" }
                    @for s in &data.series { th { (format_value(s.summary.map(|m| m.max), &data.unit)) } }
                }
            }
        }
    };
    page(&chart.title, LIGHT, content).into_string()
}

/// Response-time bar chart page.
pub fn bar_chart_html(data: &BarChartData, size: &DatasetSize, nodes: NodeCount) -> String {
    let chart = GroupedBars {
        title: data.title(size, nodes),
        x_title: "Query".to_string(),
        y_title: data.y_title(),
        series: vec![
            SeriesStyle {
                name: Environment::Serverful.label().to_string(),
                color: Environment::Serverful.color().to_string(),
                outline: Some("#006600".to_string()),
            },
            SeriesStyle {
                name: Environment::Serverless.label().to_string(),
                color: Environment::Serverless.color().to_string(),
                outline: Some("#01579B".to_string()),
            },
        ],
        groups: data
            .entries
            .iter()
            .map(|entry| BarGroup {
                label: entry.label.clone(),
                bars: Environment::ALL
                    .iter()
                    .map(|&env| Bar {
                        value: Some(entry.value(env)),
                        tooltip: entry.hover_lines(env),
                    })
                    .collect(),
            })
            .collect(),
        y_range: data.y_range(),
        theme: DARK,
    };

    let content = html! {
        (grouped_bar_svg(&chart))
        @if !data.warnings.is_empty() {
            ul class="warnings" {
                @for warning in &data.warnings { li { (warning) } }
            }
        }
        table class="values" {
            thead {
                tr {
                    th { "Query" }
                    th { (Environment::Serverful.label()) " (s)" }
                    th { (Environment::Serverless.label()) " (s)" }
                    th { "Difference" }
                }
            }
            tbody {
                @for entry in &data.entries {
                    tr {
                        td { (entry.label) }
                        td { (format!("{:.6}", entry.hdfs)) }
                        td { (format!("{:.6}", entry.minio)) }
                        td { (entry.comparison()) }
                    }
                }
            }
        }
    };
    page(&chart.title, DARK, content).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{BarEntry, PeakSeries, TimeType};
    use crate::locator::PeakMetric;
    use crate::stats::Summary;

    fn bar_data() -> BarChartData {
        BarChartData {
            time_type: TimeType::Average,
            entries: vec![
                BarEntry {
                    label: "Q1".into(),
                    hdfs: 10.0,
                    minio: 8.0,
                },
                BarEntry {
                    label: "Q2".into(),
                    hdfs: 5.0,
                    minio: 6.0,
                },
            ],
            warnings: vec!["Error: Query 40 does not exist!".into()],
        }
    }

    #[test]
    fn test_bar_chart_page() {
        let size = DatasetSize::new("1GB").expect("size");
        let nodes = NodeCount::new(2).expect("nodes");
        let page = bar_chart_html(&bar_data(), &size, nodes);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("Average Response Time per Query (1GB, 2 Node(s))"));
        assert!(page.contains("#00C853"));
        assert!(page.contains("#0288D1"));
        assert!(page.contains("#1C2526"));
        assert!(page.contains("MinIO is 20.00% faster than HDFS"));
        assert!(page.contains("HDFS 20.00% faster than MinIO"));
        assert!(page.contains("Error: Query 40 does not exist!"));
        assert_eq!(page.matches("class=\"bar\"").count(), 4);
    }

    #[test]
    fn test_peak_chart_page() {
        let data = PeakChartData {
            metric: PeakMetric::CpuPeak,
            title: "CPU Peak (%) HDFS vs MinIO".into(),
            y_title: "CPU Peak (%)".into(),
            unit: "%".into(),
            labels: vec!["Q1".into(), "Q2".into()],
            query_labels: vec!["1".into(), "2".into()],
            series: vec![PeakSeries {
                name: "CPU Peak HDFS (%)".into(),
                short_name: "HDFS".into(),
                color: "red".into(),
                values: vec![Some(40.0), None],
                summary: Summary::of_values(&[40.0]),
            }],
        };
        let size = DatasetSize::new("1Gb").expect("size");
        let page = peak_chart_html(&data, &size);
        assert!(page.contains("CPU Peak (%) HDFS vs MinIO (1Gb)"));
        assert!(page.contains("HDFS: 40.00%"));
        // blank cell: no bar, dash in the table
        assert_eq!(page.matches("class=\"bar\"").count(), 1);
        assert!(page.contains("<td>-</td>"));
        assert!(page.contains("Peak"));
    }

    #[test]
    fn test_y_scale_clamps() {
        let chart = GroupedBars {
            title: String::new(),
            x_title: String::new(),
            y_title: String::new(),
            series: vec![],
            groups: vec![],
            y_range: (10.0, 20.0),
            theme: LIGHT,
        };
        assert_eq!(chart.y(20.0), MARGIN_TOP);
        assert_eq!(chart.y(5.0), chart.y(10.0));
        assert_eq!(chart.ticks().len(), Y_TICKS + 1);
    }
}
