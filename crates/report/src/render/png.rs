// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Static PNG charts drawn with plotters.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::aggregate::{BarChartData, BoxplotData, HeatmapGrid};
use crate::error::{ReportError, Result};
use crate::locator::Environment;
use crate::render::prepare_parent;
use crate::stats::BoxStats;

const FONT: &str = "sans-serif";

/// matplotlib's 9-class YlOrRd, light to dark.
const YLORRD: [(u8, u8, u8); 9] = [
    (0xFF, 0xFF, 0xCC),
    (0xFF, 0xED, 0xA0),
    (0xFE, 0xD9, 0x76),
    (0xFE, 0xB2, 0x4C),
    (0xFD, 0x8D, 0x3C),
    (0xFC, 0x4E, 0x2A),
    (0xE3, 0x1A, 0x1C),
    (0xBD, 0x00, 0x26),
    (0x80, 0x00, 0x26),
];

const BLANK_CELL: RGBColor = RGBColor(0xDD, 0xDD, 0xDD);

fn environment_color(environment: Environment) -> RGBColor {
    match environment {
        Environment::Serverful => RGBColor(0x00, 0xC8, 0x53),
        Environment::Serverless => RGBColor(0x02, 0x88, 0xD1),
    }
}

/// Color for `t` in `[0, 1]` on the YlOrRd scale.
pub(crate) fn ylorrd(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (YLORRD.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(YLORRD.len() - 1);
    let frac = scaled - lower as f64;
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (YLORRD[lower], YLORRD[upper]);
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Whether the sans-serif family resolves to a usable system font.
/// Every chart here draws text, so nothing renders without one.
pub fn fonts_available() -> bool {
    (FONT, 12).into_font().box_size("0").is_ok()
}

/// Lines of the statistics panel next to a boxplot.
pub fn stats_lines(environment: Environment, stats: &BoxStats) -> Vec<String> {
    vec![
        format!("{} Stats:", environment.storage()),
        format!("Median: {:.2} s", stats.median),
        format!("Lower Quartile: {:.2} s", stats.q1),
        format!("Upper Quartile: {:.2} s", stats.q3),
        format!("Interquartile Range: {:.2} s", stats.iqr),
        format!("Min: {:.2} s", stats.min),
        format!("Max: {:.2} s", stats.max),
    ]
}

/// Draw one box per environment with a statistics panel on the right.
pub fn boxplot_png(data: &BoxplotData, title: &str, path: &Path) -> Result<()> {
    if data.distributions.is_empty() {
        return Err(ReportError::NoData("nothing to plot".to_string()));
    }
    prepare_parent(path)?;

    let root = BitMapBackend::new(path, (1100, 620)).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot_area, stats_area) = root.split_horizontally(820);

    let labels: Vec<String> = data
        .distributions
        .iter()
        .map(|d| d.environment.label().to_string())
        .collect();
    let (lo, hi) = data
        .distributions
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d.stats.min), hi.max(d.stats.max))
        });
    let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
    let y_range = ((lo - pad).max(0.0) as f32)..((hi + pad) as f32);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(title, (FONT, 18).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(labels[..].into_segmented(), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Environment")
        .y_desc("Response Time (seconds)")
        .x_label_formatter(&|v| match v {
            SegmentValue::Exact(label) | SegmentValue::CenterOf(label) => label.to_string(),
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(data.distributions.iter().zip(&labels).map(|(d, label)| {
        Boxplot::new_vertical(SegmentValue::CenterOf(label), &Quartiles::new(&d.values))
            .width(60)
            .whisker_width(0.5)
            .style(environment_color(d.environment))
    }))?;

    let text = (FONT, 15).into_font().color(&BLACK);
    let mut y = 60;
    for d in &data.distributions {
        for line in stats_lines(d.environment, &d.stats) {
            stats_area.draw_text(&line, &text, (10, y))?;
            y += 22;
        }
        y += 22;
    }

    root.present()?;
    let display = path.display().to_string();
    diagnostics::info!("Wrote boxplot {display}", display: display);
    Ok(())
}

const BAR_WIDTH: f64 = 0.4;

/// Draw one HDFS and one MinIO bar per selected query.
pub fn bar_chart_png(data: &BarChartData, title: &str, y_title: &str, path: &Path) -> Result<()> {
    if data.entries.is_empty() {
        return Err(ReportError::NoData("no bars to draw".to_string()));
    }
    prepare_parent(path)?;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let (y_min, y_max) = data.y_range();
    let x_max = data.entries.len() as f64 - 0.5;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 20).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Query")
        .y_desc(y_title)
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| format!("{:.1}", y))
        .draw()?;

    for (slot, &environment) in Environment::ALL.iter().enumerate() {
        let color = environment_color(environment);
        let offset = (slot as f64 - 1.0) * BAR_WIDTH;
        chart
            .draw_series(data.entries.iter().enumerate().map(|(i, entry)| {
                let x0 = i as f64 + offset;
                Rectangle::new(
                    [(x0, y_min), (x0 + BAR_WIDTH, entry.value(environment))],
                    color.filled(),
                )
            }))?
            .label(environment.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
    }

    // query labels under each group
    let label_style = (FONT, 14).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Top));
    for (i, entry) in data.entries.iter().enumerate() {
        let (x, y) = chart.plotting_area().map_coordinate(&(i as f64, y_min));
        root.draw_text(&entry.label, &label_style, (x, y + 8))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    let display = path.display().to_string();
    let bars = data.entries.len() * Environment::ALL.len();
    diagnostics::info!("Wrote bar chart {display} ({bars} bars)", display: display, bars: bars);
    Ok(())
}

const HEATMAP_WIDTH: u32 = 1300;
const HEATMAP_HEIGHT: u32 = 460;
const HEAT_LEFT: i32 = 110;
const HEAT_RIGHT: i32 = 170;
const HEAT_TOP: i32 = 60;
const HEAT_BOTTOM: i32 = 80;
const COLORBAR_STEPS: i32 = 60;

/// Draw an environments × queries grid with a colorbar.
pub fn heatmap_png(grid: &HeatmapGrid, title: &str, path: &Path) -> Result<()> {
    if grid.queries.is_empty() || grid.rows.is_empty() {
        return Err(ReportError::NoData("heatmap has no cells".to_string()));
    }
    prepare_parent(path)?;

    let root = BitMapBackend::new(path, (HEATMAP_WIDTH, HEATMAP_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let grid_right = HEATMAP_WIDTH as i32 - HEAT_RIGHT;
    let grid_bottom = HEATMAP_HEIGHT as i32 - HEAT_BOTTOM;
    let cell_w = (grid_right - HEAT_LEFT) / grid.queries.len() as i32;
    let cell_h = (grid_bottom - HEAT_TOP) / grid.rows.len() as i32;
    let span = if grid.max > grid.min { grid.max - grid.min } else { 1.0 };

    let centered = Pos::new(HPos::Center, VPos::Center);
    let title_style = (FONT, 18).into_font().color(&BLACK).pos(centered);
    let label_style = (FONT, 13).into_font().color(&BLACK).pos(centered);
    let axis_style = (FONT, 15).into_font().color(&BLACK).pos(centered);

    root.draw_text(title, &title_style, (HEATMAP_WIDTH as i32 / 2, HEAT_TOP / 2))?;

    for (r, (environment, cells)) in grid.rows.iter().enumerate() {
        let y0 = HEAT_TOP + r as i32 * cell_h;
        for (c, cell) in cells.iter().enumerate() {
            let x0 = HEAT_LEFT + c as i32 * cell_w;
            let color = match cell {
                Some(v) => ylorrd((v - grid.min) / span),
                None => BLANK_CELL,
            };
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell_w, y0 + cell_h)], color.filled()))?;
        }
        root.draw_text(
            environment.column_prefix(),
            &label_style,
            (HEAT_LEFT - 35, y0 + cell_h / 2),
        )?;
    }
    root.draw(&Rectangle::new(
        [(HEAT_LEFT, HEAT_TOP), (HEAT_LEFT + cell_w * grid.queries.len() as i32, HEAT_TOP + cell_h * grid.rows.len() as i32)],
        BLACK.stroke_width(1),
    ))?;

    for (c, query) in grid.queries.iter().enumerate() {
        let x = HEAT_LEFT + c as i32 * cell_w + cell_w / 2;
        root.draw_text(&query.to_string(), &label_style, (x, grid_bottom + 14))?;
    }
    root.draw_text(
        "Query Number",
        &axis_style,
        ((HEAT_LEFT + grid_right) / 2, grid_bottom + 45),
    )?;
    root.draw_text(
        "Server Type",
        &axis_style.transform(FontTransform::Rotate270),
        (25, (HEAT_TOP + grid_bottom) / 2),
    )?;

    // colorbar: dark (max) at the top
    let bar_x0 = grid_right + 30;
    let bar_x1 = bar_x0 + 25;
    let bar_height = grid_bottom - HEAT_TOP;
    for step in 0..COLORBAR_STEPS {
        let y0 = HEAT_TOP + bar_height * step / COLORBAR_STEPS;
        let y1 = HEAT_TOP + bar_height * (step + 1) / COLORBAR_STEPS;
        let t = 1.0 - (step as f64 + 0.5) / COLORBAR_STEPS as f64;
        root.draw(&Rectangle::new([(bar_x0, y0), (bar_x1, y1)], ylorrd(t).filled()))?;
    }
    root.draw(&Rectangle::new([(bar_x0, HEAT_TOP), (bar_x1, grid_bottom)], BLACK.stroke_width(1)))?;

    let tick_style = (FONT, 12).into_font().color(&BLACK).pos(Pos::new(HPos::Left, VPos::Center));
    for i in 0..=4 {
        let fraction = i as f64 / 4.0;
        let value = grid.min + (grid.max - grid.min) * fraction;
        let y = grid_bottom - (bar_height as f64 * fraction) as i32;
        root.draw(&PathElement::new(vec![(bar_x1, y), (bar_x1 + 5, y)], BLACK))?;
        root.draw_text(&format!("{:.2}", value), &tick_style, (bar_x1 + 8, y))?;
    }
    root.draw_text(
        "Response Time (s)",
        &axis_style.transform(FontTransform::Rotate90),
        (bar_x1 + 85, (HEAT_TOP + grid_bottom) / 2),
    )?;

    root.present()?;
    let display = path.display().to_string();
    diagnostics::info!("Wrote heatmap {display}", display: display);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{BarEntry, BoxplotMode, Distribution, QuerySelector, TimeType};

    #[test]
    fn test_ylorrd_endpoints() {
        assert_eq!(ylorrd(0.0), RGBColor(0xFF, 0xFF, 0xCC));
        assert_eq!(ylorrd(1.0), RGBColor(0x80, 0x00, 0x26));
        assert_eq!(ylorrd(f64::NAN), ylorrd(0.0));
        assert_eq!(ylorrd(2.0), ylorrd(1.0));
    }

    #[test]
    fn test_ylorrd_darkens() {
        let light = ylorrd(0.2);
        let dark = ylorrd(0.8);
        assert!(u32::from(light.1) > u32::from(dark.1));
    }

    #[test]
    fn test_stats_lines() {
        let stats = BoxStats::of_values(&[1.0, 2.0, 3.0, 4.0]).expect("stats");
        let lines = stats_lines(Environment::Serverless, &stats);
        assert_eq!(lines[0], "MinIO Stats:");
        assert_eq!(lines[1], "Median: 2.50 s");
        assert_eq!(lines[4], "Interquartile Range: 1.50 s");
    }

    #[test]
    fn test_empty_heatmap_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let grid = HeatmapGrid {
            time_type: TimeType::Average,
            queries: vec![],
            rows: vec![],
            min: 0.0,
            max: 0.0,
        };
        let path = dir.path().join("heatmap.png");
        assert!(heatmap_png(&grid, "empty", &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_bar_chart_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data = BarChartData {
            time_type: TimeType::Average,
            entries: vec![],
            warnings: vec![],
        };
        let path = dir.path().join("bar.png");
        assert!(bar_chart_png(&data, "empty", "seconds", &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_boxplot_png_written() {
        // text needs a system sans-serif font
        if !fonts_available() {
            return;
        }
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("boxplot_files").join("boxplot.png");
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let data = BoxplotData {
            mode: BoxplotMode::ByRepetitions(QuerySelector::Query(1)),
            distributions: Environment::ALL
                .iter()
                .map(|&environment| Distribution {
                    environment,
                    values: values.clone(),
                    stats: BoxStats::of_values(&values).expect("stats"),
                })
                .collect(),
        };
        boxplot_png(&data, "Time distribution for Query 1", &path).expect("render");
        assert!(path.is_file());
    }

    #[test]
    fn test_heatmap_png_written() {
        if !fonts_available() {
            return;
        }
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("heatmap.png");
        let grid = HeatmapGrid {
            time_type: TimeType::Total,
            queries: vec![1, 2, 3],
            rows: vec![
                (Environment::Serverful, vec![Some(1.0), Some(2.0), None]),
                (Environment::Serverless, vec![Some(3.0), Some(0.5), Some(2.5)]),
            ],
            min: 0.5,
            max: 3.0,
        };
        heatmap_png(&grid, "Total Time Heatmap (1GB, 1 node(s))", &path).expect("render");
        assert!(path.is_file());
    }

    #[test]
    fn test_bar_chart_png_written() {
        if !fonts_available() {
            return;
        }
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bar_chart_files").join("bar_total_1gb_1nodes.png");
        let data = BarChartData {
            time_type: TimeType::Total,
            entries: vec![
                BarEntry { label: "Q1".into(), hdfs: 22.0, minio: 17.0 },
                BarEntry { label: "Q2".into(), hdfs: 42.0, minio: 50.0 },
            ],
            warnings: vec![],
        };
        bar_chart_png(&data, "Total Response Time per Query", "Total Response Time (seconds)", &path)
            .expect("render");
        assert!(std::fs::metadata(&path).expect("metadata").len() > 0);
    }
}
