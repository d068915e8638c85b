// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use cmd::commands::{
    BarArgs, InspectArgs, PeakSpillArgs, RunArgs, bar_command, inspect_command, peak_spill_command,
    run_shell,
};
use cmd::common::{MetricChoice, RecordingOpener, ReportContext, TimeChoice};
use cmd::error_utils::user_message;
use regex::Regex;
use report::{DatasetSize, Locator, NodeCount, PeakMetric, ReportConfig, ReportError, ReportLayout};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn write_sheet(path: &Path, header: &[&str], rows: &[(&str, Vec<f64>)]) -> TestResult {
    std::fs::create_dir_all(path.parent().ok_or("no parent")?)?;
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (r, (label, values)) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        match label.parse::<f64>() {
            Ok(number) => sheet.write_number(r, 0, number)?,
            Err(_) => sheet.write_string(r, 0, *label)?,
        };
        for (c, value) in values.iter().enumerate() {
            sheet.write_number(r, c as u16 + 1, *value)?;
        }
    }
    workbook.save(path)?;
    Ok(())
}

fn context(dir: &TempDir) -> (ReportContext, RecordingOpener) {
    let opener = RecordingOpener::default();
    let ctx = ReportContext::with_opener(
        ReportLayout::new(dir.path(), ReportConfig::default()),
        Box::new(opener.clone()),
    );
    (ctx, opener)
}

fn write_response_times(ctx: &ReportContext) -> TestResult {
    let path = Locator::for_layout(ctx.layout())
        .response_time_path(&DatasetSize::new("1GB")?, NodeCount::new(1)?);
    write_sheet(
        &path,
        &[
            "Query",
            "HDFS_Set1",
            "HDFS_Set2",
            "MINIO_Set1",
            "MINIO_Set2",
            "HDFS_Average",
            "MINIO_Average",
            "HDFS_Total",
            "MINIO_Total",
        ],
        &[
            ("1", vec![10.0, 12.0, 8.0, 9.0, 11.0, 8.5, 22.0, 17.0]),
            ("2", vec![20.0, 22.0, 24.0, 26.0, 21.0, 25.0, 42.0, 50.0]),
            ("3", vec![5.0, 5.0, 5.0, 5.0, 5.0, 4.0, 10.0, 8.0]),
            ("Total", vec![35.0, 39.0, 37.0, 40.0, 37.0, 37.5, 74.0, 75.0]),
        ],
    )
}

fn write_cpu_peak(ctx: &ReportContext) -> TestResult {
    let path = Locator::for_layout(ctx.layout()).peak_path(PeakMetric::CpuPeak, &DatasetSize::new("1Gb")?);
    write_sheet(
        &path,
        &["Query", "CPU_Peak_HDFS(%)", "CPU_Peak_MinIO(%)"],
        &[
            ("1", vec![10.0, 12.0]),
            ("2", vec![20.0, 18.0]),
            ("3", vec![30.0, 33.0]),
        ],
    )
}

fn run_args(time: TimeChoice) -> RunArgs {
    RunArgs {
        size: "1GB".to_string(),
        nodes: 1,
        time,
    }
}

#[test]
fn test_bar_command_reports_written_chart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (ctx, opener) = context(&dir);
    write_response_times(&ctx)?;

    let args = BarArgs {
        run: run_args(TimeChoice::Total),
        queries: vec!["1".to_string(), "Q3".to_string(), "30".to_string()],
        all: false,
        total: false,
        open: true,
    };
    let mut lines = Vec::new();
    bar_command(&ctx, &args, |s| lines.push(s.trim_end().to_string()))?;

    assert_eq!(lines.first().map(String::as_str), Some("Error: Query 30 does not exist!"));
    let wrote = Regex::new(r"^Wrote .*bar_chart_files[/\\]bar_total_1gb_1nodes\.html$")?;
    assert!(lines.iter().any(|l| wrote.is_match(l)), "{:?}", lines);
    if report::render::png::fonts_available() {
        let png = Regex::new(r"^Wrote .*bar_chart_files[/\\]bar_total_1gb_1nodes\.png$")?;
        assert!(lines.iter().any(|l| png.is_match(l)), "{:?}", lines);
    }

    let opened = opener.opened();
    assert_eq!(opened.len(), 1);
    let html = std::fs::read_to_string(&opened[0])?;
    assert!(html.contains("Total Response Time per Query (1GB, 1 Node(s))"));
    Ok(())
}

#[test]
fn test_peak_command_missing_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (ctx, opener) = context(&dir);

    let args = PeakSpillArgs {
        metric: MetricChoice::Spill,
        size: "10Gb".to_string(),
        open: true,
    };
    let err = peak_spill_command(&ctx, &args, |_| {}).expect_err("no spill workbook");
    assert!(matches!(
        err.downcast_ref::<ReportError>(),
        Some(ReportError::MissingFile(_))
    ));
    let message = user_message(&err);
    assert!(message.starts_with("File not found:"));
    assert!(message.contains("spill_10Gb.xlsx"));
    assert!(opener.opened().is_empty());
    Ok(())
}

#[test]
fn test_inspect_prints_table_and_summaries() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (ctx, _) = context(&dir);
    write_response_times(&ctx)?;

    let args = InspectArgs {
        size: "1GB".to_string(),
        nodes: Some(1),
        metric: None,
    };
    let mut out = String::new();
    inspect_command(&ctx, &args, |s| out.push_str(s))?;

    assert!(out.contains("4 rows, 9 columns"));
    assert!(out.contains("Row labels: 1, 2, 3, Total"));
    assert!(out.contains("HDFS_Average"));
    // Total row excluded: (11 + 21 + 5) / 3
    assert!(out.contains("mean 12.333 s"));
    assert!(out.contains("Serverless (MinIO)"));
    Ok(())
}

#[test]
fn test_inspect_peak_workbook() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (ctx, _) = context(&dir);
    write_cpu_peak(&ctx)?;

    let args = InspectArgs {
        size: "1Gb".to_string(),
        nodes: None,
        metric: Some(MetricChoice::Cpu),
    };
    let mut out = String::new();
    inspect_command(&ctx, &args, |s| out.push_str(s))?;
    assert!(out.contains("mean 20.00"));
    Ok(())
}

#[test]
fn test_shell_generates_and_opens_peak_chart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (ctx, opener) = context(&dir);
    write_cpu_peak(&ctx)?;

    // Peak & Spill > Metric > CPU Peak > Generate
    let mut output = Vec::new();
    run_shell(&ctx, "1\n1\n2\n4\n".as_bytes(), &mut output)?;
    let out = String::from_utf8(output)?;

    assert!(out.contains("Metric: CPU Peak"));
    assert!(out.contains("cpu_peak.html"));
    let opened = opener.opened();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].ends_with("cpu_peak_files/cpu_peak.html"));
    Ok(())
}

#[test]
fn test_shell_bar_chart_then_open() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (ctx, opener) = context(&dir);
    write_response_times(&ctx)?;

    // ResponseTime > Bar Chart > Queries: Q1, Q2, Done > Generate > Open in browser
    let mut output = Vec::new();
    run_shell(&ctx, "2\n1\n1\n1\n2\n26\n5\n6\n".as_bytes(), &mut output)?;
    let out = String::from_utf8(output)?;

    assert!(out.contains("Queries: Q1, Q2"));
    let opened = opener.opened();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].ends_with("bar_chart_files/bar_average_1gb_1nodes.html"));
    assert!(out.contains(&format!("Opened {}", opened[0].display())));
    Ok(())
}

#[test]
fn test_shell_reports_missing_column() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (ctx, _) = context(&dir);
    let path = Locator::for_layout(ctx.layout())
        .response_time_path(&DatasetSize::new("1GB")?, NodeCount::new(1)?);
    write_sheet(&path, &["Query", "HDFS_Average"], &[("1", vec![3.0])])?;

    // ResponseTime > Heatmap > Generate
    let mut output = Vec::new();
    run_shell(&ctx, "2\n3\n4\n".as_bytes(), &mut output)?;
    let out = String::from_utf8(output)?;
    assert!(out.contains("Column 'MINIO_Average' not found in"));
    assert!(out.contains("Available columns: Query, HDFS_Average"));
    assert!(!ctx.layout().output_dir().exists());
    Ok(())
}
