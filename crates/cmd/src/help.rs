// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Built-in user guide, one topic per module.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Overview,
    PeakSpill,
    ResponseTime,
    BarChart,
    Boxplot,
    Heatmap,
}

impl HelpTopic {
    pub const ALL: [HelpTopic; 6] = [
        HelpTopic::Overview,
        HelpTopic::PeakSpill,
        HelpTopic::ResponseTime,
        HelpTopic::BarChart,
        HelpTopic::Boxplot,
        HelpTopic::Heatmap,
    ];

    /// Name accepted by `benchviz help <topic>`.
    pub fn name(self) -> &'static str {
        match self {
            HelpTopic::Overview => "overview",
            HelpTopic::PeakSpill => "peak-spill",
            HelpTopic::ResponseTime => "response-time",
            HelpTopic::BarChart => "bar",
            HelpTopic::Boxplot => "boxplot",
            HelpTopic::Heatmap => "heatmap",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HelpTopic::Overview => "User Guide: Benchmark Visualization Tool",
            HelpTopic::PeakSpill => "User Guide: Peak & Spill",
            HelpTopic::ResponseTime => "User Guide: ResponseTime",
            HelpTopic::BarChart => "User Guide: Bar Chart",
            HelpTopic::Boxplot => "User Guide: Boxplot",
            HelpTopic::Heatmap => "User Guide: Heatmap",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            HelpTopic::Overview => OVERVIEW,
            HelpTopic::PeakSpill => PEAK_SPILL,
            HelpTopic::ResponseTime => RESPONSE_TIME,
            HelpTopic::BarChart => BAR_CHART,
            HelpTopic::Boxplot => BOXPLOT,
            HelpTopic::Heatmap => HEATMAP,
        }
    }
}

impl fmt::Display for HelpTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        writeln!(f)?;
        f.write_str(self.text())
    }
}

impl FromStr for HelpTopic {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        HelpTopic::ALL
            .into_iter()
            .find(|t| t.name().replace('-', "") == wanted)
            .or(match wanted.as_str() {
                "peak" | "spill" => Some(HelpTopic::PeakSpill),
                "response" => Some(HelpTopic::ResponseTime),
                "barchart" => Some(HelpTopic::BarChart),
                _ => None,
            })
            .ok_or_else(|| {
                let names: Vec<&str> = HelpTopic::ALL.iter().map(|t| t.name()).collect();
                anyhow!("Unknown help topic '{}'. Topics: {}", s.trim(), names.join(", "))
            })
    }
}

const OVERVIEW: &str = "\
benchviz turns TPC-H benchmark results into charts comparing a serverful
cluster (HDFS) with a serverless one (MinIO).

Modules:
  Peak & Spill   CPU peak, memory peak and disk spill per query, as
                 interactive HTML charts. Useful for spotting CPU or
                 memory saturation.
  ResponseTime   Query execution times for a dataset size and node count:
                   Bar Chart  selected queries side by side (HTML)
                   Boxplot    stability of one query over its repetitions,
                              or the spread of all queries (PNG)
                   Heatmap    every query in both environments at a
                              glance (PNG)

Input workbooks live under the data directory (default .benchmark_data),
one folder per dataset size. Charts are written under the output
directory (default .generated_files) and overwritten on every run.

Settings can be changed in benchviz.yaml at the report root:
  data_dir, output_dir, query_count, dataset_sizes, peak_spill_sizes,
  node_counts, open_command

Set BENCHVIZ_LOG=info (or debug) to log what is being read and written.
";

const PEAK_SPILL: &str = "\
1. Pick a metric: Memory Peak (highest memory use), CPU Peak (highest CPU
   use) or Spill (data written to disk because memory ran out).
2. Pick a dataset size, or choose +Add own and type one (e.g. 32Gb).
3. Generate. With \"open in browser\" on, the chart opens when ready.

Folder structure:
  .benchmark_data/
      1Gb/
          memory_peak_1Gb.xlsx
          cpu_peak_1Gb.xlsx
          spill_1Gb.xlsx
      10Gb/
          ...

Column layout (first row is the header, one row per query):
  memory_peak_<size>.xlsx   Query | Peak Memory (GiB)
  cpu_peak_<size>.xlsx      Query | CPU_Peak_HDFS(%) | CPU_Peak_MinIO(%)
  spill_<size>.xlsx         Query | HDFS_Spill(GiB) | MinIO_Spill(GiB)
Column names are matched without regard to case.

Output:
  .generated_files/memory_peak_files/peak_memory.html
  .generated_files/cpu_peak_files/cpu_peak.html
  .generated_files/spill_files/spill.html
";

const RESPONSE_TIME: &str = "\
Response-time charts read one workbook per dataset size and node count:

  .benchmark_data/<size>/tpc_h-<size>-W-<nodes>-node(s).xlsx

where GB in the size is written Gb (1GB -> 1Gb/tpc_h-1Gb-W-1-node(s).xlsx).
Both environments share the workbook:

  Query | HDFS_Set1 ... HDFS_SetN | MINIO_Set1 ... MINIO_SetN |
        HDFS_Average | MINIO_Average | HDFS_Total | MINIO_Total

One row per query (1 to 22) followed by a row labelled Total.
The repetition columns are only needed for repetition boxplots.

Charts: Bar Chart, Boxplot, Heatmap. Each has its own help page.
";

const BAR_CHART: &str = "\
1. Choose queries: toggle individual queries, select or deselect all.
   Total compares the summary row and cannot be combined with single
   queries; choosing it clears the others and vice versa.
2. Choose dataset size and number of nodes (+Add own for other values).
3. Choose Average Time or Total Time.
4. Generate. Queries missing from the workbook are skipped with a
   warning.

Hovering a bar shows the exact time and how much faster or slower that
environment is: difference = (HDFS - MinIO) / HDFS * 100.

Output: .generated_files/bar_chart_files/bar_<average|total>_<size>_<nodes>nodes.html
";

const BOXPLOT: &str = "\
Two modes:
  Repetitions  distribution of one query (or Total) over its repetitions,
               read from the HDFS_Set* and MINIO_Set* columns. Shows how
               stable a query is and whether it has outliers.
  Queries      distribution of the Average or Total time of all queries.

A panel next to the plot lists median, lower and upper quartile,
interquartile range, minimum and maximum for each environment.

Output: .generated_files/boxplot_files/boxplot_<query_queryN|query_total|all_queries>_<size>_<nodes>nodes.png
";

const HEATMAP: &str = "\
One row per environment (HDFS, MINIO), one column per query. Darker cells
are slower (yellow-orange-red scale); blank cells are grey. The colorbar
shows response time in seconds.

Choose dataset size, number of nodes and Average Time or Total Time, then
generate.

Output: .generated_files/heatmap_files/heatmap_<average_time|total_time>_<size>_<nodes>nodes.png
";
