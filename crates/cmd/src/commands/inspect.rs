// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, bail};
use arrow::util::pretty::pretty_format_batches;
use clap::Args;
use report::aggregate::{column_summary, environment_summary};
use report::pipeline::{load_peak, load_response_times};
use report::{DatasetSize, Environment, MetricTable, NodeCount, TimeType};

use crate::common::{MetricChoice, ReportContext};

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Dataset size, e.g. 1GB
    #[arg(short, long)]
    pub size: String,

    /// Node count of a response-time workbook
    #[arg(short, long, conflicts_with = "metric")]
    pub nodes: Option<u32>,

    /// Peak & spill workbook to inspect instead
    #[arg(short, long, value_enum)]
    pub metric: Option<MetricChoice>,
}

/// Print a workbook as loaded, followed by its column summaries.
pub fn inspect_command<F>(ctx: &ReportContext, args: &InspectArgs, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let size = DatasetSize::new(&args.size)?;
    match (args.metric, args.nodes) {
        (Some(metric), _) => {
            let table = load_peak(ctx.layout(), metric.into(), &size)?;
            print_table(&table, &mut handler)?;
            for name in table.column_names().iter().skip(1) {
                if let Ok(summary) = column_summary(&table, name) {
                    handler(&format!(
                        "{:<24} mean {:.2}  min {:.2}  max {:.2}\n",
                        name, summary.mean, summary.min, summary.max
                    ));
                }
            }
        }
        (None, Some(nodes)) => {
            let table = load_response_times(ctx.layout(), &size, NodeCount::new(nodes)?)?;
            print_table(&table, &mut handler)?;
            for environment in Environment::ALL {
                for time_type in TimeType::ALL {
                    let line = match environment_summary(&table, environment, time_type) {
                        Ok(s) => format!(
                            "mean {:.3} s  min {:.3} s  max {:.3} s  sum {:.3} s  over {} queries",
                            s.mean, s.min, s.max, s.total, s.count
                        ),
                        Err(e) => e.to_string(),
                    };
                    handler(&format!(
                        "{:<20} {:<13} {}\n",
                        environment.label(),
                        time_type.label(),
                        line
                    ));
                }
            }
        }
        (None, None) => bail!("inspect needs --nodes for response times or --metric for peak & spill"),
    }
    Ok(())
}

fn print_table<F>(table: &MetricTable, handler: &mut F) -> Result<()>
where
    F: FnMut(&str),
{
    handler(&format!(
        "{}: {} rows, {} columns\n",
        table.path().display(),
        table.num_rows(),
        table.num_columns()
    ));
    handler(&format!("Row labels: {}\n", table.labels().join(", ")));
    let rendered = pretty_format_batches(std::slice::from_ref(table.batch()))?;
    handler(&format!("{}\n", rendered));
    Ok(())
}
