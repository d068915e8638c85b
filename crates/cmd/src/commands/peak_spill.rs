// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Args;
use report::{DatasetSize, PeakMetric, generate_peak_chart};

use super::report_artifact;
use crate::common::{MetricChoice, ReportContext};

#[derive(Debug, Clone, Args)]
pub struct PeakSpillArgs {
    /// Metric to chart
    #[arg(short, long, value_enum)]
    pub metric: MetricChoice,

    /// Dataset size folder, e.g. 1Gb
    #[arg(short, long)]
    pub size: String,

    /// Open the chart when it is written
    #[arg(long)]
    pub open: bool,
}

/// Render the memory peak, CPU peak or spill chart for one dataset size.
pub fn peak_spill_command<F>(ctx: &ReportContext, args: &PeakSpillArgs, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let metric = PeakMetric::from(args.metric);
    let size = DatasetSize::new(&args.size)?;
    diagnostics::debug!("peak_spill_command {metric} {size}", metric: metric.label(), size: size.label());

    let artifact = generate_peak_chart(ctx.layout(), metric, &size)?;
    report_artifact(ctx, &artifact, args.open, &mut handler)
}
