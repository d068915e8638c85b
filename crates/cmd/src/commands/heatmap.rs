// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Args;
use report::{HeatmapRequest, generate_heatmap};

use super::{RunArgs, report_artifact};
use crate::common::ReportContext;

#[derive(Debug, Clone, Args)]
pub struct HeatmapArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Open the chart when it is written
    #[arg(long)]
    pub open: bool,
}

pub fn heatmap_command<F>(ctx: &ReportContext, args: &HeatmapArgs, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let (size, nodes) = args.run.resolve()?;
    let request = HeatmapRequest {
        size,
        nodes,
        time_type: args.run.time.into(),
    };
    let artifact = generate_heatmap(ctx.layout(), &request)?;
    report_artifact(ctx, &artifact, args.open, &mut handler)
}
