// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Args;
use report::{BoxplotRequest, QuerySelector, generate_boxplot};

use super::{RunArgs, report_artifact};
use crate::common::{ModeChoice, ReportContext};

#[derive(Debug, Clone, Args)]
pub struct BoxplotArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Distribution over the repetitions of one query, or over all queries
    #[arg(short, long, value_enum, default_value = "repeats")]
    pub mode: ModeChoice,

    /// Query whose repetitions are plotted
    #[arg(short, long, default_value = "1", conflicts_with = "total")]
    pub query: String,

    /// Plot the repetitions of the Total row
    #[arg(long)]
    pub total: bool,

    /// Open the chart when it is written
    #[arg(long)]
    pub open: bool,
}

pub fn boxplot_command<F>(ctx: &ReportContext, args: &BoxplotArgs, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let (size, nodes) = args.run.resolve()?;
    let selector = if args.total {
        QuerySelector::Total
    } else {
        args.query.parse()?
    };
    let request = BoxplotRequest {
        size,
        nodes,
        time_type: args.run.time.into(),
        mode: args.mode.with_selector(selector),
    };
    let artifact = generate_boxplot(ctx.layout(), &request)?;
    report_artifact(ctx, &artifact, args.open, &mut handler)
}
