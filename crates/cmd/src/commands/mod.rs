// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod bar;
pub mod boxplot;
pub mod heatmap;
pub mod help;
pub mod inspect;
pub mod peak_spill;
pub mod shell;

pub use bar::{BarArgs, bar_command};
pub use boxplot::{BoxplotArgs, boxplot_command};
pub use heatmap::{HeatmapArgs, heatmap_command};
pub use help::{HelpArgs, help_command};
pub use inspect::{InspectArgs, inspect_command};
pub use peak_spill::{PeakSpillArgs, peak_spill_command};
pub use shell::run_shell;

use anyhow::{Result, anyhow};
use clap::Args;
use report::{ChartArtifact, DatasetSize, NodeCount};

use crate::common::{ReportContext, TimeChoice};

/// Dataset size, node count and time column shared by the response-time
/// commands
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Dataset size, e.g. 1GB
    #[arg(short, long)]
    pub size: String,

    /// Number of nodes the run used
    #[arg(short, long)]
    pub nodes: u32,

    /// Summary column to chart
    #[arg(short, long, value_enum, default_value = "average")]
    pub time: TimeChoice,
}

impl RunArgs {
    pub fn resolve(&self) -> Result<(DatasetSize, NodeCount)> {
        Ok((DatasetSize::new(&self.size)?, NodeCount::new(self.nodes)?))
    }
}

/// Parse a node count typed by the user.
pub fn parse_nodes(value: &str) -> Result<NodeCount> {
    let count: u32 = value
        .trim()
        .parse()
        .map_err(|_| anyhow!("'{}' is not a node count", value.trim()))?;
    Ok(NodeCount::new(count)?)
}

/// Print warnings and the written path, then open the chart if asked.
pub fn report_artifact<F>(
    ctx: &ReportContext,
    artifact: &ChartArtifact,
    open: bool,
    handler: &mut F,
) -> Result<()>
where
    F: FnMut(&str),
{
    for warning in &artifact.warnings {
        handler(&format!("{}\n", warning));
    }
    for path in artifact.files() {
        handler(&format!("Wrote {}\n", path.display()));
    }
    if open {
        ctx.open(&artifact.path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nodes() -> Result<()> {
        assert_eq!(parse_nodes(" 15 ")?.get(), 15);
        assert!(parse_nodes("0").is_err());
        let err = parse_nodes("many").expect_err("not a number");
        assert_eq!(err.to_string(), "'many' is not a node count");
        Ok(())
    }
}
