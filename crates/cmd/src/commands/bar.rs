// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, bail};
use clap::Args;
use report::{BarChartRequest, QuerySelector, generate_bar_chart};

use super::{RunArgs, report_artifact};
use crate::common::ReportContext;
use crate::widgets::QuerySelection;

#[derive(Debug, Clone, Args)]
pub struct BarArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Query to include (repeatable): 3, Q3 or "Query 3"
    #[arg(short, long = "query", value_name = "QUERY")]
    pub queries: Vec<String>,

    /// Include every query
    #[arg(long, conflicts_with_all = ["queries", "total"])]
    pub all: bool,

    /// Compare the Total row instead of individual queries
    #[arg(long, conflicts_with = "queries")]
    pub total: bool,

    /// Open the chart when it is written
    #[arg(long)]
    pub open: bool,
}

impl BarArgs {
    /// Build the query selection the same way the shell's checklist does.
    pub fn selection(&self, query_count: u32) -> Result<QuerySelection> {
        let mut selection = QuerySelection::new(query_count);
        if self.all {
            selection.select_all();
        } else if self.total {
            selection.toggle(QuerySelector::Total);
        } else {
            for query in &self.queries {
                let selector: QuerySelector = query.parse()?;
                if !selection.contains(selector) {
                    selection.toggle(selector);
                }
            }
        }
        if selection.is_empty() {
            bail!("Choose queries with --query, --all or --total");
        }
        Ok(selection)
    }
}

/// Response time per query, HDFS next to MinIO.
pub fn bar_command<F>(ctx: &ReportContext, args: &BarArgs, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let (size, nodes) = args.run.resolve()?;
    let query_count = u32::try_from(ctx.layout().query_count()).unwrap_or(u32::MAX);
    let request = BarChartRequest {
        size,
        nodes,
        time_type: args.run.time.into(),
        selection: args.selection(query_count)?.selectors(),
    };
    let artifact = generate_bar_chart(ctx.layout(), &request)?;
    report_artifact(ctx, &artifact, args.open, &mut handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TimeChoice;

    fn args(queries: &[&str], all: bool, total: bool) -> BarArgs {
        BarArgs {
            run: RunArgs {
                size: "1GB".to_string(),
                nodes: 1,
                time: TimeChoice::Average,
            },
            queries: queries.iter().map(|q| q.to_string()).collect(),
            all,
            total,
            open: false,
        }
    }

    #[test]
    fn test_selection_from_flags() -> Result<()> {
        let selection = args(&["3", "Q1", "query 3"], false, false).selection(22)?;
        assert_eq!(
            selection.selectors(),
            vec![QuerySelector::Query(1), QuerySelector::Query(3)]
        );
        assert_eq!(args(&[], true, false).selection(22)?.selectors().len(), 22);
        assert_eq!(
            args(&[], false, true).selection(22)?.selectors(),
            vec![QuerySelector::Total]
        );
        Ok(())
    }

    #[test]
    fn test_selection_rejects_nothing_and_garbage() {
        assert!(args(&[], false, false).selection(22).is_err());
        assert!(args(&["first"], false, false).selection(22).is_err());
    }
}
