// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Args;

use crate::help::HelpTopic;

#[derive(Debug, Clone, Args)]
pub struct HelpArgs {
    /// Topic: overview, peak-spill, response-time, bar, boxplot, heatmap
    pub topic: Option<String>,
}

/// Print one user guide page, or the overview followed by the topic list.
pub fn help_command<F>(args: &HelpArgs, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    match &args.topic {
        Some(topic) => {
            let topic: HelpTopic = topic.parse()?;
            handler(&format!("{}\n", topic));
        }
        None => {
            handler(&format!("{}\n", HelpTopic::Overview));
            handler("Help topics:\n");
            for topic in HelpTopic::ALL {
                handler(&format!("  {:<14} {}\n", topic.name(), topic.title()));
            }
        }
    }
    Ok(())
}
