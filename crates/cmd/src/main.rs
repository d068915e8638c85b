// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands::{
    BarArgs, BoxplotArgs, HeatmapArgs, HelpArgs, InspectArgs, PeakSpillArgs, bar_command,
    boxplot_command, heatmap_command, help_command, inspect_command, peak_spill_command, run_shell,
};
use cmd::common::ReportContext;
use cmd::error_utils::{ErrorContext, is_input_problem, user_message};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "benchviz", disable_help_subcommand = true)]
/// Charts comparing TPC-H runs on HDFS and MinIO
struct Cli {
    /// Report root holding the data and output directories (defaults to
    /// BENCHVIZ_ROOT, then the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/benchviz.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menus (default)
    Shell,
    /// Memory peak, CPU peak or spill chart
    PeakSpill(PeakSpillArgs),
    /// Response time per query as grouped bars
    Bar(BarArgs),
    /// Response time distribution
    Boxplot(BoxplotArgs),
    /// Response time of every query in both environments
    Heatmap(HeatmapArgs),
    /// Print a workbook as loaded, with column summaries
    Inspect(InspectArgs),
    /// User guide
    Help(HelpArgs),
}

fn main() -> ExitCode {
    diagnostics::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = user_message(&err);
            if is_input_problem(&err) {
                diagnostics::warn!("{message}", message: message);
            } else {
                diagnostics::error!("{message}", message: message);
            }
            let _ = writeln!(io::stderr(), "{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Shell);
    if let Commands::Help(args) = &command {
        return emit_output(|out| help_command(args, |s| out.push_str(s)));
    }

    let ctx = ReportContext::new(cli.root, cli.config)?;
    match &command {
        Commands::Shell => {
            let stdin = io::stdin();
            run_shell(&ctx, stdin.lock(), io::stdout().lock())
        }
        Commands::PeakSpill(args) => emit_output(|out| peak_spill_command(&ctx, args, |s| out.push_str(s))),
        Commands::Bar(args) => emit_output(|out| bar_command(&ctx, args, |s| out.push_str(s))),
        Commands::Boxplot(args) => emit_output(|out| boxplot_command(&ctx, args, |s| out.push_str(s))),
        Commands::Heatmap(args) => emit_output(|out| heatmap_command(&ctx, args, |s| out.push_str(s))),
        Commands::Inspect(args) => emit_output(|out| inspect_command(&ctx, args, |s| out.push_str(s))),
        Commands::Help(_) => Ok(()),
    }
}

/// Run a command collecting its output, then write what it produced even
/// when it failed partway.
fn emit_output<F>(command: F) -> Result<()>
where
    F: FnOnce(&mut String) -> Result<()>,
{
    let mut out = String::new();
    let result = command(&mut out);
    io::stdout().lock().write_all(out.as_bytes()).output_context()?;
    result
}
