// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Interactive terminal shell.
//!
//! Every screen is a numbered menu. Choosing an entry either edits a
//! setting, runs one chart generation to completion, prints a help page or
//! moves to another screen. End of input leaves the shell.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use report::{
    BarChartRequest, BoxplotMode, BoxplotRequest, ChartArtifact, DatasetSize, HeatmapRequest,
    NodeCount, PeakMetric, QuerySelector, ReportError, TimeType, generate_bar_chart, generate_boxplot,
    generate_heatmap, generate_peak_chart,
};

use super::parse_nodes;
use crate::common::ReportContext;
use crate::error_utils::{is_input_problem, user_message};
use crate::help::HelpTopic;
use crate::widgets::{OptionList, QuerySelection};

/// Run the shell until the user quits or input ends.
pub fn run_shell<R, W>(ctx: &ReportContext, input: R, output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    diagnostics::debug!("Starting shell");
    let mut shell = Shell {
        ctx,
        io: Prompter { input, output },
        state: ShellState::new(ctx),
    };
    shell.run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Main,
    PeakSpill,
    ResponseTime,
    Bar,
    Boxplot,
    Heatmap,
}

impl Screen {
    fn title(self) -> &'static str {
        match self {
            Screen::Main => "Benchmark Visualization",
            Screen::PeakSpill => "Peak & Spill",
            Screen::ResponseTime => "ResponseTime",
            Screen::Bar => "ResponseTime: Bar Chart",
            Screen::Boxplot => "ResponseTime: Boxplot",
            Screen::Heatmap => "ResponseTime: Heatmap",
        }
    }

    fn parent(self) -> Screen {
        match self {
            Screen::Main | Screen::PeakSpill | Screen::ResponseTime => Screen::Main,
            Screen::Bar | Screen::Boxplot | Screen::Heatmap => Screen::ResponseTime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Goto(Screen),
    Metric,
    Size,
    Nodes,
    Time,
    Mode,
    Query,
    Queries,
    ToggleOpen,
    Generate,
    OpenLast,
    Help(HelpTopic),
    Back,
    Quit,
}

enum Flow {
    Stay,
    Goto(Screen),
    Quit,
}

/// Boxplot distributions: one query's repetitions, or all queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoxplotKind {
    Repetitions,
    Queries,
}

struct ShellState {
    metric: PeakMetric,
    peak_sizes: OptionList,
    open_peak: bool,
    sizes: OptionList,
    nodes: OptionList,
    time_type: TimeType,
    queries: QuerySelection,
    boxplot_kind: BoxplotKind,
    boxplot_query: QuerySelector,
    last_bar: Option<PathBuf>,
    last_boxplot: Option<PathBuf>,
    last_heatmap: Option<PathBuf>,
}

impl ShellState {
    fn new(ctx: &ReportContext) -> Self {
        let config = ctx.config();
        let query_count = u32::try_from(config.query_count).unwrap_or(u32::MAX);
        Self {
            metric: PeakMetric::MemoryPeak,
            peak_sizes: OptionList::new(config.peak_spill_sizes.iter().cloned()),
            open_peak: true,
            sizes: OptionList::new(config.dataset_sizes.iter().cloned()),
            nodes: OptionList::new(config.node_counts.iter().map(u32::to_string)),
            time_type: TimeType::Average,
            queries: QuerySelection::new(query_count),
            boxplot_kind: BoxplotKind::Repetitions,
            boxplot_query: QuerySelector::Query(1),
            last_bar: None,
            last_boxplot: None,
            last_heatmap: None,
        }
    }

    fn last_artifact(&mut self, screen: Screen) -> Option<&mut Option<PathBuf>> {
        match screen {
            Screen::Bar => Some(&mut self.last_bar),
            Screen::Boxplot => Some(&mut self.last_boxplot),
            Screen::Heatmap => Some(&mut self.last_heatmap),
            _ => None,
        }
    }

    fn run_choice(&self) -> Result<(DatasetSize, NodeCount)> {
        let size = self.sizes.selected().unwrap_or_default();
        let nodes = self.nodes.selected().unwrap_or_default();
        Ok((DatasetSize::new(size)?, parse_nodes(nodes)?))
    }
}

/// Line-oriented terminal I/O.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Show a numbered menu until a valid entry is chosen. `None` at end of
    /// input.
    fn menu(&mut self, title: &str, options: &[String]) -> Result<Option<usize>> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "== {} ==", title)?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "  {:>2}) {}", i + 1, option)?;
            }
            let Some(line) = self.read_line("> ")? else {
                return Ok(None);
            };
            match line.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}",
                    options.len()
                )?,
            }
        }
    }

    /// Pick from a list offering `+Add own`. `false` at end of input.
    fn pick(&mut self, title: &str, list: &mut OptionList) -> Result<bool> {
        let Some(index) = self.menu(title, list.items())? else {
            return Ok(false);
        };
        if list.is_add_own(index) {
            let Some(value) = self.read_line("Enter value: ")? else {
                return Ok(false);
            };
            if list.add_custom(&value).is_none() {
                self.say("Nothing added")?;
            }
        } else {
            let _ = list.select(index);
        }
        Ok(true)
    }
}

struct Shell<'a, R, W> {
    ctx: &'a ReportContext,
    io: Prompter<R, W>,
    state: ShellState,
}

impl<R: BufRead, W: Write> Shell<'_, R, W> {
    fn run(&mut self) -> Result<()> {
        let mut screen = Screen::Main;
        loop {
            let entries = self.entries(screen);
            let labels: Vec<String> = entries.iter().map(|(label, _)| label.clone()).collect();
            let Some(index) = self.io.menu(screen.title(), &labels)? else {
                break;
            };
            let Some(&(_, action)) = entries.get(index) else {
                continue;
            };
            match self.perform(screen, action)? {
                Flow::Stay => {}
                Flow::Goto(next) => screen = next,
                Flow::Quit => break,
            }
        }
        self.io.say("Bye")
    }

    fn entries(&self, screen: Screen) -> Vec<(String, Action)> {
        let state = &self.state;
        let size = |list: &OptionList| format!("Dataset size: {}", list.selected().unwrap_or("-"));
        let nodes = format!("Nodes: {}", state.nodes.selected().unwrap_or("-"));
        let time = format!("Time: {}", state.time_type);
        let back = ("Go back".to_string(), Action::Back);

        match screen {
            Screen::Main => vec![
                ("Peak & Spill".to_string(), Action::Goto(Screen::PeakSpill)),
                ("ResponseTime".to_string(), Action::Goto(Screen::ResponseTime)),
                ("Help".to_string(), Action::Help(HelpTopic::Overview)),
                ("Quit".to_string(), Action::Quit),
            ],
            Screen::PeakSpill => vec![
                (format!("Metric: {}", state.metric.label()), Action::Metric),
                (size(&state.peak_sizes), Action::Size),
                (
                    format!("Open in browser: {}", if state.open_peak { "on" } else { "off" }),
                    Action::ToggleOpen,
                ),
                ("Generate".to_string(), Action::Generate),
                ("Help".to_string(), Action::Help(HelpTopic::PeakSpill)),
                back,
            ],
            Screen::ResponseTime => vec![
                ("Bar Chart".to_string(), Action::Goto(Screen::Bar)),
                ("Boxplot".to_string(), Action::Goto(Screen::Boxplot)),
                ("Heatmap".to_string(), Action::Goto(Screen::Heatmap)),
                ("Help".to_string(), Action::Help(HelpTopic::ResponseTime)),
                back,
            ],
            Screen::Bar => vec![
                (format!("Queries: {}", state.queries.summary()), Action::Queries),
                (size(&state.sizes), Action::Size),
                (nodes, Action::Nodes),
                (time, Action::Time),
                ("Generate".to_string(), Action::Generate),
                ("Open in browser".to_string(), Action::OpenLast),
                ("Help".to_string(), Action::Help(HelpTopic::BarChart)),
                back,
            ],
            Screen::Boxplot => {
                let mode = match state.boxplot_kind {
                    BoxplotKind::Repetitions => "By repetitions",
                    BoxplotKind::Queries => "By queries",
                };
                let mut entries = vec![
                    (size(&state.sizes), Action::Size),
                    (nodes, Action::Nodes),
                    (time, Action::Time),
                    (format!("Chart mode: {}", mode), Action::Mode),
                ];
                if state.boxplot_kind == BoxplotKind::Repetitions {
                    entries.push((format!("Query: {}", state.boxplot_query), Action::Query));
                }
                entries.extend([
                    ("Generate".to_string(), Action::Generate),
                    ("Show generated".to_string(), Action::OpenLast),
                    ("Help".to_string(), Action::Help(HelpTopic::Boxplot)),
                    back,
                ]);
                entries
            }
            Screen::Heatmap => vec![
                (size(&state.sizes), Action::Size),
                (nodes, Action::Nodes),
                (time, Action::Time),
                ("Generate".to_string(), Action::Generate),
                ("Open".to_string(), Action::OpenLast),
                ("Help".to_string(), Action::Help(HelpTopic::Heatmap)),
                back,
            ],
        }
    }

    fn perform(&mut self, screen: Screen, action: Action) -> Result<Flow> {
        let done = match action {
            Action::Goto(next) => return Ok(Flow::Goto(next)),
            Action::Back => return Ok(Flow::Goto(screen.parent())),
            Action::Quit => return Ok(Flow::Quit),
            Action::Help(topic) => {
                self.io.say(&topic.to_string())?;
                true
            }
            Action::Metric => {
                let labels: Vec<String> = PeakMetric::ALL.iter().map(|m| m.label().to_string()).collect();
                match self.io.menu("Metric", &labels)? {
                    Some(i) => {
                        self.state.metric = PeakMetric::ALL.get(i).copied().unwrap_or(self.state.metric);
                        true
                    }
                    None => false,
                }
            }
            Action::Size if screen == Screen::PeakSpill => {
                self.io.pick("Dataset size", &mut self.state.peak_sizes)?
            }
            Action::Size => self.io.pick("Dataset size", &mut self.state.sizes)?,
            Action::Nodes => self.io.pick("Nodes", &mut self.state.nodes)?,
            Action::Time => {
                let labels: Vec<String> = TimeType::ALL.iter().map(|t| t.label().to_string()).collect();
                match self.io.menu("Time", &labels)? {
                    Some(i) => {
                        self.state.time_type = TimeType::ALL.get(i).copied().unwrap_or(self.state.time_type);
                        true
                    }
                    None => false,
                }
            }
            Action::Mode => {
                let labels = vec!["By repetitions".to_string(), "By queries".to_string()];
                match self.io.menu("Chart mode", &labels)? {
                    Some(0) => {
                        self.state.boxplot_kind = BoxplotKind::Repetitions;
                        true
                    }
                    Some(_) => {
                        self.state.boxplot_kind = BoxplotKind::Queries;
                        true
                    }
                    None => false,
                }
            }
            Action::Query => self.pick_boxplot_query()?,
            Action::Queries => self.edit_queries()?,
            Action::ToggleOpen => {
                self.state.open_peak = !self.state.open_peak;
                true
            }
            Action::Generate => {
                self.generate(screen)?;
                true
            }
            Action::OpenLast => {
                self.open_last(screen)?;
                true
            }
        };
        Ok(if done { Flow::Stay } else { Flow::Quit })
    }

    fn pick_boxplot_query(&mut self) -> Result<bool> {
        let count = self.state.queries.query_count();
        let mut selectors: Vec<QuerySelector> = (1..=count).map(QuerySelector::Query).collect();
        selectors.push(QuerySelector::Total);
        let labels: Vec<String> = selectors.iter().map(ToString::to_string).collect();
        match self.io.menu("Query", &labels)? {
            Some(i) => {
                if let Some(&selector) = selectors.get(i) {
                    self.state.boxplot_query = selector;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Bar chart query checklist; returns to the bar screen on `Done`.
    fn edit_queries(&mut self) -> Result<bool> {
        loop {
            let selection = &self.state.queries;
            let count = selection.query_count() as usize;
            let mark = |on: bool| if on { "x" } else { " " };
            let mut labels: Vec<String> = (1..=selection.query_count())
                .map(|n| format!("[{}] Query {}", mark(selection.contains(QuerySelector::Query(n))), n))
                .collect();
            labels.push(format!("[{}] Total", mark(selection.contains(QuerySelector::Total))));
            labels.extend(["Select all", "Deselect all", "Done"].map(String::from));

            let title = format!("Queries ({})", selection.summary());
            let Some(index) = self.io.menu(&title, &labels)? else {
                return Ok(false);
            };
            match index {
                i if i < count => self.state.queries.toggle(QuerySelector::Query(i as u32 + 1)),
                i if i == count => self.state.queries.toggle(QuerySelector::Total),
                i if i == count + 1 => self.state.queries.select_all(),
                i if i == count + 2 => self.state.queries.clear(),
                _ => return Ok(true),
            }
        }
    }

    fn generate(&mut self, screen: Screen) -> Result<()> {
        let layout = self.ctx.layout();
        let state = &self.state;
        let outcome: Result<ChartArtifact> = match screen {
            Screen::PeakSpill => {
                let size = state.peak_sizes.selected().unwrap_or_default();
                DatasetSize::new(size)
                    .and_then(|size| generate_peak_chart(layout, state.metric, &size))
                    .map_err(Into::into)
            }
            Screen::Bar if state.queries.is_empty() => {
                Err(ReportError::InvalidSelection("no queries chosen".to_string()).into())
            }
            Screen::Bar => state.run_choice().and_then(|(size, nodes)| {
                let request = BarChartRequest {
                    size,
                    nodes,
                    time_type: state.time_type,
                    selection: state.queries.selectors(),
                };
                Ok(generate_bar_chart(layout, &request)?)
            }),
            Screen::Boxplot => state.run_choice().and_then(|(size, nodes)| {
                let mode = match state.boxplot_kind {
                    BoxplotKind::Repetitions => BoxplotMode::ByRepetitions(state.boxplot_query),
                    BoxplotKind::Queries => BoxplotMode::ByQueries,
                };
                let request = BoxplotRequest {
                    size,
                    nodes,
                    time_type: state.time_type,
                    mode,
                };
                Ok(generate_boxplot(layout, &request)?)
            }),
            Screen::Heatmap => state.run_choice().and_then(|(size, nodes)| {
                let request = HeatmapRequest {
                    size,
                    nodes,
                    time_type: state.time_type,
                };
                Ok(generate_heatmap(layout, &request)?)
            }),
            Screen::Main | Screen::ResponseTime => return Ok(()),
        };

        match outcome {
            Ok(artifact) => {
                for warning in &artifact.warnings {
                    self.io.say(warning)?;
                }
                for path in artifact.files() {
                    self.io.say(&format!("Wrote {}", path.display()))?;
                }
                if screen == Screen::PeakSpill && self.state.open_peak {
                    self.open(&artifact.path)?;
                }
                if let Some(last) = self.state.last_artifact(screen) {
                    *last = Some(artifact.path);
                }
            }
            Err(err) => {
                let message = user_message(&err);
                if is_input_problem(&err) {
                    diagnostics::warn!("Generation failed: {message}", message: message);
                } else {
                    diagnostics::error!("Generation failed: {message}", message: message);
                }
                self.io.say(&message)?;
            }
        }
        Ok(())
    }

    fn open_last(&mut self, screen: Screen) -> Result<()> {
        let path = self.state.last_artifact(screen).and_then(|last| last.clone());
        match path {
            Some(path) => self.open(&path),
            None => self.io.say("Generate a chart first"),
        }
    }

    fn open(&mut self, path: &Path) -> Result<()> {
        match self.ctx.open(path) {
            Ok(()) => self.io.say(&format!("Opened {}", path.display())),
            Err(err) => self.io.say(&user_message(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RecordingOpener;
    use report::{ReportConfig, ReportLayout};

    fn run(script: &str) -> Result<(String, RecordingOpener)> {
        let opener = RecordingOpener::default();
        let ctx = ReportContext::with_opener(
            ReportLayout::new("/nonexistent/benchviz", ReportConfig::default()),
            Box::new(opener.clone()),
        );
        let mut output = Vec::new();
        run_shell(&ctx, script.as_bytes(), &mut output)?;
        Ok((String::from_utf8(output)?, opener))
    }

    #[test]
    fn test_quit_from_main_menu() -> Result<()> {
        let (out, _) = run("4\n")?;
        assert!(out.contains("== Benchmark Visualization =="));
        assert!(out.contains("   1) Peak & Spill"));
        assert!(out.trim_end().ends_with("Bye"));
        Ok(())
    }

    #[test]
    fn test_end_of_input_leaves_shell() -> Result<()> {
        let (out, _) = run("1\n2\n")?;
        assert!(out.contains("== Dataset size =="));
        assert!(out.trim_end().ends_with("Bye"));
        Ok(())
    }

    #[test]
    fn test_invalid_choice_reprompts() -> Result<()> {
        let (out, _) = run("9\nabc\n4\n")?;
        assert_eq!(out.matches("Please enter a number between 1 and 4").count(), 2);
        Ok(())
    }

    #[test]
    fn test_add_own_size_is_selected() -> Result<()> {
        // Peak & Spill > Dataset size > +Add own > 32Gb, then quit
        let (out, _) = run("1\n2\n4\n32Gb\n6\n4\n")?;
        assert!(out.contains("Dataset size: 32Gb"));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_reported() -> Result<()> {
        // ResponseTime > Heatmap > Generate
        let (out, opener) = run("2\n3\n4\n")?;
        assert!(out.contains("File not found:"));
        assert!(out.contains("tpc_h-1Gb-W-1-node(s).xlsx"));
        assert!(opener.opened().is_empty());
        Ok(())
    }

    #[test]
    fn test_bar_needs_queries() -> Result<()> {
        // ResponseTime > Bar Chart > Generate with nothing selected
        let (out, _) = run("2\n1\n5\n")?;
        assert!(out.contains("Queries: none"));
        assert!(out.contains("Invalid selection: no queries chosen."));
        Ok(())
    }

    #[test]
    fn test_query_checklist_total_exclusive() -> Result<()> {
        // ResponseTime > Bar Chart > Queries: Q1, Q2, then Total, Done
        let (out, _) = run("2\n1\n1\n1\n2\n23\n26\n")?;
        assert!(out.contains("Queries (Q1, Q2)"));
        assert!(out.contains("Queries: Total"));
        Ok(())
    }

    #[test]
    fn test_boxplot_query_entry_only_in_repetition_mode() -> Result<()> {
        // ResponseTime > Boxplot > Chart mode > By queries
        let (out, _) = run("2\n2\n4\n2\n")?;
        assert!(out.contains("Query: Query 1"));
        let after = out.rsplit("Chart mode: By queries").next().unwrap_or_default();
        assert!(!after.contains("Query: Query 1"));
        Ok(())
    }

    #[test]
    fn test_open_without_chart() -> Result<()> {
        // ResponseTime > Heatmap > Open
        let (out, opener) = run("2\n3\n5\n")?;
        assert!(out.contains("Generate a chart first"));
        assert!(opener.opened().is_empty());
        Ok(())
    }

    #[test]
    fn test_help_page_shown() -> Result<()> {
        let (out, _) = run("3\n")?;
        assert!(out.contains("User Guide: Benchmark Visualization Tool"));
        Ok(())
    }
}
