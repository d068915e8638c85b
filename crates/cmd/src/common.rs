// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use report::{BoxplotMode, PeakMetric, QuerySelector, ReportConfig, ReportLayout, TimeType};

use crate::error_utils::ErrorContext;

/// Environment variable naming the report root.
pub const ROOT_ENV: &str = "BENCHVIZ_ROOT";

/// Which summary column to chart
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TimeChoice {
    /// Average time over the repetitions (default)
    Average,
    /// Total time over the repetitions
    Total,
}

impl From<TimeChoice> for TimeType {
    fn from(choice: TimeChoice) -> Self {
        match choice {
            TimeChoice::Average => TimeType::Average,
            TimeChoice::Total => TimeType::Total,
        }
    }
}

/// Peak & spill metric
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetricChoice {
    Cpu,
    Memory,
    Spill,
}

impl From<MetricChoice> for PeakMetric {
    fn from(choice: MetricChoice) -> Self {
        match choice {
            MetricChoice::Cpu => PeakMetric::CpuPeak,
            MetricChoice::Memory => PeakMetric::MemoryPeak,
            MetricChoice::Spill => PeakMetric::Spill,
        }
    }
}

/// What a boxplot's distributions are made of
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeChoice {
    /// Repetitions of one query (default)
    Repeats,
    /// One value per query
    Queries,
}

impl ModeChoice {
    pub fn with_selector(self, selector: QuerySelector) -> BoxplotMode {
        match self {
            ModeChoice::Repeats => BoxplotMode::ByRepetitions(selector),
            ModeChoice::Queries => BoxplotMode::ByQueries,
        }
    }
}

/// Resolve the report root: explicit override, then `BENCHVIZ_ROOT`, then
/// the current directory.
pub fn resolve_root(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }
    match env::var(ROOT_ENV) {
        Ok(value) if !value.trim().is_empty() => return Ok(PathBuf::from(value)),
        _ => {}
    }
    env::current_dir().with_context_msg("Failed to determine current directory")
}

/// Opens generated charts in a viewer.
pub trait Opener {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Platform opener (`xdg-open`, `open`, `cmd /C start`) or a configured
/// command.
#[derive(Debug, Clone, Default)]
pub struct SystemOpener {
    command: Option<String>,
}

impl SystemOpener {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    fn command_for(&self, path: &Path) -> Command {
        if let Some(program) = &self.command {
            let mut cmd = Command::new(program);
            cmd.arg(path);
            return cmd;
        }
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl Opener for SystemOpener {
    fn open(&self, path: &Path) -> Result<()> {
        let mut command = self.command_for(path);
        let program = command.get_program().to_string_lossy().to_string();
        let display = path.display().to_string();
        diagnostics::debug!("Opening {display} with {program}", display: display, program: program);
        let _child = command
            .spawn()
            .map_err(|e| anyhow!("Failed to open {} with {}: {}", display, program, e))?;
        Ok(())
    }
}

/// Opener that records paths instead of launching a viewer.
#[derive(Debug, Clone, Default)]
pub struct RecordingOpener {
    opened: Rc<RefCell<Vec<PathBuf>>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }
}

impl Opener for RecordingOpener {
    fn open(&self, path: &Path) -> Result<()> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Everything a command needs: where the data lives and how to show
/// results.
pub struct ReportContext {
    layout: ReportLayout,
    opener: Box<dyn Opener>,
}

impl ReportContext {
    /// Build the context from command-line overrides.
    pub fn new(root_override: Option<PathBuf>, config_override: Option<PathBuf>) -> Result<Self> {
        let root = resolve_root(root_override)?;
        let config = match config_override {
            Some(path) => ReportConfig::load(&path)
                .with_context_fmt("Failed to load config", &path.display())?,
            None => ReportConfig::load_from_root(&root)
                .with_context_fmt("Failed to load config from", &root.display())?,
        };
        let opener = SystemOpener::new(config.open_command.clone());
        diagnostics::debug!("Report root: {root}", root: root.display().to_string());
        Ok(Self::with_opener(ReportLayout::new(root, config), Box::new(opener)))
    }

    pub fn with_opener(layout: ReportLayout, opener: Box<dyn Opener>) -> Self {
        Self { layout, opener }
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    pub fn config(&self) -> &ReportConfig {
        self.layout.config()
    }

    pub fn open(&self, path: &Path) -> Result<()> {
        self.opener.open(path)
    }
}
