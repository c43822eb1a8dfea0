mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::prune::PruneReport;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Whether the report describes a preview or removals that happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Preview,
    Pruned { iterations: usize },
}

impl RunKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::Preview => "preview",
            RunKind::Pruned { .. } => "pruned",
        }
    }
}

/// Reporter for outputting prune results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_kept: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_kept: false,
        }
    }

    /// Also list kept resources in terminal output
    pub fn with_kept(mut self, show: bool) -> Self {
        self.show_kept = show;
        self
    }

    pub fn report(&self, report: &PruneReport, kind: RunKind) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new()
                .with_kept(self.show_kept)
                .report(report, kind),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(report, kind),
        }
    }
}
