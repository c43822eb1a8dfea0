use super::RunKind;
use crate::prune::{PruneReport, RemovalReason, RemovedResource};
use crate::resource::ResourceType;
use colored::Colorize;
use miette::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// List kept resources with their reasons
    show_kept: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_kept: false }
    }

    pub fn with_kept(mut self, show: bool) -> Self {
        self.show_kept = show;
        self
    }

    pub fn report(&self, report: &PruneReport, kind: RunKind) -> Result<()> {
        if report.removed.is_empty() && report.failures.is_empty() {
            println!("{}", "No unused resources found!".green().bold());
            if self.show_kept {
                self.print_kept(report);
            }
            return Ok(());
        }

        let header = match kind {
            RunKind::Preview => format!("Found {} unused resources:", report.removed.len()),
            RunKind::Pruned { iterations } => format!(
                "Removed {} unused resources in {} pass{}:",
                report.removed.len(),
                iterations,
                if iterations == 1 { "" } else { "es" }
            ),
        };

        println!();
        println!("{}", header.yellow().bold());
        println!();

        // Group by file
        let mut by_file: BTreeMap<&Path, Vec<&RemovedResource>> = BTreeMap::new();
        for removed in &report.removed {
            by_file
                .entry(removed.resource.location.path())
                .or_default()
                .push(removed);
        }

        for (file, items) in &by_file {
            println!("{}", file.display().to_string().cyan().bold());
            for item in items {
                self.print_item(item);
            }
            println!();
        }

        if !report.failures.is_empty() {
            println!("{}", format!("{} failures:", report.failures.len()).red().bold());
            for failure in &report.failures {
                println!(
                    "  {} {} {}",
                    "✗".red(),
                    failure.resource.display_name(),
                    failure.message.dimmed()
                );
            }
            println!();
        }

        if let Some(error) = &report.undo_script_error {
            println!("{} {}", "Undo script not written:".red().bold(), error);
            println!();
        }

        if self.show_kept {
            self.print_kept(report);
        }

        self.print_summary(report, kind);
        Ok(())
    }

    fn print_item(&self, item: &RemovedResource) {
        let resource = &item.resource;
        let location = if resource.location.is_element() {
            resource.location.line().to_string()
        } else {
            "file".to_string()
        };
        let note = match item.reason {
            RemovalReason::Unreferenced => String::new(),
            RemovalReason::FileEmptied => format!(" ({})", item.reason),
        };
        println!(
            "  {} {} '{}'{}",
            format!("{:>5}", location).dimmed(),
            resource.resource_type.as_str().blue(),
            resource.name.white(),
            note.dimmed()
        );
    }

    fn print_kept(&self, report: &PruneReport) {
        if report.kept.is_empty() {
            return;
        }
        println!("{}", "Kept:".dimmed());
        for kept in &report.kept {
            println!(
                "  {} {} {}",
                "→".dimmed(),
                kept.resource.display_name(),
                format!("({})", kept.reason).dimmed()
            );
        }
        println!();
    }

    fn print_summary(&self, report: &PruneReport, kind: RunKind) {
        let mut by_type: BTreeMap<ResourceType, usize> = BTreeMap::new();
        for removed in &report.removed {
            *by_type.entry(removed.resource.resource_type).or_default() += 1;
        }

        println!("{}", "─".repeat(60).dimmed());

        let parts: Vec<String> = by_type
            .iter()
            .map(|(t, n)| format!("{} {}", n, t))
            .collect();
        println!("Summary: {}", parts.join(", "));
        println!(
            "{}",
            format!("{} resources kept", report.kept.len()).dimmed()
        );
        if !report.emptied_files.is_empty() {
            println!(
                "{}",
                format!("{} emptied values files deleted", report.emptied_files.len()).dimmed()
            );
        }
        println!();

        if kind == RunKind::Preview {
            println!(
                "{}",
                "Tip: Run with --prune to remove these resources".dimmed()
            );
            println!(
                "{}",
                "Tip: Use --cascade to also remove resources only used by removed ones".dimmed()
            );
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
