use super::RunKind;
use crate::prune::PruneReport;
use crate::resource::{DeclaredResource, Location};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, report: &PruneReport, kind: RunKind) -> Result<()> {
        let report = JsonReport::from_report(report, kind);
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<usize>,
    removed: Vec<JsonRemoved>,
    kept: Vec<JsonKept>,
    failures: Vec<JsonFailure>,
    emptied_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    undo_script_error: Option<String>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonResource {
    name: String,
    #[serde(rename = "type")]
    resource_type: &'static str,
    file: String,
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_line: Option<usize>,
    qualifiers: Vec<String>,
}

#[derive(Serialize)]
struct JsonRemoved {
    #[serde(flatten)]
    resource: JsonResource,
    reason: String,
}

#[derive(Serialize)]
struct JsonKept {
    #[serde(flatten)]
    resource: JsonResource,
    reason: String,
}

#[derive(Serialize)]
struct JsonFailure {
    #[serde(flatten)]
    resource: JsonResource,
    message: String,
}

#[derive(Serialize)]
struct JsonSummary {
    removed: usize,
    kept: usize,
    failures: usize,
    by_type: BTreeMap<&'static str, usize>,
}

impl JsonResource {
    fn from_declared(resource: &DeclaredResource) -> Self {
        let end_line = match &resource.location {
            Location::Element { end_line, .. } => Some(*end_line),
            Location::File { .. } => None,
        };
        Self {
            name: resource.name.clone(),
            resource_type: resource.resource_type.as_str(),
            file: resource.location.path().to_string_lossy().to_string(),
            line: resource.location.line(),
            end_line,
            qualifiers: resource.qualifiers.clone(),
        }
    }
}

impl JsonReport {
    fn from_report(report: &PruneReport, kind: RunKind) -> Self {
        let mut by_type = BTreeMap::new();
        for removed in &report.removed {
            *by_type.entry(removed.resource.resource_type.as_str()).or_insert(0) += 1;
        }

        let iterations = match kind {
            RunKind::Pruned { iterations } => Some(iterations),
            RunKind::Preview => None,
        };

        Self {
            version: "1.0",
            mode: kind.as_str(),
            iterations,
            removed: report
                .removed
                .iter()
                .map(|r| JsonRemoved {
                    resource: JsonResource::from_declared(&r.resource),
                    reason: r.reason.to_string(),
                })
                .collect(),
            kept: report
                .kept
                .iter()
                .map(|k| JsonKept {
                    resource: JsonResource::from_declared(&k.resource),
                    reason: k.reason.to_string(),
                })
                .collect(),
            failures: report
                .failures
                .iter()
                .map(|f| JsonFailure {
                    resource: JsonResource::from_declared(&f.resource),
                    message: f.message.clone(),
                })
                .collect(),
            emptied_files: report
                .emptied_files
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect(),
            undo_script_error: report.undo_script_error.clone(),
            summary: JsonSummary {
                removed: report.removed.len(),
                kept: report.kept.len(),
                failures: report.failures.len(),
                by_type,
            },
        }
    }
}
