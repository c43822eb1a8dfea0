//! Physical removal of classified resources
//!
//! Whole-file resources are deleted. Element resources are batched per file:
//! all ranges of one file are validated against the current contents, then
//! removed bottom-up in a single rewrite that keeps the file's line endings.
//! A file left holding nothing but the `<resources>` container is deleted.
//!
//! The removal shape follows the location: an element location is always cut
//! out of its values file, even for a `drawable` declared with
//! `<item type="drawable">`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::rules::{Classification, KeptResource};
use super::undo::UndoScript;
use crate::collect::tracked_element_start;
use crate::error::PruneError;
use crate::resource::{DeclaredResource, Location, ResourceFamily, ResourceType};

/// Most non-blank lines an emptied values file may keep and still be deleted
const MAX_CONTAINER_LINES: usize = 3;

static XML_PROLOG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<\?xml\b[^>]*\?>\s*$").expect("valid regex"));

static CONTAINER_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<resources\b[^>]*>\s*$").expect("valid regex"));

static CONTAINER_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*</resources\s*>\s*$").expect("valid regex"));

/// A resource that could not be removed
#[derive(Debug, Clone, Serialize)]
pub struct PruneFailure {
    pub resource: DeclaredResource,
    pub message: String,
}

/// Why a resource was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalReason {
    #[serde(rename = "unreferenced")]
    Unreferenced,
    /// Unreferenced, and its values file held nothing else afterwards
    #[serde(rename = "unreferenced; file emptied")]
    FileEmptied,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::Unreferenced => write!(f, "unreferenced"),
            RemovalReason::FileEmptied => write!(f, "unreferenced; file emptied"),
        }
    }
}

/// A resource that was (or in a preview, would be) removed
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResource {
    pub resource: DeclaredResource,
    pub reason: RemovalReason,
}

/// What one or more prune passes did
#[derive(Debug, Clone, Default, Serialize)]
pub struct PruneReport {
    pub removed: Vec<RemovedResource>,
    pub kept: Vec<KeptResource>,
    pub failures: Vec<PruneFailure>,
    /// Files deleted because nothing but the container was left
    pub emptied_files: Vec<PathBuf>,
    /// Set when the undo script could not be written after pruning
    pub undo_script_error: Option<String>,
}

impl PruneReport {
    /// Report of a classification with nothing executed
    pub fn preview(classification: &Classification) -> Self {
        Self {
            removed: classification
                .to_remove
                .iter()
                .map(|resource| RemovedResource {
                    resource: resource.clone(),
                    reason: RemovalReason::Unreferenced,
                })
                .collect(),
            kept: classification.to_keep.clone(),
            ..Default::default()
        }
    }

    /// Fold a later pass into this one. Kept resources are taken from the
    /// later pass, which saw the project in its final state.
    pub fn merge(&mut self, later: PruneReport) {
        self.removed.extend(later.removed);
        self.failures.extend(later.failures);
        self.emptied_files.extend(later.emptied_files);
        self.kept = later.kept;
        if later.undo_script_error.is_some() {
            self.undo_script_error = later.undo_script_error;
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.undo_script_error.is_none()
    }

    fn fail(&mut self, resource: &DeclaredResource, message: impl Into<String>) {
        self.failures.push(PruneFailure {
            resource: resource.clone(),
            message: message.into(),
        });
    }
}

/// Whether a line is part of an empty `<resources>` file
fn is_container_line(line: &str) -> bool {
    XML_PROLOG.is_match(line) || CONTAINER_OPEN.is_match(line) || CONTAINER_CLOSE.is_match(line)
}

/// Whether the remaining lines hold no resources
pub fn is_emptied(lines: &[String]) -> bool {
    let content: Vec<&String> = lines.iter().filter(|l| !l.trim().is_empty()).collect();
    content.len() <= MAX_CONTAINER_LINES
        && content.iter().all(|l| is_container_line(l))
        && !content.iter().any(|l| tracked_element_start(l).is_some())
}

/// Replace every run of blank lines with a single empty line
fn collapse_blank_runs(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && out.last().is_some_and(|l| l.trim().is_empty()) {
            continue;
        }
        out.push(if blank { String::new() } else { line });
    }
    out
}

/// Rejects a file location for a type that can only be a values element.
/// Any type may be declared as an element through `<item type="...">`, and
/// colors may also be state-list files.
fn check_shape(resource: &DeclaredResource) -> Result<(), PruneError> {
    let value_only = resource.resource_type.family() == ResourceFamily::Value
        && resource.resource_type != ResourceType::Color;
    if value_only && !resource.location.is_element() {
        Err(PruneError::LocationShape {
            name: resource.display_name(),
            expected: "element",
        })
    } else {
        Ok(())
    }
}

/// Line terminator used by `contents`
fn line_ending(contents: &str) -> &'static str {
    if contents.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

struct ElementRange<'a> {
    resource: &'a DeclaredResource,
    start: usize,
    end: usize,
}

/// Applies a [`Classification`] to the file system
#[derive(Debug, Default)]
pub struct Pruner {
    undo_script_path: Option<PathBuf>,
    undo: UndoScript,
}

impl Pruner {
    pub fn new(undo_script_path: Option<PathBuf>) -> Self {
        Self {
            undo_script_path,
            undo: UndoScript::new(),
        }
    }

    /// Remove every resource in `classification.to_remove`.
    ///
    /// The only error is an undo script target that cannot be written, which
    /// is detected before anything is touched. A resource whose location does
    /// not fit its type, and any file system problem, is a failure in the
    /// report and does not stop the others.
    pub fn execute(&mut self, classification: &Classification) -> Result<PruneReport, PruneError> {
        if let Some(script_path) = &self.undo_script_path {
            UndoScript::check_target(script_path)?;
        }

        let mut report = PruneReport {
            kept: classification.to_keep.clone(),
            ..Default::default()
        };

        let mut groups: BTreeMap<&Path, Vec<ElementRange>> = BTreeMap::new();
        for resource in &classification.to_remove {
            if let Err(e) = check_shape(resource) {
                warn!("{}; skipping", e);
                report.fail(resource, e.to_string());
                continue;
            }
            match &resource.location {
                Location::File { path } => self.remove_file(resource, path, &mut report),
                Location::Element {
                    path,
                    start_line,
                    end_line,
                    ..
                } => groups.entry(path.as_path()).or_default().push(ElementRange {
                    resource,
                    start: *start_line,
                    end: *end_line,
                }),
            }
        }

        for (path, ranges) in groups {
            self.remove_elements(path, ranges, &mut report);
        }

        if let Some(script_path) = &self.undo_script_path {
            if self.undo.file_count() > 0 {
                match self.undo.write(script_path) {
                    Ok(()) => debug!("Undo script updated at {}", script_path.display()),
                    Err(e) => {
                        warn!("Failed to write undo script {}: {}", script_path.display(), e);
                        report.undo_script_error = Some(e.to_string());
                    }
                }
            }
        }

        info!(
            "Removed {} resources ({} failures)",
            report.removed.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn remove_file(&mut self, resource: &DeclaredResource, path: &Path, report: &mut PruneReport) {
        if !path.exists() {
            report.fail(resource, PruneError::Missing(path.to_path_buf()).to_string());
            return;
        }

        if self.undo_script_path.is_some() {
            self.undo.record_path(path);
        }

        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                report.removed.push(RemovedResource {
                    resource: resource.clone(),
                    reason: RemovalReason::Unreferenced,
                });
            }
            Err(e) => {
                warn!("Failed to delete {}: {}", path.display(), e);
                report.fail(resource, e.to_string());
            }
        }
    }

    fn remove_elements(&mut self, path: &Path, mut ranges: Vec<ElementRange>, report: &mut PruneReport) {
        let fail_all = |report: &mut PruneReport, ranges: &[ElementRange], message: String| {
            for range in ranges {
                report.fail(range.resource, message.clone());
            }
        };

        if !path.exists() {
            let message = PruneError::Missing(path.to_path_buf()).to_string();
            fail_all(report, &ranges, message);
            return;
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                fail_all(report, &ranges, e.to_string());
                return;
            }
        };

        let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
        ranges.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

        // Validate the whole batch before touching anything
        let mut line_count = lines.len();
        for range in &ranges {
            if range.start == 0 || range.start > range.end || range.end > line_count {
                let err = PruneError::LineRange {
                    path: path.to_path_buf(),
                    start: range.start,
                    end: range.end,
                    line_count,
                };
                warn!("{}; leaving file untouched", err);
                fail_all(report, &ranges, err.to_string());
                return;
            }
            line_count -= range.end - range.start + 1;
        }

        for range in &ranges {
            lines.drain(range.start - 1..range.end);
        }
        let lines = collapse_blank_runs(lines);

        if self.undo_script_path.is_some() {
            self.undo.record_file_state(path, &contents);
        }

        let emptied = is_emptied(&lines);
        let result = if emptied {
            std::fs::remove_file(path).map(|()| {
                debug!("Deleted emptied values file {}", path.display());
                report.emptied_files.push(path.to_path_buf());
            })
        } else {
            let newline = line_ending(&contents);
            let mut rewritten = lines.join(newline);
            if contents.ends_with('\n') {
                rewritten.push_str(newline);
            }
            std::fs::write(path, rewritten)
        };

        match result {
            Ok(()) => {
                let reason = if emptied {
                    RemovalReason::FileEmptied
                } else {
                    RemovalReason::Unreferenced
                };
                // Report in declaration order
                report.removed.extend(ranges.iter().rev().map(|r| RemovedResource {
                    resource: r.resource.clone(),
                    reason,
                }));
            }
            Err(e) => {
                warn!("Failed to rewrite {}: {}", path.display(), e);
                fail_all(report, &ranges, e.to_string());
            }
        }
    }
}
