// Value-based resource collector
//
// Scans res/values*/ XML files line by line. This is deliberately not an XML
// parser: each element's exact line span is what the pruner later cuts out,
// so the scanner works in lines from the start.

use super::{regular_files, split_qualifiers, subdirectories, Collector};
use crate::resource::{DeclaredResource, Location, ResourceType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

static ELEMENT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<([A-Za-z][\w.-]*)").expect("valid regex"));

static NAME_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bname\s*=\s*"([^"]*)""#).expect("valid regex"));

static TYPE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\btype\s*=\s*"([^"]*)""#).expect("valid regex"));

/// Tag of a tracked value element starting at the beginning of `line`
pub fn tracked_element_start(line: &str) -> Option<&str> {
    let caps = ELEMENT_START.captures(line)?;
    let tag = caps.get(1)?.as_str();
    if tag == "item" || ResourceType::from_value_tag(tag).is_some() {
        Some(tag)
    } else {
        None
    }
}

/// Collects `<string>`, `<style>`, `<item type="...">` and the other value
/// elements from `values` directories
#[derive(Debug, Default)]
pub struct ValueResourceCollector;

impl ValueResourceCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Collector for ValueResourceCollector {
    fn collect(&self, resource_dirs: &[PathBuf]) -> Vec<DeclaredResource> {
        let mut declared = Vec::new();

        for root in resource_dirs {
            for (dir_name, dir) in subdirectories(root) {
                let (base, qualifiers) = split_qualifiers(&dir_name);
                if base != "values" {
                    continue;
                }

                for file in regular_files(&dir) {
                    let is_xml = file
                        .extension()
                        .map(|e| e.eq_ignore_ascii_case("xml"))
                        .unwrap_or(false);
                    if !is_xml {
                        continue;
                    }

                    match std::fs::read_to_string(&file) {
                        Ok(content) => {
                            let scanner = ValuesScanner::new(&file, &qualifiers);
                            declared.extend(scanner.scan(&content));
                        }
                        Err(e) => debug!("Skipping unreadable {}: {}", file.display(), e),
                    }
                }
            }
        }

        debug!("Value collector found {} resources", declared.len());
        declared
    }
}

/// An element whose closing has not been seen yet
#[derive(Debug)]
struct OpenElement {
    tag: String,
    start_line: usize,
    lines: Vec<String>,
    /// Whether the `>` ending the opening tag has been seen
    opening_closed: bool,
}

impl OpenElement {
    /// Feed the next piece of text. Returns the offset just past the end of
    /// the element when it completes inside `fragment`.
    fn advance(&mut self, fragment: &str) -> Option<usize> {
        let mut offset = 0;
        if !self.opening_closed {
            let gt = fragment.find('>')?;
            if fragment[..gt].ends_with('/') {
                return Some(gt + 1);
            }
            self.opening_closed = true;
            offset = gt + 1;
        }
        find_end_tag(&fragment[offset..], &self.tag).map(|end| offset + end)
    }
}

/// Offset just past `</tag>` (whitespace allowed before `>`)
fn find_end_tag(text: &str, tag: &str) -> Option<usize> {
    let needle = format!("</{}", tag);
    for (i, _) in text.match_indices(&needle) {
        let after = &text[i + needle.len()..];
        let trimmed = after.trim_start();
        if trimmed.starts_with('>') {
            return Some(text.len() - trimmed.len() + 1);
        }
    }
    None
}

#[derive(Debug)]
enum ScanState {
    Idle,
    InComment,
    Accumulating(OpenElement),
}

/// Line-driven scanner for a single values file
///
/// A declaration is emitted as soon as its element closes, with the element's
/// full line span. An element whose last line also holds another construct
/// (`<resources><string name="a">A</string></resources>`, or two elements on
/// one line) is not declared at all, since removing its lines would remove
/// the neighbour as well. Such elements are logged at `info` and are never
/// pruned. A trailing comment does not count as a neighbour.
pub struct ValuesScanner<'a> {
    path: &'a Path,
    qualifiers: &'a [String],
}

impl<'a> ValuesScanner<'a> {
    pub fn new(path: &'a Path, qualifiers: &'a [String]) -> Self {
        Self { path, qualifiers }
    }

    pub fn scan(&self, content: &str) -> Vec<DeclaredResource> {
        let mut declared = Vec::new();
        let mut state = ScanState::Idle;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;

            state = match state {
                ScanState::InComment => {
                    if line.contains("-->") {
                        ScanState::Idle
                    } else {
                        ScanState::InComment
                    }
                }
                ScanState::Accumulating(mut open) => {
                    open.lines.push(line.to_string());
                    match open.advance(line) {
                        Some(end) => {
                            declared.extend(self.finish(open, &line[end..], line_no));
                            ScanState::Idle
                        }
                        None => ScanState::Accumulating(open),
                    }
                }
                ScanState::Idle => self.start(line, line_no, &mut declared),
            };
        }

        if let ScanState::Accumulating(open) = state {
            debug!(
                "Dropping unterminated <{}> at {}:{}",
                open.tag,
                self.path.display(),
                open.start_line
            );
        }

        declared
    }

    fn start(&self, line: &str, line_no: usize, declared: &mut Vec<DeclaredResource>) -> ScanState {
        let trimmed = line.trim_start();
        if let Some(comment) = trimmed.strip_prefix("<!--") {
            return if comment.contains("-->") {
                ScanState::Idle
            } else {
                ScanState::InComment
            };
        }

        let Some(tag) = tracked_element_start(line) else {
            return ScanState::Idle;
        };

        let tag_end = line.len() - trimmed.len() + 1 + tag.len();
        let mut open = OpenElement {
            tag: tag.to_string(),
            start_line: line_no,
            lines: vec![line.to_string()],
            opening_closed: false,
        };

        let rest = &line[tag_end..];
        match open.advance(rest) {
            Some(end) => {
                declared.extend(self.finish(open, &rest[end..], line_no));
                ScanState::Idle
            }
            None => ScanState::Accumulating(open),
        }
    }

    /// Turn a completed element into a declaration. `trailing` is whatever
    /// follows the element on its last line.
    fn finish(&self, open: OpenElement, trailing: &str, end_line: usize) -> Option<DeclaredResource> {
        let trailing = trailing.trim();
        if !trailing.is_empty() && !trailing.starts_with("<!--") {
            // Another construct shares the line; cutting the line would take it too
            info!(
                "Not tracking <{}> at {}:{}: line is shared with other markup",
                open.tag,
                self.path.display(),
                open.start_line
            );
            return None;
        }

        let text = open.lines.join("\n");
        let opening = match text.find('>') {
            Some(i) => &text[..=i],
            None => text.as_str(),
        };

        let name = NAME_ATTR.captures(opening)?.get(1)?.as_str();
        if name.is_empty() || name.contains(':') {
            return None;
        }

        let resource_type = if open.tag == "item" {
            let ty = TYPE_ATTR.captures(opening)?.get(1)?.as_str();
            ResourceType::from_name(ty)?
        } else {
            ResourceType::from_value_tag(&open.tag)?
        };

        trace!(
            "Declared {}/{} at {}:{}-{}",
            resource_type,
            name,
            self.path.display(),
            open.start_line,
            end_line
        );

        Some(DeclaredResource::new(
            name,
            resource_type,
            Location::Element {
                path: self.path.to_path_buf(),
                start_line: open.start_line,
                end_line,
                raw_text: text.clone(),
            },
            self.qualifiers.to_vec(),
        ))
    }
}
