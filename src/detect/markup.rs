//! References written in markup files
//!
//! Markup is scanned raw, one line at a time. Lines opening with `<!--` are
//! skipped. Before matching, values of design-time `tools:` attributes are
//! blanked so `tools:listitem="@layout/preview_row"` does not keep a
//! preview-only layout alive. `tools:keep` is the exception: its value lists
//! resources the developer wants retained.

use super::{scan_files, DetectorKind, Reference, ReferenceDetector};
use crate::config::MarkupConfig;
use crate::discovery::{SourceFile, SourceSet};
use crate::resource::ResourceType;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

const KEEP_ATTRIBUTE: &str = "keep";

static TOOLS_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\btools:([\w.-]+)(\s*=\s*)"([^"]*)""#).expect("valid regex")
});

static SYMBOLIC_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\+?([A-Za-z]+)/([\w.]+)").expect("valid regex"));

static PARENT_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bparent\s*=\s*"([^"]*)""#).expect("valid regex"));

static STYLE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<style\b").expect("valid regex"));

static STYLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<style\b[^>]*?\bname\s*=\s*"([^"]+)""#).expect("valid regex")
});

static THEME_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?attr/([\w.]+)").expect("valid regex"));

static ITEM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<item\b[^>]*?\bname\s*=\s*"([^"]+)""#).expect("valid regex")
});

/// Replace the value of every `tools:` attribute except `tools:keep` with
/// spaces. Byte offsets of the line are unchanged.
pub fn strip_tools_values(line: &str) -> String {
    TOOLS_ATTR
        .replace_all(line, |caps: &Captures| {
            let whole = &caps[0];
            if &caps[1] == KEEP_ATTRIBUTE {
                return whole.to_string();
            }
            format!(
                "tools:{}{}\"{}\"",
                &caps[1],
                &caps[2],
                " ".repeat(caps[3].len())
            )
        })
        .into_owned()
}

/// Proper dot prefixes of a style name, longest first: `A.B.C` → `A.B`, `A`
fn implicit_parents(name: &str) -> Vec<&str> {
    name.char_indices()
        .filter(|(_, c)| *c == '.')
        .map(|(i, _)| &name[..i])
        .filter(|prefix| !prefix.is_empty())
        .rev()
        .collect()
}

/// A `<style` opening tag whose `>` has not been seen yet
struct OpenStyleTag {
    text: String,
    line: usize,
    column: usize,
}

/// Detects references in markup files
#[derive(Debug, Clone, Default)]
pub struct MarkupDetector {
    config: MarkupConfig,
}

impl MarkupDetector {
    pub fn new(config: MarkupConfig) -> Self {
        Self { config }
    }

    fn is_framework(&self, value: &str) -> bool {
        self.config
            .framework_prefixes
            .iter()
            .any(|p| value.starts_with(p.as_str()))
    }

    fn is_builtin_style(&self, value: &str) -> bool {
        self.config
            .builtin_style_prefixes
            .iter()
            .any(|p| value.starts_with(p.as_str()))
    }

    /// Whether a `parent` value names a style declared in this project
    fn is_local_parent(&self, value: &str) -> bool {
        !value.is_empty()
            && !value.starts_with('@')
            && !value.contains('.')
            && !self.is_framework(value)
            && !self.is_builtin_style(value)
    }

    /// Implicit parents of the style opened by a complete `<style ...>` tag
    fn style_tag_references(&self, file: &SourceFile, tag: &OpenStyleTag, refs: &mut Vec<Reference>) {
        let Some(name) = STYLE_NAME.captures(&tag.text).and_then(|c| c.get(1)) else {
            return;
        };
        if self.is_framework(name.as_str()) {
            return;
        }
        for parent in implicit_parents(name.as_str()) {
            refs.push(Reference::new(
                parent,
                ResourceType::Style,
                file.path.clone(),
                tag.line,
                tag.column,
                DetectorKind::ImplicitParent,
            ));
        }
    }

    pub fn scan_source(&self, file: &SourceFile, source: &str) -> Vec<Reference> {
        let mut refs = Vec::new();
        let mut in_style = false;
        let mut style_tag: Option<OpenStyleTag> = None;

        for (idx, raw) in source.lines().enumerate() {
            if raw.trim_start().starts_with("<!--") {
                continue;
            }

            let line = strip_tools_values(raw);
            let line_no = idx + 1;

            // The opening tag of a style may span several lines
            let mut from = 0;
            if style_tag.is_none() {
                if let Some(open) = STYLE_OPEN.find(&line) {
                    from = open.start();
                    style_tag = Some(OpenStyleTag {
                        text: String::new(),
                        line: line_no,
                        column: open.start() + 1,
                    });
                }
            }
            if let Some(tag) = style_tag.as_mut() {
                let fragment = &line[from..];
                let gt = fragment.find('>');
                tag.text.push_str(gt.map_or(fragment, |gt| &fragment[..=gt]));
                tag.text.push(' ');
                if let Some(gt) = gt {
                    let self_closing = fragment[..gt].trim_end().ends_with('/');
                    if let Some(tag) = style_tag.take() {
                        self.style_tag_references(file, &tag, &mut refs);
                    }
                    in_style = !self_closing;
                }
            }

            let mut push = |name: &str, resource_type, column: usize, kind| {
                refs.push(Reference::new(
                    name,
                    resource_type,
                    file.path.clone(),
                    line_no,
                    column + 1,
                    kind,
                ));
            };

            for caps in SYMBOLIC_VALUE.captures_iter(&line) {
                let (Some(whole), Some(segment), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };
                if let Some(resource_type) = ResourceType::from_markup(segment.as_str()) {
                    push(name.as_str(), resource_type, whole.start(), DetectorKind::Markup);
                }
            }

            for caps in PARENT_ATTR.captures_iter(&line) {
                let Some(value) = caps.get(1) else { continue };
                if self.is_local_parent(value.as_str()) {
                    push(value.as_str(), ResourceType::Style, value.start(), DetectorKind::Parent);
                }
            }

            for caps in THEME_ATTR.captures_iter(&line) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                push(name.as_str(), ResourceType::Attr, whole.start(), DetectorKind::ThemeAttribute);
            }

            if in_style {
                for caps in ITEM_NAME.captures_iter(&line) {
                    let Some(name) = caps.get(1) else { continue };
                    if !name.as_str().contains(':') {
                        push(name.as_str(), ResourceType::Attr, name.start(), DetectorKind::StyleItem);
                    }
                }
            }
            if line.contains("</style>") {
                in_style = false;
            }
        }
        refs
    }
}

impl ReferenceDetector for MarkupDetector {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn detect(&self, files: &SourceSet) -> HashSet<Reference> {
        scan_files(&files.markup, |file, contents| self.scan_source(file, contents))
    }
}
