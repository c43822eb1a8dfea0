//! Generated binding class references
//!
//! View binding and data binding generate one class per layout, named after
//! the layout in PascalCase with a `Binding` suffix. Any use of
//! `ActivityMainBinding` therefore uses `layout/activity_main`.

use super::{is_binding_output, scan_files, DetectorKind, Reference, ReferenceDetector};
use crate::discovery::{SourceFile, SourceSet};
use crate::resource::ResourceType;
use crate::tokenizer::mask;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const BINDING_SUFFIX: &str = "Binding";

static BINDING_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b([A-Z][A-Za-z0-9]*){}\b", BINDING_SUFFIX)).expect("valid regex")
});

/// Layout name behind a binding class prefix: `ActivityMain` → `activity_main`
pub fn binding_layout_name(prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }

    let mut name = String::with_capacity(prefix.len() + 4);
    for (i, c) in prefix.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            name.push('_');
        }
        name.push(c.to_ascii_lowercase());
    }
    Some(name)
}

/// Detects generated binding class names in Kotlin and Java
#[derive(Debug, Default)]
pub struct BindingDetector;

impl BindingDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn scan_source(&self, file: &SourceFile, source: &str) -> Vec<Reference> {
        let masked = mask(source);
        let mut refs = Vec::new();

        for (idx, line) in masked.lines().enumerate() {
            for caps in BINDING_CLASS.captures_iter(line) {
                let Some(prefix) = caps.get(1) else { continue };
                let Some(layout) = binding_layout_name(prefix.as_str()) else {
                    continue;
                };
                refs.push(Reference::new(
                    layout,
                    ResourceType::Layout,
                    file.path.clone(),
                    idx + 1,
                    prefix.start() + 1,
                    DetectorKind::Binding,
                ));
            }
        }
        refs
    }
}

impl ReferenceDetector for BindingDetector {
    fn name(&self) -> &'static str {
        "binding"
    }

    fn detect(&self, files: &SourceSet) -> HashSet<Reference> {
        let code: Vec<SourceFile> = files
            .code
            .iter()
            .filter(|f| !is_binding_output(f))
            .cloned()
            .collect();

        scan_files(&code, |file, contents| self.scan_source(file, contents))
    }
}
