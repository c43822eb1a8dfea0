//! Formatted-resource accessor calls
//!
//! The formatted-resources generator emits one typed accessor per string
//! (`FormattedResources.welcome_message(name)`), so the called method name is
//! the string's name. The generated accessors themselves live under
//! [`FORMATTED_OUTPUT_MARKER`](super::FORMATTED_OUTPUT_MARKER) and must not be
//! scanned, or every string would reference itself.

use super::{is_formatted_output, scan_files, DetectorKind, Reference, ReferenceDetector};
use crate::discovery::{SourceFile, SourceSet};
use crate::resource::ResourceType;
use crate::tokenizer::mask;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Object through which generated accessors are called
pub const FORMATTED_RESOURCES_MARKER: &str = "FormattedResources";

static FORMATTED_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b{}\s*\.\s*([A-Za-z_]\w*)\s*\(",
        FORMATTED_RESOURCES_MARKER
    ))
    .expect("valid regex")
});

#[derive(Debug, Default)]
pub struct FormattedCallDetector;

impl FormattedCallDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn scan_source(&self, file: &SourceFile, source: &str) -> Vec<Reference> {
        let masked = mask(source);
        let mut refs = Vec::new();

        for (idx, line) in masked.lines().enumerate() {
            for caps in FORMATTED_CALL.captures_iter(line) {
                let Some(method) = caps.get(1) else { continue };
                refs.push(Reference::new(
                    method.as_str(),
                    ResourceType::String,
                    file.path.clone(),
                    idx + 1,
                    method.start() + 1,
                    DetectorKind::FormattedCall,
                ));
            }
        }
        refs
    }
}

impl ReferenceDetector for FormattedCallDetector {
    fn name(&self) -> &'static str {
        "formatted_call"
    }

    fn detect(&self, files: &SourceSet) -> HashSet<Reference> {
        let code: Vec<SourceFile> = files
            .code
            .iter()
            .filter(|f| {
                let generated = is_formatted_output(f);
                if generated {
                    debug!("Skipping formatted-resource output {}", f.path.display());
                }
                !generated
            })
            .cloned()
            .collect();

        scan_files(&code, |file, contents| self.scan_source(file, contents))
    }
}
