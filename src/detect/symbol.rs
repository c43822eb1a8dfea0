//! Direct symbol references: `R.<type>.<name>`
//!
//! Kotlin files may import the symbol class under another name
//! (`import com.example.core.R as CoreR`). Aliases are collected per file
//! first, then a pattern covering `R` and every alias is applied line by line.
//! Attribute-table accesses (`R.styleable.ChipView_chipColor`) reference the
//! attribute after the first underscore.

use super::{is_binding_output, is_formatted_output, scan_files, DetectorKind, Reference, ReferenceDetector};
use crate::discovery::{SourceFile, SourceSet};
use crate::resource::ResourceType;
use crate::tokenizer::mask;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, trace};

const ROOT_SYMBOL: &str = "R";
const ATTRIBUTE_TABLE: &str = "styleable";

static ALIAS_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*import\s+(?:[\w.]+\.)?R\s+as\s+([A-Za-z_]\w*)").expect("valid regex")
});

static DEFAULT_ACCESS: Lazy<Regex> = Lazy::new(|| access_pattern(&[]));

fn access_pattern(aliases: &[String]) -> Regex {
    let roots: Vec<String> = std::iter::once(ROOT_SYMBOL.to_string())
        .chain(aliases.iter().map(|a| regex::escape(a)))
        .collect();
    Regex::new(&format!(r"\b({})\.(\w+)\.(\w+)\b", roots.join("|"))).expect("valid regex")
}

/// Attribute name in an attribute-table field: `ChipView_chipColor` → `chipColor`
pub fn styleable_attribute(compound: &str) -> Option<&str> {
    let (_, attr) = compound.split_once('_')?;
    if attr.is_empty() {
        None
    } else {
        Some(attr)
    }
}

/// Detects `R.type.name` and aliased accesses in Kotlin and Java
#[derive(Debug, Default)]
pub struct SymbolDetector;

impl SymbolDetector {
    pub fn new() -> Self {
        Self
    }

    /// Aliases of the symbol class declared in `masked`
    pub fn collect_aliases(masked: &str) -> Vec<String> {
        let aliases: BTreeSet<String> = ALIAS_IMPORT
            .captures_iter(masked)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|a| a != ROOT_SYMBOL)
            .collect();
        aliases.into_iter().collect()
    }

    /// Scan one file's source text
    pub fn scan_source(&self, file: &SourceFile, source: &str) -> Vec<Reference> {
        let masked = mask(source);
        let aliases = Self::collect_aliases(&masked);

        let custom;
        let pattern: &Regex = if aliases.is_empty() {
            &*DEFAULT_ACCESS
        } else {
            trace!("{}: symbol aliases {:?}", file.path.display(), aliases);
            custom = access_pattern(&aliases);
            &custom
        };

        let mut refs = Vec::new();
        for (idx, line) in masked.lines().enumerate() {
            for caps in pattern.captures_iter(line) {
                let (Some(whole), Some(root), Some(segment), Some(name)) =
                    (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
                else {
                    continue;
                };

                // Platform symbols (`android.R.string.ok`) are not ours
                if line[..whole.start()].ends_with("android.") {
                    continue;
                }

                let kind = if root.as_str() == ROOT_SYMBOL {
                    DetectorKind::Symbol
                } else {
                    DetectorKind::Alias
                };
                let column = whole.start() + 1;

                if segment.as_str() == ATTRIBUTE_TABLE {
                    if let Some(attr) = styleable_attribute(name.as_str()) {
                        refs.push(Reference::new(
                            attr,
                            ResourceType::Attr,
                            file.path.clone(),
                            idx + 1,
                            column,
                            DetectorKind::Styleable,
                        ));
                    }
                    continue;
                }

                let Some(resource_type) = ResourceType::from_name(segment.as_str()) else {
                    continue;
                };

                refs.push(Reference::new(
                    name.as_str(),
                    resource_type,
                    file.path.clone(),
                    idx + 1,
                    column,
                    kind,
                ));
            }
        }
        refs
    }
}

impl ReferenceDetector for SymbolDetector {
    fn name(&self) -> &'static str {
        "symbol"
    }

    fn detect(&self, files: &SourceSet) -> HashSet<Reference> {
        let code: Vec<SourceFile> = files
            .code
            .iter()
            .filter(|f| {
                let generated = is_binding_output(f) || is_formatted_output(f);
                if generated {
                    debug!("Skipping generated source {}", f.path.display());
                }
                !generated
            })
            .cloned()
            .collect();

        scan_files(&code, |file, contents| self.scan_source(file, contents))
    }
}
