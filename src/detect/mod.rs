//! Reference detectors
//!
//! Each detector recognises one naming convention for using a resource and
//! reports [`Reference`]s. [`ReferenceScanner`] discovers the files once and
//! unions the results of the fixed detector set.
//!
//! | detector | recognises |
//! |---|---|
//! | [`SymbolDetector`] | `R.string.name`, aliased `AppR.string.name`, `R.styleable.View_attr` |
//! | [`BindingDetector`] | `ActivityMainBinding` → `layout/activity_main` |
//! | [`FormattedCallDetector`] | `FormattedResources.greeting(...)` → `string/greeting` |
//! | [`MarkupDetector`] | `@type/name`, `?attr/name`, style parents and item names |

mod binding;
mod formatted;
mod markup;
mod reference;
mod symbol;

pub use binding::{binding_layout_name, BindingDetector};
pub use formatted::{FormattedCallDetector, FORMATTED_RESOURCES_MARKER};
pub use markup::MarkupDetector;
pub use reference::{DetectorKind, Reference, SourcePosition};
pub use symbol::SymbolDetector;

use crate::config::{Config, MarkupConfig};
use crate::discovery::{FileFinder, SourceFile, SourceSet};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Path fragments of directories holding generated view/data binding classes
pub const BINDING_OUTPUT_MARKERS: &[&str] = &[
    "generated/data_binding_base_class_source_out",
    "generated/source/dataBinding",
    "generated/source/kapt",
    "generated/ksp",
];

/// Path fragment of the directory this tool generates formatted-resource
/// accessors into
pub const FORMATTED_OUTPUT_MARKER: &str = "generated/formatted_resources";

/// Whether a file lives in generated binding output
pub fn is_binding_output(file: &SourceFile) -> bool {
    let path = file.normalized_path();
    BINDING_OUTPUT_MARKERS.iter().any(|m| path.contains(m))
}

/// Whether a file lives in the generated formatted-resource output
pub fn is_formatted_output(file: &SourceFile) -> bool {
    file.normalized_path().contains(FORMATTED_OUTPUT_MARKER)
}

/// A strategy for finding resource references in a set of files
pub trait ReferenceDetector: Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn detect(&self, files: &SourceSet) -> HashSet<Reference>;
}

/// Scan every file of `files` in parallel with `scan_file` and merge the
/// results
pub(crate) fn scan_files<F>(files: &[SourceFile], scan_file: F) -> HashSet<Reference>
where
    F: Fn(&SourceFile, &str) -> Vec<Reference> + Sync,
{
    files
        .par_iter()
        .flat_map_iter(|file| match file.read_contents() {
            Some(contents) => scan_file(file, &contents),
            None => Vec::new(),
        })
        .collect()
}

/// The composite of all reference detectors
pub struct ReferenceScanner {
    finder: FileFinder,
    symbol: SymbolDetector,
    binding: BindingDetector,
    formatted: FormattedCallDetector,
    markup: MarkupDetector,
}

impl ReferenceScanner {
    pub fn new(exclude: Vec<String>, markup: MarkupConfig) -> Self {
        Self {
            finder: FileFinder::new(exclude),
            symbol: SymbolDetector::new(),
            binding: BindingDetector::new(),
            formatted: FormattedCallDetector::new(),
            markup: MarkupDetector::new(markup),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.exclude.clone(), config.markup.clone())
    }

    fn detectors(&self) -> [&dyn ReferenceDetector; 4] {
        [&self.symbol, &self.binding, &self.formatted, &self.markup]
    }

    /// Find every reference under the source and resource roots
    pub fn detect(&self, source_dirs: &[PathBuf], resource_dirs: &[PathBuf]) -> HashSet<Reference> {
        let files = self.finder.source_set(source_dirs, resource_dirs);
        info!("Scanning {} files for resource references", files.len());
        self.detect_in(&files)
    }

    /// Run every detector over an already discovered file set
    pub fn detect_in(&self, files: &SourceSet) -> HashSet<Reference> {
        let mut references = HashSet::new();
        for detector in self.detectors() {
            let found = detector.detect(files);
            debug!("{} detector found {} references", detector.name(), found.len());
            references.extend(found);
        }
        references
    }
}

impl Default for ReferenceScanner {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
