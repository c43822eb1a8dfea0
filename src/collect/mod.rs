//! Declaration collectors
//!
//! Each collector walks the resource roots and returns the resources it
//! recognises. [`DeclarationCollector`] runs the fixed set of collectors and
//! concatenates their output.

mod files;
mod values;

pub use files::FileResourceCollector;
pub use values::{tracked_element_start, ValueResourceCollector, ValuesScanner};

use crate::resource::DeclaredResource;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that enumerates declared resources under resource roots
pub trait Collector {
    fn collect(&self, resource_dirs: &[PathBuf]) -> Vec<DeclaredResource>;
}

/// Runs the file-based and value-based collectors together
#[derive(Default)]
pub struct DeclarationCollector {
    files: FileResourceCollector,
    values: ValueResourceCollector,
}

impl DeclarationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn collectors(&self) -> [&dyn Collector; 2] {
        [&self.files, &self.values]
    }
}

impl Collector for DeclarationCollector {
    fn collect(&self, resource_dirs: &[PathBuf]) -> Vec<DeclaredResource> {
        let mut declared: Vec<DeclaredResource> = self
            .collectors()
            .iter()
            .flat_map(|c| c.collect(resource_dirs))
            .collect();

        declared.sort_by(|a, b| {
            a.location
                .path()
                .cmp(b.location.path())
                .then(a.location.line().cmp(&b.location.line()))
                .then(a.name.cmp(&b.name))
        });

        debug!("Collected {} declared resources", declared.len());
        declared
    }
}

/// Split a resource directory name into its base and qualifiers:
/// `drawable-night-hdpi` becomes (`drawable`, [`night`, `hdpi`])
pub fn split_qualifiers(dir_name: &str) -> (&str, Vec<String>) {
    let mut parts = dir_name.split('-');
    let base = parts.next().unwrap_or_default();
    (base, parts.map(str::to_string).collect())
}

/// Immediate subdirectories of a resource root, sorted by name
fn subdirectories(root: &Path) -> Vec<(String, PathBuf)> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot list resource root {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    let mut dirs: Vec<(String, PathBuf)> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            if name.starts_with('.') {
                return None;
            }
            Some((name, e.path()))
        })
        .collect();
    dirs.sort();
    dirs
}

/// Regular, non-hidden files directly inside `dir`, sorted by path
fn regular_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}
