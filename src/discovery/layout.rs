// Project layout detection
//
// Finds Android source sets by convention: every `res` directory is a resource
// root and its parent (`src/main`, `src/debug`, ...) is a source root. Build
// tools know the exact source sets; this is the fallback when the caller does
// not pass any roots.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into while looking for `res`
const SKIPPED_DIRS: &[&str] = &["build", "generated", "node_modules", "target"];

/// Resource and source roots of a project
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub resource_dirs: Vec<PathBuf>,
    pub source_dirs: Vec<PathBuf>,
}

impl ProjectLayout {
    /// Discover roots below `project_root`
    pub fn discover(project_root: &Path) -> Self {
        let mut layout = ProjectLayout::default();

        let walker = WalkDir::new(project_root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e));

        for entry in walker.flatten() {
            if !entry.file_type().is_dir() || entry.file_name() != "res" {
                continue;
            }

            let res_dir = entry.path().to_path_buf();
            if let Some(parent) = res_dir.parent() {
                layout.source_dirs.push(parent.to_path_buf());
            }
            layout.resource_dirs.push(res_dir);
        }

        layout.resource_dirs.sort();
        layout.source_dirs.sort();
        layout.source_dirs.dedup();

        debug!(
            "Discovered {} resource roots and {} source roots under {}",
            layout.resource_dirs.len(),
            layout.source_dirs.len(),
            project_root.display()
        );
        layout
    }

    pub fn is_empty(&self) -> bool {
        self.resource_dirs.is_empty()
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
}
