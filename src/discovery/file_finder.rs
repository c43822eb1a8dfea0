use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Type of a scanned file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Kotlin,
    Java,
    Xml,
}

impl FileType {
    /// Determine file type from path
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension {
            "kt" | "kts" => Some(FileType::Kotlin),
            "java" => Some(FileType::Java),
            "xml" => Some(FileType::Xml),
            _ => None,
        }
    }

    /// Check if this is a source code file (Kotlin or Java)
    pub fn is_source(&self) -> bool {
        matches!(self, FileType::Kotlin | FileType::Java)
    }

    pub fn is_xml(&self) -> bool {
        matches!(self, FileType::Xml)
    }
}

/// A discovered file to scan for references
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_type: FileType,
}

impl SourceFile {
    pub fn new(path: PathBuf, file_type: FileType) -> Self {
        Self { path, file_type }
    }

    /// Read the file, or `None` when it cannot be read as UTF-8 text
    pub fn read_contents(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                debug!("Skipping unreadable {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Path with `/` separators, for substring conventions on directories
    pub fn normalized_path(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }
}

/// Every file that reference detectors look at, split by kind
#[derive(Debug, Default, Clone)]
pub struct SourceSet {
    /// Kotlin and Java files
    pub code: Vec<SourceFile>,
    /// Markup from both source and resource roots
    pub markup: Vec<SourceFile>,
}

impl SourceSet {
    pub fn len(&self) -> usize {
        self.code.len() + self.markup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.markup.is_empty()
    }
}

/// Finds scan targets under a set of roots
pub struct FileFinder {
    exclude: Vec<String>,
}

impl FileFinder {
    pub fn new(exclude: Vec<String>) -> Self {
        Self { exclude }
    }

    /// Build the scan set for the given source and resource roots. A file
    /// reachable from several roots is listed once.
    pub fn source_set(&self, source_roots: &[PathBuf], resource_roots: &[PathBuf]) -> SourceSet {
        let mut roots: Vec<&PathBuf> = source_roots.iter().chain(resource_roots.iter()).collect();
        roots.sort();
        roots.dedup();

        let mut files: Vec<SourceFile> = roots
            .par_iter()
            .flat_map(|root| self.scan_directory(root))
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        let (code, markup): (Vec<_>, Vec<_>) =
            files.into_iter().partition(|f| f.file_type.is_source());

        debug!("Found {} code files and {} markup files", code.len(), markup.len());
        SourceSet { code, markup }
    }

    /// Scan a single directory for source files
    fn scan_directory(&self, dir: &Path) -> Vec<SourceFile> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }

        let walker = WalkBuilder::new(dir)
            .hidden(true)           // Skip hidden files
            .git_ignore(true)       // Respect .gitignore
            .git_global(true)       // Respect global gitignore
            .git_exclude(true)      // Respect .git/info/exclude
            .ignore(true)           // Respect .ignore files
            .parents(true)          // Check parent directories for ignore files
            .follow_links(false)    // Don't follow symlinks
            .build();

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();

                // Check exclusion patterns
                if self.should_exclude(path) {
                    trace!("Excluding: {}", path.display());
                    return None;
                }

                let file_type = FileType::from_path(path)?;

                trace!("Found {:?}: {}", file_type, path.display());
                Some(SourceFile::new(path.to_path_buf(), file_type))
            })
            .collect()
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.exclude
            .iter()
            .any(|pattern| crate::config::glob_match(pattern, &path_str))
    }
}
