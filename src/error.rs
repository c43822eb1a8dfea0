//! Error types for the pruning pipeline
//!
//! Collection and detection never fail on file contents; only configuration
//! and the physical edit step produce errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PruneError {
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),

    #[error("Expected an {expected} location for {name}")]
    LocationShape { name: String, expected: &'static str },

    #[error("Lines {start}-{end} are outside {} ({line_count} lines)", path.display())]
    LineRange {
        path: PathBuf,
        start: usize,
        end: usize,
        line_count: usize,
    },

    #[error("Cannot write undo script to {}: parent directory does not exist", .0.display())]
    UndoTarget(PathBuf),

    #[error("File no longer exists: {}", .0.display())]
    Missing(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
