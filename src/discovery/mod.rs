mod file_finder;
mod layout;

pub use file_finder::{FileFinder, FileType, SourceFile, SourceSet};
pub use layout::ProjectLayout;
