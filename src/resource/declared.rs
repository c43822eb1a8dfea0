use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::ResourceType;

/// Where a declared resource lives, and therefore what removing it means
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Location {
    /// The whole file is the resource
    File { path: PathBuf },

    /// A 1-based inclusive line range inside a shared values file
    Element {
        path: PathBuf,
        start_line: usize,
        end_line: usize,
        raw_text: String,
    },
}

impl Location {
    pub fn path(&self) -> &Path {
        match self {
            Location::File { path } => path,
            Location::Element { path, .. } => path,
        }
    }

    /// First line of the declaration (1 for whole files)
    pub fn line(&self) -> usize {
        match self {
            Location::File { .. } => 1,
            Location::Element { start_line, .. } => *start_line,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Location::Element { .. })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File { path } => write!(f, "{}", path.display()),
            Location::Element { path, start_line, end_line, .. } if start_line == end_line => {
                write!(f, "{}:{}", path.display(), start_line)
            }
            Location::Element { path, start_line, end_line, .. } => {
                write!(f, "{}:{}-{}", path.display(), start_line, end_line)
            }
        }
    }
}

/// A resource declared somewhere under a resource root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeclaredResource {
    /// Declared name (`app_name`, `Theme.App`, `icon`)
    pub name: String,

    pub resource_type: ResourceType,

    pub location: Location,

    /// Directory qualifiers such as `hdpi` or `night`, in directory order
    pub qualifiers: Vec<String>,
}

impl DeclaredResource {
    pub fn new(
        name: impl Into<String>,
        resource_type: ResourceType,
        location: Location,
        qualifiers: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            resource_type,
            location,
            qualifiers,
        }
    }

    /// Name as it appears in the generated symbol class
    pub fn field_name(&self) -> String {
        super::field_name(&self.name)
    }

    /// `string/app_name`, with qualifiers appended when present
    pub fn display_name(&self) -> String {
        if self.qualifiers.is_empty() {
            format!("{}/{}", self.resource_type, self.name)
        } else {
            format!(
                "{}/{} ({})",
                self.resource_type,
                self.name,
                self.qualifiers.join("-")
            )
        }
    }
}
