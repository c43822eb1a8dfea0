// File-based resource collector
//
// One file under res/<type>[-qualifiers]/ is one resource.

use super::{regular_files, split_qualifiers, subdirectories, Collector};
use crate::resource::{DeclaredResource, Location, ResourceType};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "xml"];

/// Collects drawables, layouts, menus and the other one-file-per-resource types
#[derive(Debug, Default)]
pub struct FileResourceCollector;

impl FileResourceCollector {
    pub fn new() -> Self {
        Self
    }

    fn accepts_extension(resource_type: ResourceType, ext: Option<&str>) -> bool {
        match resource_type {
            ResourceType::Raw => true,
            ResourceType::Drawable | ResourceType::Mipmap => {
                ext.map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            }
            _ => ext.map(|e| e.eq_ignore_ascii_case("xml")).unwrap_or(false),
        }
    }

    /// Resource name for a file: the file name without its extension and
    /// without a nine-patch `.9` marker
    pub fn resource_name(path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        let name = stem.strip_suffix(".9").unwrap_or(stem);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    fn collect_dir(
        &self,
        dir: &Path,
        resource_type: ResourceType,
        qualifiers: &[String],
    ) -> Vec<DeclaredResource> {
        regular_files(dir)
            .into_iter()
            .filter(|path| {
                let ext = path.extension().and_then(|e| e.to_str());
                Self::accepts_extension(resource_type, ext)
            })
            .filter_map(|path| {
                let name = Self::resource_name(&path)?;
                trace!("Declared {}/{} at {}", resource_type, name, path.display());
                Some(DeclaredResource::new(
                    name,
                    resource_type,
                    Location::File { path },
                    qualifiers.to_vec(),
                ))
            })
            .collect()
    }
}

impl Collector for FileResourceCollector {
    fn collect(&self, resource_dirs: &[PathBuf]) -> Vec<DeclaredResource> {
        let mut declared = Vec::new();

        for root in resource_dirs {
            for (dir_name, dir) in subdirectories(root) {
                let (base, qualifiers) = split_qualifiers(&dir_name);
                let Some(resource_type) = ResourceType::from_directory(base) else {
                    continue;
                };
                declared.extend(self.collect_dir(&dir, resource_type, &qualifiers));
            }
        }

        debug!("File collector found {} resources", declared.len());
        declared
    }
}
