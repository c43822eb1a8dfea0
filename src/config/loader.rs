use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::prune::ExclusionRules;
use crate::resource::ResourceType;

/// Configuration for SearchDeadRes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit resource roots (`res` directories). Discovered when empty.
    pub resource_dirs: Vec<PathBuf>,

    /// Explicit source roots. Discovered when empty.
    pub source_dirs: Vec<PathBuf>,

    /// Path globs excluded from reference scanning
    pub exclude: Vec<String>,

    /// Regexes; a resource whose whole name matches one is always kept
    pub exclude_names: Vec<String>,

    /// When non-empty, only these resource types are candidates for removal
    pub target_types: BTreeSet<String>,

    /// Resource types that are never removed
    pub exclude_types: BTreeSet<String>,

    /// Re-run the analysis after each removal pass
    pub cascade: bool,

    /// Markup detector configuration
    pub markup: MarkupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Prefixes marking a value as belonging to the platform namespace
    pub framework_prefixes: Vec<String>,

    /// Prefixes of library-provided style names, never local parents
    pub builtin_style_prefixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_dirs: vec![],
            source_dirs: vec![],
            exclude: vec![
                "**/build/**".to_string(),
                "**/.gradle/**".to_string(),
                "**/.idea/**".to_string(),
            ],
            exclude_names: vec![],
            target_types: BTreeSet::new(),
            exclude_types: BTreeSet::new(),
            cascade: false,
            markup: MarkupConfig::default(),
        }
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            framework_prefixes: vec![
                "android:".to_string(),
                "@android:".to_string(),
                "@*android:".to_string(),
                "?android:".to_string(),
            ],
            builtin_style_prefixes: vec![
                "Theme.AppCompat".to_string(),
                "Theme.MaterialComponents".to_string(),
                "Theme.Material3".to_string(),
                "Theme.Design".to_string(),
                "ThemeOverlay.".to_string(),
                "Widget.".to_string(),
                "TextAppearance.".to_string(),
                "ShapeAppearance.".to_string(),
                "Base.".to_string(),
                "Platform.".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".deadres.yml",
            ".deadres.yaml",
            ".deadres.toml",
            "deadres.yml",
            "deadres.yaml",
            "deadres.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Compile the classification rules: name patterns and type sets
    pub fn exclusion_rules(&self) -> Result<ExclusionRules> {
        let target = parse_types(&self.target_types).wrap_err("Invalid target_types")?;
        let exclude = parse_types(&self.exclude_types).wrap_err("Invalid exclude_types")?;

        ExclusionRules::new(&self.exclude_names, target, exclude).into_diagnostic()
    }

    /// Resolve relative roots against the project directory
    pub fn resolve_roots(&mut self, project_root: &Path) {
        for dir in self.resource_dirs.iter_mut().chain(self.source_dirs.iter_mut()) {
            if dir.is_relative() {
                *dir = project_root.join(&*dir);
            }
        }
    }
}

fn parse_types(names: &BTreeSet<String>) -> Result<BTreeSet<ResourceType>> {
    names
        .iter()
        .map(|n| n.parse::<ResourceType>().into_diagnostic())
        .collect()
}

/// Simple glob matching for patterns like "*_preview" or "**/build/**"
pub fn glob_match(pattern: &str, text: &str) -> bool {
    // Handle simple wildcard patterns
    if pattern.starts_with('*') && !pattern.contains('/') {
        let suffix = &pattern[1..];
        return text.ends_with(suffix);
    }

    if pattern.ends_with('*') && !pattern.contains('/') {
        let prefix = &pattern[..pattern.len() - 1];
        return text.starts_with(prefix);
    }

    // Handle path patterns with **
    if pattern.contains("**") {
        let cleaned = pattern.replace("**/", "").replace("/**", "");

        // "**/build/**" matches a whole `build` directory anywhere in the path
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = cleaned.trim_matches('/');
            let dir_pattern = format!("/{}/", dir_name);
            return text.contains(&dir_pattern);
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            if prefix.is_empty() && suffix.is_empty() {
                return true;
            }

            if prefix.is_empty() {
                return text.ends_with(suffix) || text.contains(&format!("/{}", suffix));
            }

            if suffix.is_empty() {
                return text.starts_with(prefix) || text.contains(&format!("{}/", prefix));
            }

            return (text.starts_with(prefix) || text.contains(&format!("/{}/", prefix)))
                && (text.ends_with(suffix) || text.contains(&format!("/{}", suffix)));
        }
    }

    // Exact match
    text == pattern
}
