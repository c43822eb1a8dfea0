//! Resource model shared by the collectors, detectors and the pruner.
//!
//! A declared resource is either a whole file (`res/drawable/icon.png`) or an
//! element inside a shared values file (`<string name="app_name">`). The two
//! shapes never share removal logic, so the location is a sum type.

mod declared;

pub use declared::{DeclaredResource, Location};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PruneError;

/// Whether a resource type is normally declared as its own file or as an
/// element of a values file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceFamily {
    File,
    Value,
}

/// Closed set of tracked resource types
///
/// The names returned by [`ResourceType::as_str`] are the stable vocabulary
/// used in configuration files, on the command line and in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    // File-based
    Drawable,
    Mipmap,
    Layout,
    Menu,
    Xml,
    Animator,
    Anim,
    Raw,

    // Shared: `res/color/*.xml` state lists and `<color>` elements
    Color,

    // Value-based
    String,
    Dimen,
    Style,
    Bool,
    Integer,
    Array,
    Attr,
    Plurals,
}

impl ResourceType {
    pub const ALL: [ResourceType; 17] = [
        ResourceType::Drawable,
        ResourceType::Mipmap,
        ResourceType::Layout,
        ResourceType::Menu,
        ResourceType::Xml,
        ResourceType::Animator,
        ResourceType::Anim,
        ResourceType::Raw,
        ResourceType::Color,
        ResourceType::String,
        ResourceType::Dimen,
        ResourceType::Style,
        ResourceType::Bool,
        ResourceType::Integer,
        ResourceType::Array,
        ResourceType::Attr,
        ResourceType::Plurals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Drawable => "drawable",
            ResourceType::Mipmap => "mipmap",
            ResourceType::Layout => "layout",
            ResourceType::Menu => "menu",
            ResourceType::Xml => "xml",
            ResourceType::Animator => "animator",
            ResourceType::Anim => "anim",
            ResourceType::Raw => "raw",
            ResourceType::Color => "color",
            ResourceType::String => "string",
            ResourceType::Dimen => "dimen",
            ResourceType::Style => "style",
            ResourceType::Bool => "bool",
            ResourceType::Integer => "integer",
            ResourceType::Array => "array",
            ResourceType::Attr => "attr",
            ResourceType::Plurals => "plurals",
        }
    }

    /// Look up a type by its vocabulary name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Default family of the type. `Color` reports `Value`; a color state list
    /// collected from `res/color/` still carries a file location.
    pub fn family(&self) -> ResourceFamily {
        match self {
            ResourceType::Drawable
            | ResourceType::Mipmap
            | ResourceType::Layout
            | ResourceType::Menu
            | ResourceType::Xml
            | ResourceType::Animator
            | ResourceType::Anim
            | ResourceType::Raw => ResourceFamily::File,
            _ => ResourceFamily::Value,
        }
    }

    /// Type of a file-based resource directory such as `drawable-hdpi`,
    /// given its base name (`drawable`)
    pub fn from_directory(base: &str) -> Option<Self> {
        match base {
            "drawable" => Some(ResourceType::Drawable),
            "mipmap" => Some(ResourceType::Mipmap),
            "layout" => Some(ResourceType::Layout),
            "menu" => Some(ResourceType::Menu),
            "xml" => Some(ResourceType::Xml),
            "animator" => Some(ResourceType::Animator),
            "anim" => Some(ResourceType::Anim),
            "color" => Some(ResourceType::Color),
            "raw" => Some(ResourceType::Raw),
            _ => None,
        }
    }

    /// Type of a values-file element tag. `item` is resolved separately
    /// through its `type` attribute.
    pub fn from_value_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(ResourceType::String),
            "color" => Some(ResourceType::Color),
            "dimen" => Some(ResourceType::Dimen),
            "style" => Some(ResourceType::Style),
            "bool" => Some(ResourceType::Bool),
            "integer" => Some(ResourceType::Integer),
            "array" | "string-array" | "integer-array" => Some(ResourceType::Array),
            "attr" => Some(ResourceType::Attr),
            "plurals" => Some(ResourceType::Plurals),
            _ => None,
        }
    }

    /// Type named in an `@type/name` markup reference. Ids, fonts and raw
    /// files are not tracked from markup.
    pub fn from_markup(segment: &str) -> Option<Self> {
        match segment {
            "raw" => None,
            other => Self::from_name(other),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = PruneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| PruneError::UnknownResourceType(s.to_string()))
    }
}

/// Name of the generated symbol field for a resource name.
///
/// Dots, dashes and colons all become underscores, so `Theme.App.Dark`
/// and `Theme_App_Dark` name the same resource.
pub fn field_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | '-' | ':' => '_',
            other => other,
        })
        .collect()
}
