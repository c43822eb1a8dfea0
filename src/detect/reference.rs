use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::resource::ResourceType;

/// Which recognition strategy produced a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// `R.type.name`
    Symbol,

    /// `Alias.type.name` through `import ...R as Alias`
    Alias,

    /// `R.styleable.View_attr`
    Styleable,

    /// Generated binding class name
    Binding,

    /// `FormattedResources.name(...)`
    FormattedCall,

    /// `@type/name` in markup
    Markup,

    /// `parent="LocalStyle"`
    Parent,

    /// Dot-prefix of a style name (`A.B` for `A.B.C`)
    ImplicitParent,

    /// `?attr/name`
    ThemeAttribute,

    /// `<item name="attr">` inside a style
    StyleItem,
}

impl DetectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Symbol => "symbol",
            DetectorKind::Alias => "alias",
            DetectorKind::Styleable => "styleable",
            DetectorKind::Binding => "binding",
            DetectorKind::FormattedCall => "formatted_call",
            DetectorKind::Markup => "markup",
            DetectorKind::Parent => "parent",
            DetectorKind::ImplicitParent => "implicit_parent",
            DetectorKind::ThemeAttribute => "theme_attribute",
            DetectorKind::StyleItem => "style_item",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 1-based position of a reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourcePosition {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// One use of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub name: String,
    pub resource_type: ResourceType,
    pub location: SourcePosition,
    pub kind: DetectorKind,
}

impl Reference {
    pub fn new(
        name: impl Into<String>,
        resource_type: ResourceType,
        path: impl Into<PathBuf>,
        line: usize,
        column: usize,
        kind: DetectorKind,
    ) -> Self {
        Self {
            name: name.into(),
            resource_type,
            location: SourcePosition {
                path: path.into(),
                line,
                column,
            },
            kind,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} at {}:{}:{} ({})",
            self.resource_type,
            self.name,
            self.location.path.display(),
            self.location.line,
            self.location.column,
            self.kind
        )
    }
}
