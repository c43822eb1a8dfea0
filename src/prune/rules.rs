//! Classification of declared resources into removable and kept
//!
//! Every resource is run through [`RULES`] in order and the first matching
//! rule decides. Names are compared in field-name form, so `Theme.App`
//! declared in markup and `Theme_App` used from code are the same resource.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::detect::Reference;
use crate::error::PruneError;
use crate::resource::{field_name, DeclaredResource, ResourceType};

/// Name patterns and type filters applied before reference matching
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    patterns: Vec<Regex>,
    target_types: BTreeSet<ResourceType>,
    exclude_types: BTreeSet<ResourceType>,
}

impl ExclusionRules {
    /// Compile `patterns` as whole-name matches
    pub fn new(
        patterns: &[String],
        target_types: BTreeSet<ResourceType>,
        exclude_types: BTreeSet<ResourceType>,
    ) -> Result<Self, PruneError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(&format!("^(?:{})$", p)).map_err(|source| PruneError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            target_types,
            exclude_types,
        })
    }

    /// Original source of the first pattern matching the whole name
    pub fn excluded_by(&self, name: &str) -> Option<String> {
        self.patterns.iter().find(|re| re.is_match(name)).map(|re| {
            let src = re.as_str();
            src.strip_prefix("^(?:")
                .and_then(|s| s.strip_suffix(")$"))
                .unwrap_or(src)
                .to_string()
        })
    }

    pub fn is_excluded_type(&self, resource_type: ResourceType) -> bool {
        self.exclude_types.contains(&resource_type)
    }

    pub fn is_outside_targets(&self, resource_type: ResourceType) -> bool {
        !self.target_types.is_empty() && !self.target_types.contains(&resource_type)
    }
}

/// Why a resource survives classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum KeepReason {
    ExcludedType,
    OutsideTargetTypes,
    ExcludedName(String),
    Referenced,
    ReferencedByName,
}

impl fmt::Display for KeepReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepReason::ExcludedType => write!(f, "resource type is excluded"),
            KeepReason::OutsideTargetTypes => write!(f, "resource type is not targeted"),
            KeepReason::ExcludedName(pattern) => write!(f, "name matches '{}'", pattern),
            KeepReason::Referenced => write!(f, "referenced"),
            KeepReason::ReferencedByName => write!(f, "name referenced as another type"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KeptResource {
    pub resource: DeclaredResource,
    pub reason: KeepReason,
}

/// Outcome of [`classify`]; every input resource appears in exactly one list
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    pub to_remove: Vec<DeclaredResource>,
    pub to_keep: Vec<KeptResource>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_keep.is_empty()
    }
}

/// References grouped by field name
struct ReferenceIndex {
    by_name: HashMap<String, HashSet<ResourceType>>,
}

impl ReferenceIndex {
    fn build(references: &HashSet<Reference>) -> Self {
        let mut by_name: HashMap<String, HashSet<ResourceType>> = HashMap::new();
        for r in references {
            by_name
                .entry(field_name(&r.name))
                .or_default()
                .insert(r.resource_type);
        }
        Self { by_name }
    }

    fn has(&self, name: &str, resource_type: ResourceType) -> bool {
        self.by_name
            .get(name)
            .is_some_and(|types| types.contains(&resource_type))
    }

    fn has_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

struct Candidate<'a> {
    resource: &'a DeclaredResource,
    field: String,
}

type Rule = fn(&Candidate, &ReferenceIndex, &ExclusionRules) -> Option<KeepReason>;

/// Ordered keep rules; a resource no rule keeps is removed
const RULES: &[Rule] = &[
    |c, _, rules| {
        rules
            .is_excluded_type(c.resource.resource_type)
            .then_some(KeepReason::ExcludedType)
    },
    |c, _, rules| {
        rules
            .is_outside_targets(c.resource.resource_type)
            .then_some(KeepReason::OutsideTargetTypes)
    },
    |c, _, rules| rules.excluded_by(&c.resource.name).map(KeepReason::ExcludedName),
    |c, index, _| {
        index
            .has(&c.field, c.resource.resource_type)
            .then_some(KeepReason::Referenced)
    },
    // Any type with the same name keeps the resource
    |c, index, _| index.has_name(&c.field).then_some(KeepReason::ReferencedByName),
];

/// Split `declared` into resources to remove and resources to keep
pub fn classify(
    declared: &[DeclaredResource],
    references: &HashSet<Reference>,
    rules: &ExclusionRules,
) -> Classification {
    let index = ReferenceIndex::build(references);
    let mut classification = Classification::default();

    for resource in declared {
        let candidate = Candidate {
            resource,
            field: resource.field_name(),
        };

        match RULES.iter().find_map(|rule| rule(&candidate, &index, rules)) {
            Some(reason) => classification.to_keep.push(KeptResource {
                resource: resource.clone(),
                reason,
            }),
            None => classification.to_remove.push(resource.clone()),
        }
    }

    classification
}
