//! SearchDeadRes - Unused resource detection and pruning for Android projects
//!
//! Finds resources (drawables, layouts, strings, styles, ...) that nothing in
//! the project uses and removes them from disk.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **Collection** - Enumerate declared resources under the `res` roots
//! 2. **Masking** - Blank comments and literals in Kotlin/Java sources
//! 3. **Detection** - Find references in code and markup
//! 4. **Classification** - Decide what to remove and why the rest is kept
//! 5. **Pruning** - Delete files and excise elements, optionally cascading
//! 6. **Reporting** - Output results in terminal or JSON form

pub mod collect;
pub mod config;
pub mod detect;
pub mod discovery;
pub mod error;
pub mod prune;
pub mod report;
pub mod resource;
pub mod tokenizer;

pub use collect::{Collector, DeclarationCollector};
pub use config::Config;
pub use detect::{DetectorKind, Reference, ReferenceDetector, ReferenceScanner};
pub use discovery::{FileFinder, ProjectLayout};
pub use error::PruneError;
pub use prune::{
    classify, Classification, ExclusionRules, KeepReason, PruneOutcome, PruneReport, Pruner,
    RemovalReason, RemovedResource, ResourceAnalyzer,
};
pub use report::{ReportFormat, Reporter, RunKind};
pub use resource::{DeclaredResource, Location, ResourceType};
