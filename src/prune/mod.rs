//! Classification and removal of unused resources

mod analyzer;
mod executor;
mod rules;
mod undo;

pub use analyzer::{Analysis, PruneOutcome, ResourceAnalyzer, MAX_CASCADE_ITERATIONS};
pub use executor::{is_emptied, PruneFailure, PruneReport, Pruner, RemovalReason, RemovedResource};
pub use rules::{classify, Classification, ExclusionRules, KeepReason, KeptResource};
pub use undo::UndoScript;
