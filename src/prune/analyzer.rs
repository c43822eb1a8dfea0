use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

use super::executor::{PruneReport, Pruner};
use super::rules::{classify, Classification, ExclusionRules};
use crate::collect::{Collector, DeclarationCollector};
use crate::config::Config;
use crate::detect::{Reference, ReferenceScanner};
use crate::error::PruneError;

/// Upper bound on prune passes in cascading mode
pub const MAX_CASCADE_ITERATIONS: usize = 5;

/// One collect, detect and classify pass
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub declared_count: usize,
    pub reference_count: usize,
    pub classification: Classification,
}

/// Result of [`ResourceAnalyzer::prune`]
#[derive(Debug, Clone, Serialize)]
pub struct PruneOutcome {
    pub report: PruneReport,
    /// Analysis passes performed, including a final pass that found nothing
    pub iterations: usize,
}

/// Drives collection, detection, classification and removal over a project
pub struct ResourceAnalyzer {
    resource_dirs: Vec<PathBuf>,
    source_dirs: Vec<PathBuf>,
    collector: DeclarationCollector,
    scanner: ReferenceScanner,
    rules: ExclusionRules,
    cascade: bool,
    pruner: Pruner,
}

impl ResourceAnalyzer {
    pub fn new(resource_dirs: Vec<PathBuf>, source_dirs: Vec<PathBuf>) -> Self {
        Self {
            resource_dirs,
            source_dirs,
            collector: DeclarationCollector::new(),
            scanner: ReferenceScanner::default(),
            rules: ExclusionRules::default(),
            cascade: false,
            pruner: Pruner::default(),
        }
    }

    /// Analyzer for the roots, rules and detector settings of `config`
    pub fn from_config(config: &Config) -> miette::Result<Self> {
        Ok(Self::new(config.resource_dirs.clone(), config.source_dirs.clone())
            .with_rules(config.exclusion_rules()?)
            .with_scanner(ReferenceScanner::from_config(config))
            .with_cascade(config.cascade))
    }

    pub fn with_rules(mut self, rules: ExclusionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_scanner(mut self, scanner: ReferenceScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_cascade(mut self, cascade: bool) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn with_undo_script(mut self, path: Option<PathBuf>) -> Self {
        self.pruner = Pruner::new(path);
        self
    }

    fn references(&self) -> HashSet<Reference> {
        self.scanner.detect(&self.source_dirs, &self.resource_dirs)
    }

    /// Classify the project as it is on disk without changing anything
    pub fn analyze(&self) -> Analysis {
        let declared = self.collector.collect(&self.resource_dirs);
        let references = self.references();
        let classification = classify(&declared, &references, &self.rules);

        info!(
            "{} declared resources, {} references, {} unused",
            declared.len(),
            references.len(),
            classification.to_remove.len()
        );

        Analysis {
            declared_count: declared.len(),
            reference_count: references.len(),
            classification,
        }
    }

    /// Remove unused resources. In cascading mode the analysis is repeated
    /// after each pass, since removing a layout can orphan the drawables it
    /// used, until a pass finds nothing or [`MAX_CASCADE_ITERATIONS`] is hit.
    pub fn prune(&mut self) -> Result<PruneOutcome, PruneError> {
        let max_passes = if self.cascade { MAX_CASCADE_ITERATIONS } else { 1 };
        let mut report = PruneReport::default();
        let mut iterations = 0;

        for pass in 1..=max_passes {
            iterations = pass;
            let analysis = self.analyze();

            if analysis.classification.to_remove.is_empty() {
                debug!("Pass {} found nothing to remove", pass);
                report.kept = analysis.classification.to_keep;
                break;
            }

            let pass_report = self.pruner.execute(&analysis.classification)?;
            let removed = pass_report.removed.len();
            report.merge(pass_report);
            info!("Pass {} removed {} resources", pass, removed);

            if removed == 0 {
                break;
            }
        }

        Ok(PruneOutcome { report, iterations })
    }
}
