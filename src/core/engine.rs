//! Manifest engine
//!
//! Runs the single-pass pipeline: scan → name → categorize → balance → emit.
//! The engine holds no state between builds.
//!
//! Records are emitted grouped by base category in fixed key order (fl, fx,
//! noise, platform, core). Within a base category, scanner order is kept, and
//! bucket subdivision never moves a record.

use crate::core::balancer::BucketBalancer;
use crate::core::categorizer::{CategoryIndex, Categorizer};
use crate::core::config::OrganizerConfig;
use crate::core::error::Result;
use crate::core::models::{Category, OutputFormat, TestRecord};
use crate::core::naming::resolve_unique;
use crate::core::serialization::{get_serializer, Serializer};
use crate::core::walker::{DefaultWalker, FileWalker, ScanConfig};
use std::path::Path;

/// A finalized manifest: records with final categories, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    records: Vec<TestRecord>,
}

impl Manifest {
    /// Records in manifest order
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// Take ownership of the records
    pub fn into_records(self) -> Vec<TestRecord> {
        self.records
    }

    /// Records grouped by final category
    pub fn index(&self) -> CategoryIndex<'_> {
        CategoryIndex::from_records(&self.records)
    }

    /// `(category, count)` in fixed category order
    pub fn summary(&self) -> Vec<(Category, usize)> {
        self.index().summary()
    }

    /// Number of tests
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no tests were found
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds test manifests
pub struct ManifestEngine {
    /// Engine configuration
    config: OrganizerConfig,
    /// Source discovery implementation
    walker: Box<dyn FileWalker>,
    /// Output serializer
    serializer: Box<dyn Serializer>,
}

impl ManifestEngine {
    /// Create a new ManifestEngine with default configuration
    pub fn new() -> Self {
        Self::with_config(OrganizerConfig::default())
    }

    /// Create a new ManifestEngine with custom configuration
    pub fn with_config(config: OrganizerConfig) -> Self {
        let serializer = get_serializer(config.format);
        Self {
            config,
            walker: Box::new(DefaultWalker::new()),
            serializer,
        }
    }

    /// Builder: set a custom file walker
    pub fn with_walker(mut self, walker: impl FileWalker + 'static) -> Self {
        self.walker = Box::new(walker);
        self
    }

    /// Builder: set output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self.serializer = get_serializer(format);
        self
    }

    /// Get the current configuration
    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Build the manifest for `root`.
    ///
    /// Configuration is validated before the tree is touched.
    pub fn build(&self, root: &Path) -> Result<Manifest> {
        self.config.validate()?;
        let balancer = BucketBalancer::from_config(&self.config)?;

        let files = self.walker.scan(root, &ScanConfig::from(&self.config))?;
        tracing::info!(root = %root.display(), files = files.len(), "scan complete");

        let named = resolve_unique(&files)?;
        let categorizer = Categorizer::new(self.config.platform_keywords.iter().cloned());
        let mut records = categorizer.classify(named);
        // stable: scanner order survives within each base category
        records.sort_by_key(|record| record.category.base);
        let records = balancer.balance(records);

        let manifest = Manifest { records };
        for (category, count) in manifest.summary() {
            tracing::info!(%category, count, "category");
        }
        Ok(manifest)
    }

    /// Build and serialize the manifest for `root`
    pub fn render(&self, root: &Path) -> Result<String> {
        let manifest = self.build(root)?;
        self.serializer.serialize_records(manifest.records())
    }
}

impl Default for ManifestEngine {
    fn default() -> Self {
        Self::new()
    }
}
