//! test_organizer - deterministic test source organization
//!
//! Discovers unit-test sources under a root directory, gives each a unique
//! logical name, classifies it into a category and splits oversized
//! categories into stable numbered buckets. The result is a line-oriented
//! manifest that a build system groups into compilation units.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic, no CLI concerns
//! - **bin/test_organizer.rs**: Thin wrapper that calls the library
//!
//! # Example
//!
//! ```no_run
//! use test_organizer::{build_manifest, OrganizerConfig};
//! use std::path::Path;
//!
//! let manifest = build_manifest(Path::new("tests"), &OrganizerConfig::default())?;
//! for record in manifest.records() {
//!     println!("{} -> {}", record.name, record.category);
//! }
//! # Ok::<(), test_organizer::OrganizerError>(())
//! ```

pub mod core;

use std::path::Path;

pub use crate::core::{
    bucket_for, resolve_name, BaseCategory, BucketBalancer, Category, CategoryIndex, Categorizer,
    FileWalker, Manifest, ManifestEngine, ManifestLine, OrganizerConfig, OrganizerError,
    OutputFormat, Result, SourceFile, TestRecord,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the manifest for `root` with the default walker
pub fn build_manifest(root: &Path, config: &OrganizerConfig) -> Result<Manifest> {
    ManifestEngine::with_config(config.clone()).build(root)
}

/// Build and serialize the manifest for `root` in `config.format`
pub fn render_manifest(root: &Path, config: &OrganizerConfig) -> Result<String> {
    ManifestEngine::with_config(config.clone()).render(root)
}
