//! Test source discovery
//!
//! This module provides the FileWalker trait and the default walkdir-backed
//! scanner. Discovery applies two rules:
//!
//! - (a) every file anywhere under the root whose name matches the test
//!   pattern (`test_*.cpp` by default), minus excluded names
//! - (b) every direct `*.cpp` child of each configured include directory
//!
//! Rule (a) matches come first (sorted), then rule (b) matches per directory
//! (sorted within each directory, directories in configured order). Duplicates
//! are dropped, first occurrence wins. Walk errors are never skipped.

use crate::core::config::OrganizerConfig;
use crate::core::error::{OrganizerError, Result};
use crate::core::models::SourceFile;
use globset::{GlobBuilder, GlobMatcher};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

#[cfg(test)]
use mockall::automock;

/// Extension of sources picked up from include directories
const SOURCE_EXTENSION: &str = "cpp";

/// Normalize path separators for cross-platform compatibility.
/// - Converts Windows backslashes to forward slashes
/// - Strips Windows UNC prefix `\\?\` if present
pub fn normalize_path_separators(path: &str) -> String {
    let trimmed = path
        .strip_prefix(r"\\?\")
        .or_else(|| path.strip_prefix(r"\\.\"))
        .unwrap_or(path);

    trimmed.replace('\\', "/")
}

/// Trait for test source discovery
///
/// This trait allows for mocking in tests and alternative implementations
/// (e.g., a file list produced by a VCS query).
#[cfg_attr(test, automock)]
pub trait FileWalker: Send + Sync {
    /// Discover test sources under `root`, in manifest order
    fn scan(&self, root: &Path, config: &ScanConfig) -> Result<Vec<SourceFile>>;
}

/// Configuration for discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// File-name glob for rule (a)
    pub test_pattern: String,
    /// File names skipped by rule (a)
    pub exclude: BTreeSet<String>,
    /// Directories scanned by rule (b), in order
    pub include_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig::from(&OrganizerConfig::default())
    }
}

impl From<&OrganizerConfig> for ScanConfig {
    fn from(config: &OrganizerConfig) -> Self {
        Self {
            test_pattern: config.test_pattern.clone(),
            exclude: config.exclude.iter().cloned().collect(),
            include_dirs: config.include_dirs.clone(),
        }
    }
}

impl ScanConfig {
    fn test_matcher(&self) -> Result<GlobMatcher> {
        GlobBuilder::new(&self.test_pattern)
            .literal_separator(true)
            .build()
            .map(|glob| glob.compile_matcher())
            .map_err(|e| {
                OrganizerError::invalid_config(format!(
                    "invalid test pattern '{}': {}",
                    self.test_pattern, e
                ))
            })
    }
}

/// Default walker implementation backed by walkdir
pub struct DefaultWalker;

impl DefaultWalker {
    /// Create a new DefaultWalker
    pub fn new() -> Self {
        Self
    }

    /// Fail unless `root` is an existing directory
    fn check_root(root: &Path) -> Result<()> {
        if !root.exists() {
            return Err(OrganizerError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(OrganizerError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Regular files, including symlinks that resolve to one
    fn is_file(entry: &DirEntry) -> bool {
        let ft = entry.file_type();
        ft.is_file() || (ft.is_symlink() && entry.path().is_file())
    }

    /// Path of `entry` relative to `root`, `/`-separated
    fn relative(entry: &DirEntry, root: &Path) -> Result<SourceFile> {
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative = relative.to_str().ok_or_else(|| OrganizerError::NonUtf8Path {
            path: path.to_path_buf(),
        })?;
        Ok(SourceFile::new(normalize_path_separators(relative)))
    }

    /// Rule (a): pattern matches anywhere under the root
    fn scan_pattern(&self, root: &Path, config: &ScanConfig) -> Result<Vec<SourceFile>> {
        let matcher = config.test_matcher()?;
        let entries = WalkDir::new(root).follow_links(false);
        Self::collect_matches(root, entries, &matcher, &config.exclude)
    }

    /// Filter walk entries through the test pattern. The first walk error aborts.
    ///
    /// Names are matched lossily, so a non-UTF-8 file that cannot be a test
    /// is skipped. A matching one fails in `relative`.
    fn collect_matches<I>(
        root: &Path,
        entries: I,
        matcher: &GlobMatcher,
        exclude: &BTreeSet<String>,
    ) -> Result<Vec<SourceFile>>
    where
        I: IntoIterator<Item = walkdir::Result<DirEntry>>,
    {
        let mut found = Vec::new();

        for entry in entries {
            let entry = entry?;
            if !Self::is_file(&entry) {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !matcher.is_match(name.as_ref()) || exclude.contains(name.as_ref()) {
                continue;
            }

            let file = Self::relative(&entry, root)?;
            tracing::debug!(path = %file, "matched test pattern");
            found.push(file);
        }

        found.sort();
        Ok(found)
    }

    /// Rule (b): direct `*.cpp` children of one include directory
    fn scan_include_dir(&self, root: &Path, dir: &str) -> Result<Vec<SourceFile>> {
        let dir_path = root.join(dir);
        if !dir_path.is_dir() {
            tracing::warn!(dir, "include directory not found under root, skipping");
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&dir_path).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !Self::is_file(&entry) {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
                continue;
            }

            let file = Self::relative(&entry, root)?;
            tracing::debug!(path = %file, dir, "included from directory");
            found.push(file);
        }

        found.sort();
        Ok(found)
    }
}

impl Default for DefaultWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWalker for DefaultWalker {
    fn scan(&self, root: &Path, config: &ScanConfig) -> Result<Vec<SourceFile>> {
        Self::check_root(root)?;

        let mut ordered = self.scan_pattern(root, config)?;
        for dir in &config.include_dirs {
            ordered.extend(self.scan_include_dir(root, dir)?);
        }

        Ok(dedup_preserving_order(ordered))
    }
}

/// Drop repeated paths, keeping the first occurrence
pub fn dedup_preserving_order(files: Vec<SourceFile>) -> Vec<SourceFile> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|f| seen.insert(f.clone()))
        .collect()
}
