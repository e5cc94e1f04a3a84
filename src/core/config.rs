//! Organizer configuration
//!
//! Loaded from `.test_organizer.json` (or an explicit `--config` file) and
//! overridden by CLI flags. Unlike best-effort tooling, a malformed or
//! invalid configuration is fatal.

use crate::core::error::{OrganizerError, Result};
use crate::core::models::OutputFormat;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

/// Config file looked up in the scan root when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = ".test_organizer.json";

/// Categories with more members than this are split into buckets
pub const DEFAULT_SPLIT_THRESHOLD: usize = 40;

/// Default number of buckets per split category
pub const DEFAULT_BUCKET_COUNT: usize = 4;

/// File-name glob selecting test sources anywhere under the root
pub const DEFAULT_TEST_PATTERN: &str = "test_*.cpp";

/// Subdirectories whose direct `*.cpp` children are always included
pub const DEFAULT_INCLUDE_DIRS: &[&str] = &["fl", "fx", "ftl"];

/// Substrings marking a test as platform-specific
pub const DEFAULT_PLATFORM_KEYWORDS: &[&str] = &[
    "platform", "esp32", "stm32", "teensy", "rp2040", "avr", "wasm", "stub",
];

/// Configuration for one manifest build
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizerConfig {
    /// File-name glob for test sources
    pub test_pattern: String,
    /// File names skipped by the `test_*.cpp` rule
    pub exclude: Vec<String>,
    /// Subdirectories whose direct `*.cpp` children are always included
    pub include_dirs: Vec<String>,
    /// Platform keyword substrings
    pub platform_keywords: Vec<String>,
    /// Member count above which a category is split
    pub split_threshold: usize,
    /// Number of buckets per split category
    pub bucket_count: usize,
    /// Manifest output format
    pub format: OutputFormat,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            test_pattern: DEFAULT_TEST_PATTERN.to_string(),
            exclude: Vec::new(),
            include_dirs: DEFAULT_INCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            platform_keywords: DEFAULT_PLATFORM_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            bucket_count: DEFAULT_BUCKET_COUNT,
            format: OutputFormat::Lines,
        }
    }
}

impl OrganizerConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the test file glob
    pub fn with_test_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.test_pattern = pattern.into();
        self
    }

    /// Builder: set excluded file names
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set always-included subdirectories
    pub fn with_include_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set platform keywords
    pub fn with_platform_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platform_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set split threshold
    pub fn with_split_threshold(mut self, threshold: usize) -> Self {
        self.split_threshold = threshold;
        self
    }

    /// Builder: set bucket count
    pub fn with_bucket_count(mut self, count: usize) -> Self {
        self.bucket_count = count;
        self
    }

    /// Builder: set output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Load from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| OrganizerError::from(e).with_context(format!("reading {}", path.display())))?;
        Self::from_json(&content).map_err(|source| OrganizerError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `<root>/.test_organizer.json` if it exists, defaults otherwise
    pub fn discover(root: &Path) -> Result<Self> {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config file");
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Bucket count as a validated non-zero value
    pub fn bucket_count(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.bucket_count)
            .ok_or_else(|| OrganizerError::invalid_config("bucket_count must be at least 1"))
    }

    /// Check invariants that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        self.bucket_count()?;

        if self.test_pattern.is_empty() || self.test_pattern.contains('/') {
            return Err(OrganizerError::invalid_config(format!(
                "test pattern '{}' must be a non-empty file-name glob",
                self.test_pattern
            )));
        }

        if let Some(dir) = self
            .include_dirs
            .iter()
            .find(|d| d.is_empty() || d.starts_with('/') || d.split('/').any(|c| c == ".."))
        {
            return Err(OrganizerError::invalid_config(format!(
                "include directory '{}' must be a non-empty relative path inside the root",
                dir
            )));
        }

        if self.platform_keywords.iter().any(|k| k.is_empty()) {
            return Err(OrganizerError::invalid_config(
                "platform keywords must not be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = OrganizerConfig::default();
        assert_eq!(config.split_threshold, 40);
        assert_eq!(config.test_pattern, "test_*.cpp");
        assert_eq!(config.include_dirs, vec!["fl", "fx", "ftl"]);
        assert!(config.exclude.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let config = OrganizerConfig::new().with_bucket_count(0);
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("bucket_count"));
    }

    #[test]
    fn test_bad_include_dirs_rejected() {
        for dir in ["", "/abs", "../outside", "fl/../.."] {
            let config = OrganizerConfig::new().with_include_dirs([dir]);
            assert!(config.validate().is_err(), "accepted {:?}", dir);
        }
        let nested = OrganizerConfig::new().with_include_dirs(["fl/detail"]);
        assert!(nested.validate().is_ok());
    }

    #[test]
    fn test_path_pattern_rejected() {
        let config = OrganizerConfig::new().with_test_pattern("unit/test_*.cpp");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let config = OrganizerConfig::new().with_platform_keywords(["esp32", ""]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = OrganizerConfig::from_json(r#"{"bucket_count": 8, "format": "json"}"#).unwrap();
        assert_eq!(config.bucket_count, 8);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.split_threshold, DEFAULT_SPLIT_THRESHOLD);
    }

    #[test]
    fn test_json_unknown_field_rejected() {
        assert!(OrganizerConfig::from_json(r#"{"buckets": 8}"#).is_err());
    }

    #[test]
    fn test_discover_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = OrganizerConfig::discover(tmp.path()).unwrap();
        assert_eq!(config, OrganizerConfig::default());
    }

    #[test]
    fn test_discover_malformed_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        let err = OrganizerConfig::discover(tmp.path()).unwrap_err();
        assert!(matches!(err, OrganizerError::ConfigFile { .. }));
    }

    #[test]
    fn test_from_file_reads_exclusions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cfg.json");
        fs::write(&path, r#"{"exclude": ["test_slow.cpp"]}"#).unwrap();
        let config = OrganizerConfig::from_file(&path).unwrap();
        assert_eq!(config.exclude, vec!["test_slow.cpp"]);
    }
}
