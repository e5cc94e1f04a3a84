//! Core data models for test_organizer
//!
//! This module contains the fundamental data structures passed between the
//! scanner, the resolver, the categorizer and the emitter.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroUsize;

/// A test source path relative to the scan root, with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceFile(String);

impl SourceFile {
    /// Create a SourceFile from an already-normalized relative path
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The relative path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component
    pub fn file_name(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }

    /// Final path component without its extension.
    ///
    /// A leading dot is part of the name, so `.cpp` has no extension.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    /// Whether the path lies under the given top-level directory
    pub fn is_under(&self, dir: &str) -> bool {
        self.0
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceFile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The five fixed top-level classifications.
///
/// Declaration order is the manifest's category key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseCategory {
    /// Core library tests (`fl_` names)
    Fl,
    /// Effects framework tests
    Fx,
    /// Noise generator tests
    Noise,
    /// Platform-specific tests
    Platform,
    /// Everything else
    Core,
}

impl BaseCategory {
    /// All base categories in key order
    pub const ALL: [BaseCategory; 5] = [
        BaseCategory::Fl,
        BaseCategory::Fx,
        BaseCategory::Noise,
        BaseCategory::Platform,
        BaseCategory::Core,
    ];

    /// Category name as emitted in the manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseCategory::Fl => "fl_tests",
            BaseCategory::Fx => "fx_tests",
            BaseCategory::Noise => "noise_tests",
            BaseCategory::Platform => "platform_tests",
            BaseCategory::Core => "core_tests",
        }
    }

    /// Parse a base category name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for BaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A final category: a base category, optionally split into a numbered bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category {
    /// Base classification
    pub base: BaseCategory,
    /// Bucket number in `1..=bucket_count`, when the base was subdivided
    pub bucket: Option<NonZeroUsize>,
}

impl Category {
    /// An unsubdivided category
    pub fn base(base: BaseCategory) -> Self {
        Self { base, bucket: None }
    }

    /// A numbered sub-bucket of a base category
    pub fn bucketed(base: BaseCategory, bucket: NonZeroUsize) -> Self {
        Self {
            base,
            bucket: Some(bucket),
        }
    }

    /// Parse `<base>` or `<base>_<N>`
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(base) = BaseCategory::parse(s) {
            return Some(Self::base(base));
        }
        let (base, n) = s.rsplit_once('_')?;
        let base = BaseCategory::parse(base)?;
        // only the canonical rendering: digits, no leading zero
        if n.starts_with('0') || !n.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let bucket = n.parse::<NonZeroUsize>().ok()?;
        Some(Self::bucketed(base, bucket))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bucket {
            Some(n) => write!(f, "{}_{}", self.base, n),
            None => f.write_str(self.base.as_str()),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One manifest entry.
///
/// `name` is unique across a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    /// Logical test name
    pub name: String,
    /// Source path relative to the scan root
    pub path: SourceFile,
    /// Final category (post-subdivision)
    pub category: Category,
}

/// Output format for the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `TEST:<name>:<path>:<category>` lines (default)
    #[default]
    Lines,
    /// JSON array of records
    Json,
}
