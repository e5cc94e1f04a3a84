//! Test categorization
//!
//! Each test is assigned exactly one base category by ordered rules; the first
//! matching rule wins:
//!
//! 1. name starts with `fl_` → `fl_tests`
//! 2. name starts with `fx_` or contains `fx` anywhere → `fx_tests`
//! 3. path is under `noise/` → `noise_tests`
//! 4. name contains a platform keyword → `platform_tests`
//! 5. otherwise → `core_tests`
//!
//! Rule 2 is a deliberately loose substring match and overmatches: a test
//! named `test_suffix` lands in `fx_tests`. Narrowing it changes the grouping
//! of existing tests, so it stays as is until the intended scope is decided.

use crate::core::models::{BaseCategory, Category, SourceFile, TestRecord};
use std::collections::BTreeMap;

/// Assigns base categories using a configurable platform keyword list
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    platform_keywords: Vec<String>,
}

impl Categorizer {
    /// Create a categorizer with the given platform keywords
    pub fn new<I, S>(platform_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            platform_keywords: platform_keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// Base category for one test
    pub fn categorize(&self, name: &str, path: &SourceFile) -> BaseCategory {
        if name.starts_with("fl_") {
            BaseCategory::Fl
        } else if name.starts_with("fx_") || name.contains("fx") {
            BaseCategory::Fx
        } else if path.is_under("noise") {
            BaseCategory::Noise
        } else if self.is_platform(name) {
            BaseCategory::Platform
        } else {
            BaseCategory::Core
        }
    }

    fn is_platform(&self, name: &str) -> bool {
        self.platform_keywords.iter().any(|k| name.contains(k.as_str()))
    }

    /// Annotate named sources with their base category, preserving order
    pub fn classify(&self, named: Vec<(String, SourceFile)>) -> Vec<TestRecord> {
        named
            .into_iter()
            .map(|(name, path)| {
                let base = self.categorize(&name, &path);
                tracing::debug!(%name, %path, category = %base, "categorized");
                TestRecord {
                    name,
                    path,
                    category: Category::base(base),
                }
            })
            .collect()
    }
}

/// Records grouped by category.
///
/// Keys iterate in fixed order (fl, fx, noise, platform, core; buckets in
/// ascending number after their unsplit base). Records keep insertion order
/// within a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex<'a> {
    groups: BTreeMap<Category, Vec<&'a TestRecord>>,
}

impl<'a> CategoryIndex<'a> {
    /// Group records by their current category
    pub fn from_records(records: &'a [TestRecord]) -> Self {
        let mut groups: BTreeMap<Category, Vec<&'a TestRecord>> = BTreeMap::new();
        for record in records {
            groups.entry(record.category).or_default().push(record);
        }
        Self { groups }
    }

    /// Records in one category
    pub fn get(&self, category: &Category) -> &[&'a TestRecord] {
        self.groups.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of records whose category derives from `base`
    pub fn base_len(&self, base: BaseCategory) -> usize {
        self.groups
            .iter()
            .filter(|(category, _)| category.base == base)
            .map(|(_, records)| records.len())
            .sum()
    }

    /// Iterate categories and their records in key order
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &[&'a TestRecord])> {
        self.groups.iter().map(|(c, r)| (c, r.as_slice()))
    }

    /// `(category, member count)` in key order, non-empty categories only
    pub fn summary(&self) -> Vec<(Category, usize)> {
        self.groups.iter().map(|(c, r)| (*c, r.len())).collect()
    }

    /// Total records indexed
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether no records are indexed
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_PLATFORM_KEYWORDS;
    use std::num::NonZeroUsize;

    fn categorizer() -> Categorizer {
        Categorizer::new(DEFAULT_PLATFORM_KEYWORDS.iter().copied())
    }

    fn cat(name: &str, path: &str) -> BaseCategory {
        categorizer().categorize(name, &SourceFile::new(path))
    }

    #[test]
    fn test_fl_prefix_rule() {
        assert_eq!(cat("fl_algorithm", "fl/algorithm.cpp"), BaseCategory::Fl);
    }

    #[test]
    fn test_fx_prefix_rule() {
        assert_eq!(cat("fx_c", "fx/c.cpp"), BaseCategory::Fx);
    }

    #[test]
    fn test_fx_substring_overmatches() {
        assert_eq!(cat("test_suffix", "test_suffix.cpp"), BaseCategory::Fx);
        assert_eq!(cat("test_videofx", "test_videofx.cpp"), BaseCategory::Fx);
    }

    #[test]
    fn test_fl_wins_over_fx_substring() {
        assert_eq!(cat("fl_fx_bridge", "fl/fx_bridge.cpp"), BaseCategory::Fl);
    }

    #[test]
    fn test_fx_substring_wins_over_noise_path() {
        assert_eq!(cat("test_noisefx", "noise/test_noisefx.cpp"), BaseCategory::Fx);
    }

    #[test]
    fn test_noise_path_rule() {
        assert_eq!(cat("test_d", "noise/test_d.cpp"), BaseCategory::Noise);
        assert_eq!(cat("test_noise", "test_noise.cpp"), BaseCategory::Core);
    }

    #[test]
    fn test_noise_path_wins_over_platform_keyword() {
        assert_eq!(cat("test_esp32_noise", "noise/test_esp32_noise.cpp"), BaseCategory::Noise);
    }

    #[test]
    fn test_platform_keyword_rule() {
        assert_eq!(cat("test_esp32_i2s", "platforms/test_esp32_i2s.cpp"), BaseCategory::Platform);
        assert_eq!(cat("test_stub_led", "test_stub_led.cpp"), BaseCategory::Platform);
    }

    #[test]
    fn test_keywords_are_configurable() {
        let custom = Categorizer::new(["quirk"]);
        let path = SourceFile::new("test_quirk.cpp");
        assert_eq!(custom.categorize("test_quirk", &path), BaseCategory::Platform);
        let path = SourceFile::new("test_esp32.cpp");
        assert_eq!(custom.categorize("test_esp32", &path), BaseCategory::Core);
    }

    #[test]
    fn test_core_fallback() {
        assert_eq!(cat("test_bitset", "test_bitset.cpp"), BaseCategory::Core);
        assert_eq!(cat("test_str", "ftl/test_str.cpp"), BaseCategory::Core);
    }

    #[test]
    fn test_classify_preserves_order() {
        let named = vec![
            ("test_z".to_string(), SourceFile::new("test_z.cpp")),
            ("fl_a".to_string(), SourceFile::new("fl/a.cpp")),
        ];
        let records = categorizer().classify(named);
        assert_eq!(records[0].name, "test_z");
        assert_eq!(records[0].category, Category::base(BaseCategory::Core));
        assert_eq!(records[1].category, Category::base(BaseCategory::Fl));
    }

    fn record(name: &str, category: Category) -> TestRecord {
        TestRecord {
            name: name.to_string(),
            path: SourceFile::new(format!("{name}.cpp")),
            category,
        }
    }

    #[test]
    fn test_index_key_order_and_insertion_order() {
        let one = NonZeroUsize::new(1).unwrap();
        let two = NonZeroUsize::new(2).unwrap();
        let records = vec![
            record("c1", Category::base(BaseCategory::Core)),
            record("f1", Category::base(BaseCategory::Fl)),
            record("p2", Category::bucketed(BaseCategory::Platform, two)),
            record("c2", Category::base(BaseCategory::Core)),
            record("p1", Category::bucketed(BaseCategory::Platform, one)),
        ];
        let index = CategoryIndex::from_records(&records);

        let keys: Vec<String> = index.iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(
            keys,
            vec!["fl_tests", "platform_tests_1", "platform_tests_2", "core_tests"]
        );

        let core: Vec<&str> = index
            .get(&Category::base(BaseCategory::Core))
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(core, vec!["c1", "c2"]);

        assert_eq!(index.base_len(BaseCategory::Platform), 2);
        assert_eq!(index.base_len(BaseCategory::Noise), 0);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_index_summary() {
        let records = vec![
            record("a", Category::base(BaseCategory::Fx)),
            record("b", Category::base(BaseCategory::Fx)),
            record("c", Category::base(BaseCategory::Noise)),
        ];
        let summary = CategoryIndex::from_records(&records).summary();
        assert_eq!(
            summary,
            vec![
                (Category::base(BaseCategory::Fx), 2),
                (Category::base(BaseCategory::Noise), 1)
            ]
        );
    }

    #[test]
    fn test_empty_index() {
        let index = CategoryIndex::from_records(&[]);
        assert!(index.is_empty());
        assert!(index.get(&Category::base(BaseCategory::Core)).is_empty());
    }
}
