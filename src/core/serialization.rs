//! Manifest serializers
//!
//! - Lines (default): one `TEST:<name>:<path>:<category>` line per record,
//!   no header, no blank lines
//! - JSON: an array of `{name, path, category}` objects
//!
//! Records are written in the order given; serializers never reorder.
//! Fields are not escaped: names and paths must not contain `:`.

use crate::core::error::Result;
use crate::core::models::{Category, OutputFormat, SourceFile, TestRecord};

/// Tag starting every manifest line
pub const LINE_TAG: &str = "TEST";

/// Field delimiter of the line format
pub const DELIMITER: char = ':';

/// Trait for manifest serializers
pub trait Serializer: Send + Sync {
    /// Serialize the full manifest
    fn serialize_records(&self, records: &[TestRecord]) -> Result<String>;
}

/// Line-oriented serializer (default)
pub struct LineSerializer;

impl LineSerializer {
    /// Create a new LineSerializer
    pub fn new() -> Self {
        Self
    }

    /// Format one record, without trailing newline
    pub fn format_line(record: &TestRecord) -> String {
        debug_assert!(
            !record.path.as_str().contains(DELIMITER),
            "path contains delimiter: {}",
            record.path
        );
        format!(
            "{tag}{d}{name}{d}{path}{d}{category}",
            tag = LINE_TAG,
            d = DELIMITER,
            name = record.name,
            path = record.path,
            category = record.category,
        )
    }
}

impl Default for LineSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for LineSerializer {
    fn serialize_records(&self, records: &[TestRecord]) -> Result<String> {
        let mut output = String::new();
        for record in records {
            output.push_str(&Self::format_line(record));
            output.push('\n');
        }
        Ok(output)
    }
}

/// JSON array serializer
pub struct JsonSerializer;

impl JsonSerializer {
    /// Create a new JsonSerializer
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for JsonSerializer {
    fn serialize_records(&self, records: &[TestRecord]) -> Result<String> {
        let mut output = serde_json::to_string_pretty(records)?;
        output.push('\n');
        Ok(output)
    }
}

/// Get the serializer for an output format
pub fn get_serializer(format: OutputFormat) -> Box<dyn Serializer> {
    match format {
        OutputFormat::Lines => Box::new(LineSerializer::new()),
        OutputFormat::Json => Box::new(JsonSerializer::new()),
    }
}

/// One parsed manifest line, as a downstream build system reads it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLine {
    /// Logical test name
    pub name: String,
    /// Source path relative to the scan root
    pub path: SourceFile,
    /// Final category, bucket suffix included
    pub category: Category,
}

impl ManifestLine {
    /// Parse a `TEST:<name>:<path>:<category>` line.
    ///
    /// Returns `None` for anything else, including unknown categories.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.trim_end_matches(['\r', '\n']).split(DELIMITER);
        if fields.next()? != LINE_TAG {
            return None;
        }
        let name = fields.next()?;
        let path = fields.next()?;
        let category = Category::parse(fields.next()?)?;
        if fields.next().is_some() || name.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            path: SourceFile::new(path),
            category,
        })
    }
}

impl From<ManifestLine> for TestRecord {
    fn from(line: ManifestLine) -> Self {
        TestRecord {
            name: line.name,
            path: line.path,
            category: line.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::BaseCategory;
    use std::num::NonZeroUsize;

    fn record(name: &str, path: &str, category: Category) -> TestRecord {
        TestRecord {
            name: name.to_string(),
            path: SourceFile::new(path),
            category,
        }
    }

    #[test]
    fn test_format_line() {
        let r = record("fl_a", "fl/a.cpp", Category::base(BaseCategory::Fl));
        assert_eq!(LineSerializer::format_line(&r), "TEST:fl_a:fl/a.cpp:fl_tests");
    }

    #[test]
    fn test_format_line_bucketed() {
        let two = NonZeroUsize::new(2).unwrap();
        let r = record("test_x", "test_x.cpp", Category::bucketed(BaseCategory::Core, two));
        assert_eq!(LineSerializer::format_line(&r), "TEST:test_x:test_x.cpp:core_tests_2");
    }

    #[test]
    fn test_lines_no_header_or_blank_lines() {
        let records = vec![
            record("fl_a", "fl/a.cpp", Category::base(BaseCategory::Fl)),
            record("test_d", "noise/test_d.cpp", Category::base(BaseCategory::Noise)),
        ];
        let out = LineSerializer::new().serialize_records(&records).unwrap();
        assert_eq!(
            out,
            "TEST:fl_a:fl/a.cpp:fl_tests\nTEST:test_d:noise/test_d.cpp:noise_tests\n"
        );
    }

    #[test]
    fn test_empty_manifest_is_empty() {
        assert_eq!(LineSerializer::new().serialize_records(&[]).unwrap(), "");
    }

    #[test]
    fn test_json_serializer() {
        let records = vec![record("fx_c", "fx/c.cpp", Category::base(BaseCategory::Fx))];
        let out = JsonSerializer::new().serialize_records(&records).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "fx_c");
        assert_eq!(value[0]["path"], "fx/c.cpp");
        assert_eq!(value[0]["category"], "fx_tests");
    }

    #[test]
    fn test_get_serializer_by_format() {
        let records = vec![record("fl_a", "fl/a.cpp", Category::base(BaseCategory::Fl))];
        let lines = get_serializer(OutputFormat::Lines)
            .serialize_records(&records)
            .unwrap();
        assert_eq!(lines, "TEST:fl_a:fl/a.cpp:fl_tests\n");
        let json = get_serializer(OutputFormat::Json)
            .serialize_records(&records)
            .unwrap();
        assert!(json.trim_start().starts_with('['));
    }

    #[test]
    fn test_parse_line() {
        let line = ManifestLine::parse("TEST:test_d:noise/test_d.cpp:noise_tests\n").unwrap();
        assert_eq!(line.name, "test_d");
        assert_eq!(line.path, SourceFile::new("noise/test_d.cpp"));
        assert_eq!(line.category, Category::base(BaseCategory::Noise));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ManifestLine::parse("").is_none());
        assert!(ManifestLine::parse("TEST:a:b").is_none());
        assert!(ManifestLine::parse("SKIP:a:a.cpp:core_tests").is_none());
        assert!(ManifestLine::parse("TEST:a:a.cpp:core_tests:extra").is_none());
        assert!(ManifestLine::parse("TEST:a:a.cpp:misc_tests").is_none());
        assert!(ManifestLine::parse("TEST::a.cpp:core_tests").is_none());
    }

    #[test]
    fn test_parse_rejects_padded_bucket() {
        assert!(ManifestLine::parse("TEST:a:a.cpp:core_tests_01").is_none());
        assert!(ManifestLine::parse("TEST:a:a.cpp:core_tests_1").is_some());
    }

    #[test]
    fn test_parse_format_agree() {
        let three = NonZeroUsize::new(3).unwrap();
        let r = record("fl_x", "fl/x.cpp", Category::bucketed(BaseCategory::Fl, three));
        let parsed = ManifestLine::parse(&LineSerializer::format_line(&r)).unwrap();
        assert_eq!(TestRecord::from(parsed), r);
    }
}
