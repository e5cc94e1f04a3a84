//! Bucket balancing for oversized categories.
//!
//! A category with more members than the split threshold is divided into
//! `bucket_count` numbered sub-categories. A test's bucket depends only on the
//! bytes of its name: the MD5 digest read as a big-endian 128-bit integer,
//! modulo the bucket count, plus one. Adding or removing other tests never
//! moves an existing test to a different bucket.

use crate::core::categorizer::CategoryIndex;
use crate::core::config::{OrganizerConfig, DEFAULT_BUCKET_COUNT, DEFAULT_SPLIT_THRESHOLD};
use crate::core::error::Result;
use crate::core::models::{BaseCategory, Category, TestRecord};
use std::num::NonZeroUsize;

/// Bucket number in `1..=bucket_count` for a test name
pub fn bucket_for(name: &str, bucket_count: NonZeroUsize) -> NonZeroUsize {
    let digest = md5::compute(name.as_bytes());
    let value = u128::from_be_bytes(digest.0);
    let index = (value % bucket_count.get() as u128) as usize;
    // index < bucket_count, so index + 1 cannot be zero
    NonZeroUsize::MIN.saturating_add(index)
}

/// Splits categories that exceed a member threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketBalancer {
    threshold: usize,
    bucket_count: NonZeroUsize,
}

impl Default for BucketBalancer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SPLIT_THRESHOLD,
            bucket_count: NonZeroUsize::new(DEFAULT_BUCKET_COUNT).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl BucketBalancer {
    /// Create a balancer
    pub fn new(threshold: usize, bucket_count: NonZeroUsize) -> Self {
        Self {
            threshold,
            bucket_count,
        }
    }

    /// Create a balancer from validated configuration
    pub fn from_config(config: &OrganizerConfig) -> Result<Self> {
        Ok(Self::new(config.split_threshold, config.bucket_count()?))
    }

    /// Split threshold
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Buckets per split category
    pub fn bucket_count(&self) -> NonZeroUsize {
        self.bucket_count
    }

    /// Base categories whose membership exceeds the threshold
    pub fn oversized(&self, records: &[TestRecord]) -> Vec<BaseCategory> {
        let index = CategoryIndex::from_records(records);
        BaseCategory::ALL
            .into_iter()
            .filter(|base| index.base_len(*base) > self.threshold)
            .collect()
    }

    /// Assign final categories. Order of records is unchanged.
    pub fn balance(&self, records: Vec<TestRecord>) -> Vec<TestRecord> {
        let oversized = self.oversized(&records);
        for base in &oversized {
            tracing::info!(
                category = %base,
                buckets = self.bucket_count.get(),
                threshold = self.threshold,
                "splitting oversized category"
            );
        }

        records
            .into_iter()
            .map(|record| {
                let base = record.category.base;
                if !oversized.contains(&base) {
                    return record;
                }
                let bucket = bucket_for(&record.name, self.bucket_count);
                TestRecord {
                    category: Category::bucketed(base, bucket),
                    ..record
                }
            })
            .collect()
    }
}
