//! Core module for test_organizer
//!
//! # Architecture
//!
//! - `models`: Core data structures (SourceFile, TestRecord, Category)
//! - `config`: OrganizerConfig loading and validation
//! - `error`: Error types using thiserror
//! - `walker`: Test source discovery with FileWalker trait + DefaultWalker
//! - `naming`: Logical test names and collision detection
//! - `categorizer`: Ordered category rules and CategoryIndex
//! - `balancer`: Deterministic bucket splitting of oversized categories
//! - `serialization`: Manifest serializers
//! - `engine`: ManifestEngine orchestration

pub mod models;
pub mod config;
pub mod error;
pub mod walker;
pub mod naming;
pub mod categorizer;
pub mod balancer;
pub mod serialization;
pub mod engine;

// Re-export commonly used types
pub use models::{SourceFile, TestRecord, BaseCategory, Category, OutputFormat};
pub use config::OrganizerConfig;
pub use error::{OrganizerError, Result};
pub use walker::{FileWalker, DefaultWalker, ScanConfig};
pub use naming::{resolve_name, resolve_unique};
pub use categorizer::{Categorizer, CategoryIndex};
pub use balancer::{BucketBalancer, bucket_for};
pub use serialization::{Serializer, LineSerializer, JsonSerializer, ManifestLine, get_serializer};
pub use engine::{ManifestEngine, Manifest};
