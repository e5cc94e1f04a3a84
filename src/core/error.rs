//! Error types for test_organizer
//!
//! This module provides structured error handling using thiserror.
//! Every variant is fatal: the engine never emits a partial manifest.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for organizer operations
pub type Result<T> = std::result::Result<T, OrganizerError>;

/// Errors that can occur while building a test manifest
#[derive(Error, Debug)]
pub enum OrganizerError {
    /// IO error while reading configuration or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Filesystem error during the directory walk
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Scan root does not exist
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Scan root exists but is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Malformed JSON configuration file
    #[error("Invalid config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A discovered path has no UTF-8 representation
    #[error("Path is not valid UTF-8: {path}")]
    NonUtf8Path { path: PathBuf },

    /// Two distinct source files resolve to the same test name
    #[error("Test name collision: '{name}' is produced by both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<OrganizerError>,
    },
}

impl OrganizerError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        OrganizerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        OrganizerError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error stems from the invocation or its configuration
    /// rather than from the scanned tree.
    pub fn is_config_error(&self) -> bool {
        match self {
            OrganizerError::DirectoryNotFound { .. }
            | OrganizerError::NotADirectory { .. }
            | OrganizerError::InvalidConfig { .. }
            | OrganizerError::ConfigFile { .. } => true,
            OrganizerError::WithContext { source, .. } => source.is_config_error(),
            _ => false,
        }
    }
}
