//! Error handling for hdfs-config
//!
//! This module defines the error types produced while turning application
//! settings into a filesystem client configuration. It provides:
//! - `HdfsConfigError` marker trait for consistent error handling
//! - Specific error types for settings, resource files and the derivation itself
//! - Integration with `thiserror` for ergonomic error handling
//!
//! # Design Principles
//! - All errors implement Send + Sync so derivations can run on any thread
//! - Use thiserror for library errors, anyhow for the binary
//! - Every error is fatal: configuration derivation runs once at startup

use thiserror::Error;

/// Boxed error returned by extension initializers
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Base trait for all hdfs-config errors
///
/// This trait ensures all errors are:
/// - Thread-safe (Send + Sync)
/// - Static lifetime (no borrowed data)
/// - Implement standard Error trait
pub trait HdfsConfigError: std::error::Error + Send + Sync + 'static {}

/// Settings-related errors
///
/// These errors occur while loading, parsing or validating the high-level
/// settings that drive the derivation.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration file cannot be read
    #[error("Cannot read configuration file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: BoxError,
    },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Environment variable error
    #[error("Environment variable error for {var}: {details}")]
    EnvironmentError { var: String, details: String },
}

impl HdfsConfigError for ConfigurationError {}

/// Resource file errors
///
/// Raised while reading the base resource files. Any of these aborts the
/// derivation before a sink is touched.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Resource file does not exist
    #[error("Resource file not found: {path}")]
    NotFound { path: String },

    /// Resource file exists but cannot be read
    #[error("Cannot read resource file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Resource file is malformed
    #[error("Malformed resource file {path}{}: {details}", line_suffix(.line))]
    Parse {
        path: String,
        line: Option<usize>,
        details: String,
    },
}

impl HdfsConfigError for ResourceError {}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

/// Errors surfaced by the configuration initializer
#[derive(Error, Debug)]
pub enum DerivationError {
    /// Settings were rejected
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A base resource file could not be loaded
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// An extension initializer failed; the sink is left partially populated
    #[error("Configuration initializer {name} failed: {source}")]
    Initializer {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl HdfsConfigError for DerivationError {}

/// Result type alias for derivation operations
pub type DerivationResult<T> = Result<T, DerivationError>;

impl ConfigurationError {
    /// Create an invalid value error
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl ResourceError {
    /// Path of the resource that failed to load
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path } | Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}
