//! # Configuration Traits
//!
//! Core traits for configuration loading and management.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use super::loader::{self, LoadOptions};
use super::types::HdfsSettings;
use crate::error::ConfigurationError;

/// Configuration loader trait
///
/// Provides a standardized interface for loading configuration from various sources
/// with layered configuration support (defaults, files, environment variables).
pub trait ConfigLoader<C: DeserializeOwned + Send + Sync> {
    /// Load configuration with optional path override
    ///
    /// # Implementation Notes
    /// - Should support layered configuration (defaults -> file -> env vars)
    /// - Should apply environment variable overrides
    fn load(path_override: Option<PathBuf>) -> Result<C, ConfigurationError>;

    /// Load configuration from specific file
    fn load_from_file(path: &Path) -> Result<C, ConfigurationError>;

    /// Apply environment variable overrides to configuration
    ///
    /// # Arguments
    /// * `config` - Mutable reference to configuration
    /// * `prefix` - Environment variable prefix (e.g., "HDFS")
    fn apply_env_overrides(config: &mut C, prefix: &str) -> Result<(), ConfigurationError>;
}

impl ConfigLoader<HdfsSettings> for HdfsSettings {
    fn load(path_override: Option<PathBuf>) -> Result<HdfsSettings, ConfigurationError> {
        let require_file = path_override.is_some();
        loader::load_config_with_options(LoadOptions {
            config_path: path_override,
            require_file,
            ..LoadOptions::default()
        })
    }

    fn load_from_file(path: &Path) -> Result<HdfsSettings, ConfigurationError> {
        loader::load_from_file(path)
    }

    fn apply_env_overrides(
        config: &mut HdfsSettings,
        prefix: &str,
    ) -> Result<(), ConfigurationError> {
        loader::apply_env_overrides(config, prefix)
    }
}
