//! # Configuration Types
//!
//! Application-level settings that drive the filesystem client configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::compression::CompressionCodec;
use crate::error::{ConfigurationError, HdfsConfigError};
use crate::snapshot::SettingsSnapshot;
use crate::units::{DataSize, HostAndPort};

/// HDFS client settings as written in the settings file
///
/// Durations use humantime syntax (`500ms`, `10s`, `30m`), sizes use data
/// size syntax (`100MB`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdfsSettings {
    /// SOCKS proxy for metastore and namenode RPC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socks_proxy: Option<HostAndPort>,

    /// Interval between IPC pings on idle connections
    #[serde(with = "humantime_serde")]
    pub ipc_ping_interval: Duration,

    /// DFS client socket read timeout
    #[serde(with = "humantime_serde")]
    pub dfs_timeout: Duration,

    /// IPC connect timeout
    #[serde(with = "humantime_serde")]
    pub dfs_connect_timeout: Duration,

    /// IPC connect retries before giving up
    pub dfs_connect_max_retries: u32,

    /// How long the key provider cache keeps entries
    #[serde(with = "humantime_serde")]
    pub dfs_key_provider_cache_ttl: Duration,

    /// UNIX domain socket shared with the local datanode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_socket_path: Option<String>,

    /// Resource files merged into every derived configuration, lowest
    /// precedence first
    pub resource_config_files: Vec<PathBuf>,

    /// Codec for files written through the client
    pub compression_codec: CompressionCodec,

    /// Maximum number of cached filesystem instances
    pub file_system_max_cache_size: u32,

    /// Encrypt RPC and block data transfer
    pub wire_encryption_enabled: bool,

    /// Longest line accepted by the text line reader
    pub text_max_line_length: DataSize,
}

impl Default for HdfsSettings {
    fn default() -> Self {
        Self {
            socks_proxy: None,
            ipc_ping_interval: Duration::from_secs(10),
            dfs_timeout: Duration::from_secs(60),
            dfs_connect_timeout: Duration::from_millis(500),
            dfs_connect_max_retries: 5,
            dfs_key_provider_cache_ttl: Duration::from_secs(30 * 60),
            domain_socket_path: None,
            resource_config_files: Vec::new(),
            compression_codec: CompressionCodec::Gzip,
            file_system_max_cache_size: 1000,
            wire_encryption_enabled: false,
            text_max_line_length: DataSize::from_megabytes(100),
        }
    }
}

impl HdfsSettings {
    /// Validate and freeze these settings
    pub fn snapshot(&self) -> Result<SettingsSnapshot, ConfigurationError> {
        SettingsSnapshot::try_from(self)
    }
}

/// Common configuration validation trait
pub trait ConfigValidation {
    type Error: HdfsConfigError;

    /// Validate the configuration
    fn validate(&self) -> Result<(), Self::Error>;

    /// Get configuration warnings (non-fatal issues)
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

impl ConfigValidation for HdfsSettings {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        self.snapshot().map(|_| ())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self
            .domain_socket_path
            .as_deref()
            .is_some_and(|path| path.trim().is_empty())
        {
            warnings.push(
                "domain_socket_path is blank; short-circuit reads stay disabled".to_string(),
            );
        }

        if self.dfs_connect_max_retries == 0 {
            warnings.push(
                "dfs_connect_max_retries is 0; connections are never retried".to_string(),
            );
        }

        if self.dfs_timeout.subsec_nanos() % 1_000_000 != 0 {
            warnings.push(format!(
                "dfs_timeout {:?} has sub-millisecond precision that will be truncated",
                self.dfs_timeout
            ));
        }

        warnings
    }
}
