//! # Settings Snapshot
//!
//! Validated, immutable view of [`HdfsSettings`] in the units the client
//! configuration expects: durations as whole milliseconds and sizes as
//! bytes, all within `i32` range.

use std::time::Duration;

use crate::compression::CompressionCodec;
use crate::config::HdfsSettings;
use crate::error::ConfigurationError;
use crate::units::HostAndPort;

/// Validated client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSnapshot {
    socks_proxy: Option<HostAndPort>,
    ipc_ping_interval_ms: i32,
    dfs_timeout_ms: i32,
    dfs_connect_timeout_ms: i32,
    dfs_connect_max_retries: i32,
    dfs_key_provider_cache_ttl_ms: i32,
    domain_socket_path: Option<String>,
    compression_codec: CompressionCodec,
    file_system_max_cache_size: i32,
    wire_encryption_enabled: bool,
    text_max_line_length: i32,
}

impl TryFrom<&HdfsSettings> for SettingsSnapshot {
    type Error = ConfigurationError;

    fn try_from(settings: &HdfsSettings) -> Result<Self, Self::Error> {
        let dfs_timeout_ms = millis("dfs_timeout", settings.dfs_timeout)?;
        if dfs_timeout_ms < 1 {
            return Err(ConfigurationError::invalid_value(
                "dfs_timeout",
                format!("{:?}", settings.dfs_timeout),
                "dfsTimeout must be at least 1 ms",
            ));
        }

        let text_max_line_length = exact_i32(
            "text_max_line_length",
            settings.text_max_line_length.bytes(),
        )?;
        if text_max_line_length < 1 {
            return Err(ConfigurationError::invalid_value(
                "text_max_line_length",
                settings.text_max_line_length,
                "textMaxLineLength must be at least 1 byte",
            ));
        }

        Ok(Self {
            socks_proxy: settings.socks_proxy.clone(),
            ipc_ping_interval_ms: millis("ipc_ping_interval", settings.ipc_ping_interval)?,
            dfs_timeout_ms,
            dfs_connect_timeout_ms: millis("dfs_connect_timeout", settings.dfs_connect_timeout)?,
            dfs_connect_max_retries: exact_i32(
                "dfs_connect_max_retries",
                settings.dfs_connect_max_retries,
            )?,
            dfs_key_provider_cache_ttl_ms: millis(
                "dfs_key_provider_cache_ttl",
                settings.dfs_key_provider_cache_ttl,
            )?,
            domain_socket_path: settings.domain_socket_path.clone(),
            compression_codec: settings.compression_codec,
            file_system_max_cache_size: exact_i32(
                "file_system_max_cache_size",
                settings.file_system_max_cache_size,
            )?,
            wire_encryption_enabled: settings.wire_encryption_enabled,
            text_max_line_length,
        })
    }
}

/// Whole milliseconds in `value`, truncated
fn millis(key: &str, value: Duration) -> Result<i32, ConfigurationError> {
    i32::try_from(value.as_millis()).map_err(|_| {
        ConfigurationError::invalid_value(
            key,
            format!("{value:?}"),
            "Duration in milliseconds exceeds the 32-bit integer range",
        )
    })
}

fn exact_i32<T>(key: &str, value: T) -> Result<i32, ConfigurationError>
where
    T: TryInto<i32> + Copy + ToString,
{
    value.try_into().map_err(|_| {
        ConfigurationError::invalid_value(key, value, "Value exceeds the 32-bit integer range")
    })
}

impl SettingsSnapshot {
    pub fn socks_proxy(&self) -> Option<&HostAndPort> {
        self.socks_proxy.as_ref()
    }

    pub fn ipc_ping_interval_ms(&self) -> i32 {
        self.ipc_ping_interval_ms
    }

    pub fn dfs_timeout_ms(&self) -> i32 {
        self.dfs_timeout_ms
    }

    pub fn dfs_connect_timeout_ms(&self) -> i32 {
        self.dfs_connect_timeout_ms
    }

    pub fn dfs_connect_max_retries(&self) -> i32 {
        self.dfs_connect_max_retries
    }

    pub fn dfs_key_provider_cache_ttl_ms(&self) -> i32 {
        self.dfs_key_provider_cache_ttl_ms
    }

    pub fn domain_socket_path(&self) -> Option<&str> {
        self.domain_socket_path.as_deref()
    }

    pub fn compression_codec(&self) -> CompressionCodec {
        self.compression_codec
    }

    pub fn file_system_max_cache_size(&self) -> i32 {
        self.file_system_max_cache_size
    }

    pub fn wire_encryption_enabled(&self) -> bool {
        self.wire_encryption_enabled
    }

    /// Max text line length in bytes
    pub fn text_max_line_length(&self) -> i32 {
        self.text_max_line_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::DataSize;

    fn invalid_key(err: ConfigurationError) -> String {
        match err {
            ConfigurationError::InvalidValue { key, .. } => key,
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_snapshot() {
        let snapshot = HdfsSettings::default().snapshot().unwrap();

        assert_eq!(snapshot.ipc_ping_interval_ms(), 10_000);
        assert_eq!(snapshot.dfs_timeout_ms(), 60_000);
        assert_eq!(snapshot.dfs_connect_timeout_ms(), 500);
        assert_eq!(snapshot.dfs_connect_max_retries(), 5);
        assert_eq!(snapshot.dfs_key_provider_cache_ttl_ms(), 1_800_000);
        assert_eq!(snapshot.file_system_max_cache_size(), 1000);
        assert_eq!(snapshot.text_max_line_length(), 100 * 1024 * 1024);
        assert_eq!(snapshot.compression_codec(), CompressionCodec::Gzip);
        assert!(snapshot.socks_proxy().is_none());
        assert!(snapshot.domain_socket_path().is_none());
    }

    #[test]
    fn test_durations_truncate_to_millis() {
        let settings = HdfsSettings {
            dfs_timeout: Duration::from_micros(1999),
            ipc_ping_interval: Duration::from_micros(999),
            ..Default::default()
        };
        let snapshot = settings.snapshot().unwrap();

        assert_eq!(snapshot.dfs_timeout_ms(), 1);
        assert_eq!(snapshot.ipc_ping_interval_ms(), 0);
    }

    #[test]
    fn test_zero_socket_timeout_rejected() {
        let settings = HdfsSettings {
            dfs_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(invalid_key(settings.snapshot().unwrap_err()), "dfs_timeout");

        // sub-millisecond timeouts truncate to zero
        let settings = HdfsSettings {
            dfs_timeout: Duration::from_micros(900),
            ..Default::default()
        };
        assert_eq!(invalid_key(settings.snapshot().unwrap_err()), "dfs_timeout");
    }

    #[test]
    fn test_zero_line_length_rejected() {
        let settings = HdfsSettings {
            text_max_line_length: DataSize::from_bytes(0),
            ..Default::default()
        };
        assert_eq!(
            invalid_key(settings.snapshot().unwrap_err()),
            "text_max_line_length"
        );
    }

    #[test]
    fn test_overflow_rejected() {
        let settings = HdfsSettings {
            dfs_key_provider_cache_ttl: Duration::from_secs(30 * 24 * 3600),
            ..Default::default()
        };
        assert_eq!(
            invalid_key(settings.snapshot().unwrap_err()),
            "dfs_key_provider_cache_ttl"
        );

        let settings = HdfsSettings {
            text_max_line_length: DataSize::from_bytes(1 << 31),
            ..Default::default()
        };
        assert_eq!(
            invalid_key(settings.snapshot().unwrap_err()),
            "text_max_line_length"
        );

        let settings = HdfsSettings {
            file_system_max_cache_size: u32::MAX,
            ..Default::default()
        };
        assert_eq!(
            invalid_key(settings.snapshot().unwrap_err()),
            "file_system_max_cache_size"
        );
    }
}
