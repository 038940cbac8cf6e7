//! # Configuration Loader
//!
//! Figment-based settings loading with layered support:
//! 1. Compiled defaults
//! 2. Settings file (TOML)
//! 3. Environment variable overrides
//!
//! Supports automatic environment variable mapping with prefixes.

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default settings file name
pub const DEFAULT_CONFIG_FILE: &str = "hdfs-config.toml";

/// Environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "HDFS";

/// Environment variable naming the settings file
pub const CONFIG_PATH_ENV: &str = "HDFS_CONFIG_PATH";

/// Load configuration from specific file
///
/// # Arguments
/// * `path` - Path to settings file
///
/// # Returns
/// * Configuration loaded from file with environment overrides
pub fn load_from_file<T>(path: &Path) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + Serialize,
{
    let options = LoadOptions {
        config_path: Some(path.to_path_buf()),
        env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        require_file: true,
    };
    load_config_with_options::<T>(options)
}

/// Configuration loading options
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Optional path to settings file
    pub config_path: Option<PathBuf>,
    /// Environment variable prefix
    pub env_prefix: String,
    /// Whether the settings file is required
    pub require_file: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            require_file: false,
        }
    }
}

/// Load configuration with custom options
pub fn load_config_with_options<T>(options: LoadOptions) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + Serialize,
{
    debug!("Loading configuration with options: {:?}", options);

    // Start with compiled defaults
    let mut figment = Figment::new().merge(Serialized::defaults(T::default()));

    let config_path = determine_config_path(options.config_path)?;

    if let Some(path) = &config_path {
        if path.exists() {
            info!("Loading configuration from file: {}", path.display());
            figment = add_file_provider(figment, path)?;
        } else if options.require_file {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        } else {
            warn!(
                "Configuration file not found: {} (using defaults)",
                path.display()
            );
        }
    }

    debug!(
        "Loading environment variables with prefix: {}",
        options.env_prefix
    );
    figment = figment.merge(env_provider(&options.env_prefix));

    let config: T = figment
        .extract()
        .map_err(|err| ConfigurationError::ParseError {
            details: format!("Failed to parse configuration: {err}"),
        })?;

    debug!(
        "Configuration loaded from {} sources",
        figment.metadata().count()
    );

    Ok(config)
}

/// Apply environment variable overrides to existing configuration
///
/// # Arguments
/// * `config` - Mutable reference to configuration
/// * `prefix` - Environment variable prefix (e.g., "HDFS")
pub fn apply_env_overrides<T>(config: &mut T, prefix: &str) -> Result<(), ConfigurationError>
where
    T: DeserializeOwned + Serialize,
{
    debug!(
        "Applying environment variable overrides with prefix: {}",
        prefix
    );

    let figment = Figment::new()
        .merge(Serialized::defaults(&*config))
        .merge(env_provider(prefix));

    *config = figment
        .extract()
        .map_err(|err| ConfigurationError::ParseError {
            details: format!("Failed to apply environment overrides: {err}"),
        })?;

    Ok(())
}

fn env_provider(prefix: &str) -> Env {
    Env::prefixed(&format!("{prefix}_"))
        .split("__") // Use double underscore for nested fields
        .ignore(&["CONFIG_PATH"])
}

/// Determine settings file path with fallback logic
fn determine_config_path(
    override_path: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigurationError> {
    if let Some(path) = override_path {
        return Ok(Some(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        debug!("Using config path from environment: {}", path.display());
        return Ok(Some(path));
    }

    let current_dir_config = std::env::current_dir()
        .map_err(|e| ConfigurationError::EnvironmentError {
            var: "current_dir".to_string(),
            details: e.to_string(),
        })?
        .join(DEFAULT_CONFIG_FILE);

    if current_dir_config.exists() {
        debug!(
            "Found config file in current directory: {}",
            current_dir_config.display()
        );
        return Ok(Some(current_dir_config));
    }

    let config_locations = [
        "/etc/hdfs-config/config.toml",
        "~/.config/hdfs-config/config.toml",
    ];

    for location in &config_locations {
        let path = expand_path(location)?;
        if path.exists() {
            debug!("Found config file at: {}", path.display());
            return Ok(Some(path));
        }
    }

    debug!("No configuration file found, using defaults");
    Ok(None)
}

/// Add file provider to figment based on file extension
fn add_file_provider(figment: Figment, path: &Path) -> Result<Figment, ConfigurationError> {
    validate_config_file(path)?;
    Ok(figment.merge(Toml::file(path)))
}

/// Expand a leading tilde to `$HOME`
fn expand_path(path: &str) -> Result<PathBuf, ConfigurationError> {
    let expanded = if path.starts_with('~') {
        let home = std::env::var("HOME").map_err(|_| ConfigurationError::EnvironmentError {
            var: "HOME".to_string(),
            details: "HOME environment variable not set".to_string(),
        })?;
        path.replacen('~', &home, 1)
    } else {
        path.to_string()
    };

    Ok(PathBuf::from(expanded))
}

/// Validate settings file format
pub fn validate_config_file(path: &Path) -> Result<(), ConfigurationError> {
    if !path.exists() {
        return Err(ConfigurationError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    if !extension.eq_ignore_ascii_case("toml") {
        return Err(ConfigurationError::ParseError {
            details: format!(
                "Unsupported configuration file format: {extension} (supported: toml)"
            ),
        });
    }

    std::fs::read_to_string(path).map_err(|err| ConfigurationError::ReadError {
        path: path.display().to_string(),
        source: Box::new(err),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompressionCodec;
    use crate::config::HdfsSettings;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::Builder;

    const ENV_VARS: [&str; 5] = [
        "HDFS_DFS_TIMEOUT",
        "HDFS_SOCKS_PROXY",
        "HDFS_COMPRESSION_CODEC",
        "HDFS_WIRE_ENCRYPTION_ENABLED",
        "HDFS_CONFIG_PATH",
    ];

    /// Restores the HDFS_* variables touched by a test when dropped
    struct EnvGuard(Vec<(&'static str, Option<String>)>);

    impl EnvGuard {
        fn clear() -> Self {
            let saved = ENV_VARS
                .iter()
                .map(|name| (*name, env::var(name).ok()))
                .collect();
            for name in ENV_VARS {
                env::remove_var(name);
            }
            Self(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (name, value) in &self.0 {
                match value {
                    Some(value) => env::set_var(name, value),
                    None => env::remove_var(name),
                }
            }
        }
    }

    fn settings_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_from_toml_file() {
        let _guard = EnvGuard::clear();

        let file = settings_file(
            r#"
            dfs_timeout = "15s"
            compression_codec = "zstd"
            socks_proxy = "socks.internal:1080"
            resource_config_files = ["/etc/hadoop/core-site.properties"]
            "#,
        );

        let settings: HdfsSettings = load_from_file(file.path()).unwrap();
        assert_eq!(settings.dfs_timeout, Duration::from_secs(15));
        assert_eq!(settings.compression_codec, CompressionCodec::Zstd);
        assert_eq!(
            settings.socks_proxy.map(|proxy| proxy.to_string()).as_deref(),
            Some("socks.internal:1080")
        );
        assert_eq!(settings.resource_config_files.len(), 1);
        assert_eq!(settings.ipc_ping_interval, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let _guard = EnvGuard::clear();
        env::set_var("HDFS_DFS_TIMEOUT", "2s");
        env::set_var("HDFS_WIRE_ENCRYPTION_ENABLED", "true");

        let file = settings_file("dfs_timeout = \"15s\"\n");
        let settings: HdfsSettings = load_from_file(file.path()).unwrap();

        assert_eq!(settings.dfs_timeout, Duration::from_secs(2));
        assert!(settings.wire_encryption_enabled);
    }

    #[test]
    #[serial]
    fn test_apply_env_overrides_keeps_current_values() {
        let _guard = EnvGuard::clear();
        env::set_var("HDFS_COMPRESSION_CODEC", "snappy");

        let mut settings = HdfsSettings {
            dfs_connect_max_retries: 9,
            ..Default::default()
        };
        apply_env_overrides(&mut settings, DEFAULT_ENV_PREFIX).unwrap();

        assert_eq!(settings.compression_codec, CompressionCodec::Snappy);
        assert_eq!(settings.dfs_connect_max_retries, 9);
    }

    #[test]
    #[serial]
    fn test_env_bracketed_ipv6_proxy() {
        let _guard = EnvGuard::clear();
        env::set_var("HDFS_SOCKS_PROXY", "[::1]");

        let file = settings_file("");
        let settings: HdfsSettings = load_from_file(file.path()).unwrap();
        let proxy = settings.socks_proxy.unwrap();

        assert_eq!(proxy.host(), "::1");
        assert_eq!(proxy.port(), None);
    }

    #[test]
    #[serial]
    fn test_required_file_missing() {
        let _guard = EnvGuard::clear();
        let file = settings_file("");
        let missing = file.path().with_file_name("no-such-settings.toml");

        let err = load_from_file::<HdfsSettings>(&missing).unwrap_err();
        assert!(matches!(err, ConfigurationError::FileNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_invalid_value_is_parse_error() {
        let _guard = EnvGuard::clear();
        let file = settings_file("compression_codec = \"brotli\"\n");

        let err = load_from_file::<HdfsSettings>(file.path()).unwrap_err();
        assert!(matches!(err, ConfigurationError::ParseError { .. }));
    }

    #[test]
    fn test_unreadable_settings_file() {
        let dir = Builder::new().suffix(".toml").tempdir().unwrap();

        assert!(matches!(
            validate_config_file(dir.path()),
            Err(ConfigurationError::ReadError { .. })
        ));
    }

    #[test]
    fn test_validate_config_file_rejects_other_formats() {
        let file = Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            validate_config_file(file.path()),
            Err(ConfigurationError::ParseError { .. })
        ));
    }
}
