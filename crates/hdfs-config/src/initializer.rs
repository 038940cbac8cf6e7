//! # Configuration Initializer
//!
//! Builds the configuration handed to the filesystem client:
//! 1. Copy the base resource properties
//! 2. Install the no-op topology resolver
//! 3. Route RPC through the SOCKS proxy, if one is configured
//! 4. Enable short-circuit reads when a domain socket path is available
//! 5. Write timeouts, retries, cache sizes and line limits
//! 6. Turn on wire encryption, if requested
//! 7. Apply output compression
//! 8. Run the extension initializers, in order
//!
//! Every step except the last is total over validated settings.

use std::sync::Arc;
use tracing::{debug, info};

use crate::compression::configure_compression;
use crate::config::HdfsSettings;
use crate::error::{BoxError, DerivationError, DerivationResult};
use crate::keys;
use crate::resources::read_configuration;
use crate::sink::Configuration;
use crate::snapshot::SettingsSnapshot;
use crate::topology::NoOpSwitchMapping;

/// Extension point that further adjusts a derived configuration
///
/// Implementations run after the built-in rules and may read or overwrite
/// any key. Closures of the form `Fn(&mut Configuration) -> Result<(), BoxError>`
/// implement this trait.
pub trait ConfigurationInitializer: Send + Sync {
    /// Mutate `config`
    fn initialize_configuration(&self, config: &mut Configuration) -> Result<(), BoxError>;

    /// Name used in logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> ConfigurationInitializer for F
where
    F: Fn(&mut Configuration) -> Result<(), BoxError> + Send + Sync,
{
    fn initialize_configuration(&self, config: &mut Configuration) -> Result<(), BoxError> {
        self(config)
    }
}

/// Derives filesystem client configurations from one set of settings
///
/// Resource files are read once, at construction. The instance is immutable
/// afterwards and can serve concurrent derivations, each into its own sink.
#[derive(Clone)]
pub struct HdfsConfigurationInitializer {
    settings: SettingsSnapshot,
    resources: Arc<Configuration>,
    initializers: Vec<Arc<dyn ConfigurationInitializer>>,
}

impl HdfsConfigurationInitializer {
    /// Create an initializer without extensions
    pub fn new(settings: &HdfsSettings) -> DerivationResult<Self> {
        Self::with_initializers(settings, Vec::new())
    }

    /// Create an initializer running `initializers` after the built-in rules
    ///
    /// # Errors
    /// * `DerivationError::Configuration` - settings out of range
    /// * `DerivationError::Resource` - a resource file is missing or malformed
    pub fn with_initializers(
        settings: &HdfsSettings,
        initializers: Vec<Arc<dyn ConfigurationInitializer>>,
    ) -> DerivationResult<Self> {
        let snapshot = settings.snapshot()?;
        let resources = read_configuration(&settings.resource_config_files)?;

        info!(
            resources = settings.resource_config_files.len(),
            initializers = initializers.len(),
            codec = %snapshot.compression_codec(),
            "HDFS configuration initializer ready"
        );

        Ok(Self::from_parts(snapshot, Arc::new(resources), initializers))
    }

    /// Assemble an initializer from already validated parts
    pub fn from_parts(
        settings: SettingsSnapshot,
        resources: Arc<Configuration>,
        initializers: Vec<Arc<dyn ConfigurationInitializer>>,
    ) -> Self {
        Self {
            settings,
            resources,
            initializers,
        }
    }

    pub fn settings(&self) -> &SettingsSnapshot {
        &self.settings
    }

    /// Merged base resource properties
    pub fn resources(&self) -> &Configuration {
        &self.resources
    }

    /// Derive the client configuration into `config`
    ///
    /// If an extension initializer fails, `config` keeps every write made
    /// before the failure.
    pub fn initialize_configuration(&self, config: &mut Configuration) -> DerivationResult<()> {
        initialize(config, &self.resources, &self.settings, &self.initializers)
    }

    /// Derive the client configuration into a fresh, empty sink
    pub fn new_configuration(&self) -> DerivationResult<Configuration> {
        let mut config = Configuration::new();
        self.initialize_configuration(&mut config)?;
        Ok(config)
    }
}

impl std::fmt::Debug for HdfsConfigurationInitializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdfsConfigurationInitializer")
            .field("settings", &self.settings)
            .field("resources", &self.resources.len())
            .field(
                "initializers",
                &self
                    .initializers
                    .iter()
                    .map(|initializer| initializer.name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Derive the client configuration into `sink`
///
/// # Arguments
/// * `sink` - Configuration being built; may already hold values
/// * `base` - Merged resource properties, copied in first
/// * `settings` - Validated settings
/// * `initializers` - Extensions, run in slice order after the built-in rules
pub fn initialize(
    sink: &mut Configuration,
    base: &Configuration,
    settings: &SettingsSnapshot,
    initializers: &[Arc<dyn ConfigurationInitializer>],
) -> DerivationResult<()> {
    sink.copy_from(base);

    // reverse DNS lookups to decide rack locality are too slow and unreliable
    sink.set_class(
        keys::NET_TOPOLOGY_NODE_SWITCH_MAPPING_IMPL,
        NoOpSwitchMapping::CLASS_NAME,
    );

    if let Some(proxy) = settings.socks_proxy() {
        sink.set_class(
            keys::HADOOP_RPC_SOCKET_FACTORY_CLASS_DEFAULT,
            keys::SOCKS_SOCKET_FACTORY_CLASS,
        );
        sink.set(keys::HADOOP_SOCKS_SERVER, proxy.to_string());
        debug!(proxy = %proxy, "Routing RPC through SOCKS proxy");
    }

    if let Some(path) = settings.domain_socket_path() {
        sink.set_strings(keys::DFS_DOMAIN_SOCKET_PATH, [path]);
    }

    // short-circuit reads only work with a usable domain socket path,
    // whether it came from the settings or a resource file
    let has_domain_socket = !sink
        .get_or(keys::DFS_DOMAIN_SOCKET_PATH, "")
        .trim()
        .is_empty();
    if has_domain_socket && sink.set_bool_if_unset(keys::DFS_CLIENT_READ_SHORTCIRCUIT, true) {
        debug!("Enabled short-circuit reads");
    }

    sink.set_int(keys::DFS_CLIENT_SOCKET_TIMEOUT, settings.dfs_timeout_ms());
    sink.set_int(keys::IPC_PING_INTERVAL, settings.ipc_ping_interval_ms());
    sink.set_int(
        keys::IPC_CLIENT_CONNECT_TIMEOUT,
        settings.dfs_connect_timeout_ms(),
    );
    sink.set_int(
        keys::IPC_CLIENT_CONNECT_MAX_RETRIES,
        settings.dfs_connect_max_retries(),
    );

    if settings.wire_encryption_enabled() {
        sink.set(keys::HADOOP_RPC_PROTECTION, keys::RPC_PROTECTION_PRIVACY);
        sink.set_bool(keys::DFS_ENCRYPT_DATA_TRANSFER, true);
        debug!("Enabled wire encryption");
    }

    sink.set_int(
        keys::FS_CACHE_MAX_SIZE,
        settings.file_system_max_cache_size(),
    );
    sink.set_int(
        keys::DFS_CLIENT_KEY_PROVIDER_CACHE_EXPIRY_MS,
        settings.dfs_key_provider_cache_ttl_ms(),
    );
    sink.set_int(
        keys::LINE_RECORD_READER_MAX_LINE_LENGTH,
        settings.text_max_line_length(),
    );

    configure_compression(sink, settings.compression_codec());

    for initializer in initializers {
        debug!(initializer = initializer.name(), "Running configuration initializer");
        initializer
            .initialize_configuration(sink)
            .map_err(|source| DerivationError::Initializer {
                name: initializer.name().to_string(),
                source,
            })?;
    }

    Ok(())
}
