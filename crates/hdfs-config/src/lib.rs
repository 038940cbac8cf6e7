//! # HDFS Client Configuration
//!
//! Derives the low-level Hadoop filesystem client configuration from a
//! small set of validated application settings.
//!
//! ## Key Features
//! - Layered settings loading (defaults, TOML file, `HDFS_*` environment)
//! - Resource files in properties, TOML or JSON format merged as a base
//! - Timeouts, retries, SOCKS proxy, short-circuit reads and wire encryption
//! - Output compression applied consistently across file formats
//! - No-op topology resolver in place of DNS based rack lookups
//! - Extension initializers that run after the built-in rules
//!
//! ## Example
//! ```no_run
//! use hdfs_config::{ConfigLoader, HdfsConfigurationInitializer, HdfsSettings};
//!
//! let settings = HdfsSettings::load(None)?;
//! let initializer = HdfsConfigurationInitializer::new(&settings)?;
//! let config = initializer.new_configuration()?;
//! println!("{}", config.to_properties_string());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compression;
pub mod config;
pub mod error;
pub mod initializer;
pub mod keys;
pub mod resources;
pub mod sink;
pub mod snapshot;
pub mod topology;
pub mod units;

// Re-export commonly used types at the crate root for convenience
pub use compression::{configure_compression, CompressionCodec};
pub use config::*;
pub use error::*;
pub use initializer::{initialize, ConfigurationInitializer, HdfsConfigurationInitializer};
pub use resources::read_configuration;
pub use sink::Configuration;
pub use snapshot::SettingsSnapshot;
pub use topology::{switch_mapping_for, NoOpSwitchMapping, SwitchMapping};
pub use units::{DataSize, HostAndPort};

/// Version of the hdfs-config crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
