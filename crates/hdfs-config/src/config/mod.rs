//! # Settings Configuration
//!
//! High-level settings for the HDFS client and the layered loader that
//! reads them from defaults, a TOML file and `HDFS_*` environment variables.

pub mod loader;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use loader::*;
pub use traits::*;
pub use types::*;
