//! # Network Topology Resolution
//!
//! The filesystem client asks a switch mapping for the rack of every
//! datanode it talks to. The default implementation does reverse DNS at
//! connection time, which is slow and unreliable in most deployments, so the
//! derived configuration always installs [`NoOpSwitchMapping`] instead.

use std::sync::Arc;

use crate::keys;
use crate::sink::Configuration;

/// Resolves host names to network locations
pub trait SwitchMapping: Send + Sync {
    /// Network location for each of `names`
    ///
    /// An empty result means the mapping for the given names is unknown;
    /// it is not an error.
    fn resolve(&self, names: &[String]) -> Vec<String>;

    /// Drop every cached mapping
    fn reload_cached_mappings(&self);

    /// Drop the cached mappings for `names`
    fn reload_cached_mappings_for(&self, names: &[String]);
}

/// Switch mapping that never knows where a host lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpSwitchMapping;

impl NoOpSwitchMapping {
    /// Identifier written to `net.topology.node.switch.mapping.impl`
    pub const CLASS_NAME: &'static str = "hdfs_config.topology.NoOpSwitchMapping";
}

impl SwitchMapping for NoOpSwitchMapping {
    fn resolve(&self, _names: &[String]) -> Vec<String> {
        Vec::new()
    }

    fn reload_cached_mappings(&self) {}

    fn reload_cached_mappings_for(&self, _names: &[String]) {}
}

/// Switch mapping configured in `config`
///
/// Returns `None` when the key is unset or names an implementation this
/// crate does not provide.
pub fn switch_mapping_for(config: &Configuration) -> Option<Arc<dyn SwitchMapping>> {
    match config.get_trimmed(keys::NET_TOPOLOGY_NODE_SWITCH_MAPPING_IMPL)? {
        NoOpSwitchMapping::CLASS_NAME => Some(Arc::new(NoOpSwitchMapping)),
        _ => None,
    }
}
