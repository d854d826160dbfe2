//! Per-environment configuration.
//!
//! Options are owned by a scripting environment and threaded through every
//! descriptor it creates, so two environments in one process can disagree
//! without leaking into each other. Every field has a default, and the whole
//! struct deserializes from a partial JSON object.

use crate::limits;
use serde::{Deserialize, Serialize};

/// Order in which declared members are processed during discovery.
///
/// Processing order decides which candidate wins when two methods synthesize
/// the same bean property, and which overload is tried first during
/// compatibility-based dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscoveryOrder {
    /// Sort by raw name, then by parameter types. Stable across host versions.
    #[default]
    SortedByName,
    /// Whatever order the host introspection layer reports.
    Declared,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeOptions {
    pub discovery_order: DiscoveryOrder,
    /// Synthesize `getX` / `isX` / `setX` bean properties.
    pub bean_properties: bool,
    /// Discover own members of the universal base type.
    pub expose_base_type_members: bool,
    /// Also discover protected fields and methods. Constructors stay
    /// public-only.
    pub include_protected: bool,
    pub max_consolidation_depth: u32,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        BridgeOptions {
            discovery_order: DiscoveryOrder::SortedByName,
            bean_properties: true,
            expose_base_type_members: false,
            include_protected: false,
            max_consolidation_depth: limits::MAX_CONSOLIDATION_DEPTH,
        }
    }
}

impl BridgeOptions {
    pub fn with_discovery_order(mut self, order: DiscoveryOrder) -> Self {
        self.discovery_order = order;
        self
    }

    pub fn with_bean_properties(mut self, enabled: bool) -> Self {
        self.bean_properties = enabled;
        self
    }

    pub fn with_include_protected(mut self, enabled: bool) -> Self {
        self.include_protected = enabled;
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
