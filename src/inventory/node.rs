//! Node records as served by the fleet catalog.
//!
//! These types are read-only input to the projection. They deserialize from the
//! catalog's JSON (or a YAML/JSON file) and serialize back unchanged so a full
//! snapshot can be embedded in host variables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the network attachment used as the default domain source.
pub const PROVISIONING_NETWORK: &str = "provisioning";

/// Metadata key naming the control-plane network attachment.
pub const CONTROL_PLANE_NETWORK_KEY: &str = "kubernetes_control_plane_network";

/// A single node in the fleet catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Opaque inventory ID
    pub id: String,

    /// Short hostname (no domain)
    pub hostname: String,

    /// Role of the node within its system (e.g. "worker")
    #[serde(default)]
    pub role: String,

    /// System the node belongs to
    pub system: SystemInfo,

    /// Last time the record was modified in the catalog
    pub last_updated: DateTime<Utc>,

    /// Network attachments keyed by network name
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkAttachment>,

    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,

    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,

    /// Physical location
    #[serde(default)]
    pub location: Location,
}

impl NodeRecord {
    /// Stable system identifier
    pub fn system_id(&self) -> &str {
        &self.system.id
    }

    /// Look up a network attachment by name
    pub fn network(&self, name: &str) -> Option<&NetworkAttachment> {
        self.networks.get(name)
    }

    /// The attachment designated as the control-plane network, if the metadata
    /// names one and the node actually has it.
    pub fn control_plane_network(&self) -> Option<&NetworkAttachment> {
        self.environment
            .control_plane_network()
            .and_then(|name| self.networks.get(name))
    }
}

/// System identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Stable identifier, used for grouping
    pub id: String,

    /// Human readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A node's attachment to a named network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    /// Definition of the network itself
    #[serde(default)]
    pub network: NetworkDefinition,

    /// Node-specific addressing on this network
    #[serde(default)]
    pub config: NodeNetworkConfig,
}

impl NetworkAttachment {
    /// Domain of the attached network, `None` when unset or empty
    pub fn domain(&self) -> Option<&str> {
        Some(self.network.domain.as_str()).filter(|d| !d.is_empty())
    }
}

/// Network definition shared by all nodes attached to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// DNS domain for hosts on this network
    #[serde(default)]
    pub domain: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// Per-node addressing.
///
/// `ip[i]` pairs with `gateway[i]`. The lists are not guaranteed to have the
/// same length and entries are not guaranteed to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeNetworkConfig {
    /// Addresses in CIDR notation
    #[serde(default)]
    pub ip: Vec<String>,

    /// Gateway addresses
    #[serde(default)]
    pub gateway: Vec<String>,
}

impl NodeNetworkConfig {
    /// Iterate over index-aligned `(ip, gateway)` pairs, stopping at the shorter list
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ip
            .iter()
            .zip(self.gateway.iter())
            .map(|(ip, gw)| (ip.as_str(), gw.as_str()))
    }
}

/// Deployment environment of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Arbitrary metadata. Only a few keys are interpreted.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Environment {
    /// Name of the control-plane network, when the metadata holds a string for it.
    ///
    /// Non-string values are treated as absent.
    pub fn control_plane_network(&self) -> Option<&str> {
        self.metadata
            .get(CONTROL_PLANE_NETWORK_KEY)
            .and_then(serde_json::Value::as_str)
    }
}

/// Physical location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub rack: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}
