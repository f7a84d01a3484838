//! Host variable construction.

use super::node::NodeRecord;
use super::resolver::{Connection, ControlPlane};
use indexmap::IndexMap;
use serde_json::Value;

/// Flat host variable mapping, in insertion order
pub type HostVars = IndexMap<String, Value>;

/// Builder for a host's variables.
///
/// Keys are inserted in a fixed order so the serialized output is stable.
#[derive(Debug, Default)]
pub struct HostVarsBuilder {
    vars: HostVars,
}

impl HostVarsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `ansible_python_interpreter`
    pub fn python_interpreter(mut self, interpreter: Option<&str>) -> Self {
        if let Some(path) = interpreter {
            self.set("ansible_python_interpreter", Value::from(path));
        }
        self
    }

    /// Set the catalog attributes of the node and a snapshot of the record under `nodeconfig`
    pub fn node(mut self, node: &NodeRecord) -> Result<Self, serde_json::Error> {
        self.set("tags", Value::from(node.tags.clone()));
        self.set("inventory_id", Value::from(node.id.as_str()));
        self.set("rack", Value::from(node.location.rack.as_str()));
        self.set("role", Value::from(node.role.as_str()));
        self.set("last_update", serde_json::to_value(node.last_updated)?);
        self.set("nodeconfig", serde_json::to_value(node)?);
        Ok(self)
    }

    /// Set `ansible_fqdn`, `ansible_host` and `ansible_port`
    pub fn connection(mut self, connection: &Connection) -> Self {
        self.set(
            "ansible_fqdn",
            Value::from(connection.fqdn.clone().unwrap_or_default()),
        );
        self.set("ansible_host", Value::from(connection.host.as_str()));
        self.set("ansible_port", Value::from(connection.port));
        self
    }

    /// Set the `kube_control_plane_*` variables when a control plane was resolved
    pub fn control_plane(mut self, control_plane: Option<&ControlPlane>) -> Self {
        if let Some(cp) = control_plane {
            self.set(
                "kube_control_plane_domain",
                Value::from(cp.domain.as_str()),
            );
            self.set(
                "kube_control_plane_ips",
                Value::Array(cp.ips.iter().map(|ip| Value::from(ip.to_string())).collect()),
            );
        }
        self
    }

    pub fn build(self) -> HostVars {
        self.vars
    }

    fn set(&mut self, key: &str, value: Value) {
        self.vars.insert(key.to_string(), value);
    }
}
