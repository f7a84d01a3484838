//! Folding projected hosts into an Ansible dynamic inventory document.
//!
//! The document follows the `--list` protocol:
//!
//! ```json
//! {
//!   "sys7": { "hosts": ["node1.example.org"], "vars": {} },
//!   "sys7-worker": { "hosts": ["node1.example.org"], "vars": {} },
//!   "_meta": { "hostvars": { "node1.example.org": { "role": "worker" } } }
//! }
//! ```

use super::node::NodeRecord;
use super::projector::{HostProjector, ProjectedHost};
use super::vars::HostVars;
use super::RESERVED_META_KEY;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A group in the output document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryGroup {
    /// Member aliases in first-seen order; not deduplicated
    pub hosts: Vec<String>,

    /// Group variables; always emitted
    pub vars: IndexMap<String, serde_json::Value>,
}

impl InventoryGroup {
    pub fn add_host(&mut self, alias: impl Into<String>) {
        self.hosts.push(alias.into());
    }
}

/// The complete inventory document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryDocument {
    pub groups: IndexMap<String, InventoryGroup>,
    pub hostvars: IndexMap<String, HostVars>,
}

impl InventoryDocument {
    pub fn group(&self, name: &str) -> Option<&InventoryGroup> {
        self.groups.get(name)
    }

    /// Variables of a single host, as used by `--host`
    pub fn host_vars(&self, alias: &str) -> Option<&HostVars> {
        self.hostvars.get(alias)
    }

    pub fn host_count(&self) -> usize {
        self.hostvars.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Serialize to a JSON value
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[derive(Serialize)]
struct Meta<'a> {
    hostvars: &'a IndexMap<String, HostVars>,
}

impl Serialize for InventoryDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        for (name, group) in &self.groups {
            map.serialize_entry(name, group)?;
        }
        map.serialize_entry(
            RESERVED_META_KEY,
            &Meta {
                hostvars: &self.hostvars,
            },
        )?;
        map.end()
    }
}

/// Accumulates projected hosts into groups and hostvars
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    groups: IndexMap<String, InventoryGroup>,
    hostvars: IndexMap<String, HostVars>,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a group, creating it empty on first reference
    pub fn group_mut(&mut self, name: &str) -> &mut InventoryGroup {
        self.groups.entry(name.to_string()).or_default()
    }

    /// Add a host to all its groups and record its variables.
    ///
    /// A second host with the same alias replaces the first one's variables.
    pub fn add_host(&mut self, host: ProjectedHost) {
        for group in &host.groups {
            self.group_mut(group).add_host(host.alias.clone());
        }

        if self.hostvars.insert(host.alias.clone(), host.vars).is_some() {
            warn!(alias = %host.alias, "duplicate host alias, later node replaces earlier host variables");
        }
    }

    pub fn finish(self) -> InventoryDocument {
        InventoryDocument {
            groups: self.groups,
            hostvars: self.hostvars,
        }
    }
}

/// Project every node and assemble the inventory document.
///
/// Nodes that fail to project are logged and left out.
pub fn build_inventory<'a, I>(nodes: I, projector: &HostProjector) -> InventoryDocument
where
    I: IntoIterator<Item = &'a NodeRecord>,
{
    let mut builder = InventoryBuilder::new();
    let mut skipped = 0usize;

    for node in nodes {
        match projector.project(node) {
            Ok(host) => {
                debug!(alias = %host.alias, groups = ?host.groups, "projected node");
                builder.add_host(host);
            }
            Err(e) => {
                skipped += 1;
                warn!(hostname = %node.hostname, id = %node.id, error = %e, "skipping node");
            }
        }
    }

    let document = builder.finish();
    debug!(
        hosts = document.host_count(),
        groups = document.group_count(),
        skipped,
        "inventory assembled"
    );
    document
}
