//! Group membership derivation.
//!
//! The canonical rule places every host in its system group and in a
//! `<system>-<role>` group. [`GroupDeriver`] is the seam for additional rules;
//! [`TagGroups`] is the one shipped extension and is off by default.

use super::node::NodeRecord;
use std::fmt;

/// Derives the groups a node belongs to
pub trait GroupDeriver: Send + Sync + fmt::Debug {
    /// Ordered list of group names for the node
    fn groups(&self, node: &NodeRecord) -> Vec<String>;
}

/// `[system_id, system_id-role]`
pub fn system_role_groups(system_id: &str, role: &str) -> Vec<String> {
    vec![system_id.to_string(), format!("{}-{}", system_id, role)]
}

/// Default grouping by system and system/role
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRoleGroups;

impl GroupDeriver for SystemRoleGroups {
    fn groups(&self, node: &NodeRecord) -> Vec<String> {
        system_role_groups(node.system_id(), &node.role)
    }
}

/// Adds a `tag_<tag>` group per node tag on top of another deriver
#[derive(Debug)]
pub struct TagGroups<D> {
    inner: D,
}

impl<D: GroupDeriver> TagGroups<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: GroupDeriver> GroupDeriver for TagGroups<D> {
    fn groups(&self, node: &NodeRecord) -> Vec<String> {
        let mut groups = self.inner.groups(node);
        for tag in &node.tags {
            let safe = sanitize_group_name(tag);
            if !safe.is_empty() {
                groups.push(format!("tag_{}", safe));
            }
        }
        groups
    }
}

/// Turn a node tag into a group-name suffix.
///
/// `"GPU node"` becomes `gpu_node`. A tag made only of punctuation yields an
/// empty string, which [`TagGroups`] skips.
pub fn sanitize_group_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            prev_underscore = false;
        } else if !prev_underscore {
            result.push('_');
            prev_underscore = true;
        }
    }

    result.trim_matches('_').to_string()
}
