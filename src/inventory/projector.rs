//! Per-node projection into an inventory host.

use super::groups::{GroupDeriver, SystemRoleGroups, TagGroups};
use super::node::NodeRecord;
use super::resolver::{resolve_connection, resolve_domain, Connection};
use super::vars::{HostVars, HostVarsBuilder};
use super::{ProjectionError, ProjectionResult, RESERVED_META_KEY};
use crate::config::ProjectionConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a host's alias and connection address are chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasStrategy {
    /// Alias is `hostname.domain` using the provisioning or control-plane domain
    #[default]
    Domain,
    /// Alias is the hostname; connection vars come from the gateway scan
    Gateway,
}

impl fmt::Display for AliasStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasStrategy::Domain => write!(f, "domain"),
            AliasStrategy::Gateway => write!(f, "gateway"),
        }
    }
}

impl FromStr for AliasStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "domain" => Ok(AliasStrategy::Domain),
            "gateway" => Ok(AliasStrategy::Gateway),
            other => Err(format!(
                "unknown alias strategy '{}', expected 'domain' or 'gateway'",
                other
            )),
        }
    }
}

/// A node projected into inventory terms
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedHost {
    /// Name used in group host lists and hostvars
    pub alias: String,
    /// Groups the host belongs to, in order
    pub groups: Vec<String>,
    /// Host variables
    pub vars: HostVars,
    /// Connection parameters
    pub connection: Connection,
}

/// Projects node records into inventory hosts
#[derive(Debug)]
pub struct HostProjector {
    config: ProjectionConfig,
    groups: Box<dyn GroupDeriver>,
}

impl Default for HostProjector {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

impl HostProjector {
    /// Create a projector; enables tag groups when configured
    pub fn new(config: ProjectionConfig) -> Self {
        let groups: Box<dyn GroupDeriver> = if config.tag_groups {
            Box::new(TagGroups::new(SystemRoleGroups))
        } else {
            Box::new(SystemRoleGroups)
        };
        Self { config, groups }
    }

    /// Replace the group derivation rule
    pub fn with_group_deriver(mut self, groups: Box<dyn GroupDeriver>) -> Self {
        self.groups = groups;
        self
    }

    pub fn strategy(&self) -> AliasStrategy {
        self.config.alias_strategy
    }

    /// Project a single node
    pub fn project(&self, node: &NodeRecord) -> ProjectionResult<ProjectedHost> {
        if node.hostname.trim().is_empty() {
            return Err(ProjectionError::MissingHostname {
                id: node.id.clone(),
            });
        }
        if node.system_id().trim().is_empty() {
            return Err(ProjectionError::MissingSystemId {
                hostname: node.hostname.clone(),
            });
        }

        let resolution = resolve_domain(node);

        let (alias, connection) = match self.config.alias_strategy {
            AliasStrategy::Domain => {
                let connection =
                    Connection::from_parts(&node.hostname, resolution.domain.as_deref(), None);
                let alias = connection
                    .fqdn
                    .clone()
                    .unwrap_or_else(|| node.hostname.clone());
                (alias, connection)
            }
            AliasStrategy::Gateway => (node.hostname.clone(), resolve_connection(node)),
        };

        if alias == RESERVED_META_KEY {
            return Err(ProjectionError::ReservedName(alias));
        }

        let groups = self.groups.groups(node);
        if let Some(reserved) = groups.iter().find(|g| g.as_str() == RESERVED_META_KEY) {
            return Err(ProjectionError::ReservedName(reserved.clone()));
        }

        let mut vars = HostVarsBuilder::new()
            .python_interpreter(self.config.python_interpreter.as_deref())
            .node(node)
            .map_err(ProjectionError::Snapshot)?;
        if self.config.alias_strategy == AliasStrategy::Gateway {
            vars = vars.connection(&connection);
        }
        let vars = vars.control_plane(resolution.control_plane.as_ref()).build();

        Ok(ProjectedHost {
            alias,
            groups,
            vars,
            connection,
        })
    }
}
