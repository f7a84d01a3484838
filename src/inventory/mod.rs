//! Inventory projection for fleetinv.
//!
//! This module turns fleet node records into an Ansible dynamic inventory:
//! - [`node`]: the catalog's node records
//! - [`resolver`]: domain, control-plane and connection resolution
//! - [`groups`]: group membership rules
//! - [`vars`]: host variable construction
//! - [`projector`]: per-node projection combining the above
//! - [`assembler`]: folding hosts into the `--list` document

pub mod assembler;
pub mod groups;
pub mod node;
pub mod projector;
pub mod resolver;
pub mod vars;

pub use assembler::{build_inventory, InventoryBuilder, InventoryDocument, InventoryGroup};
pub use groups::{sanitize_group_name, system_role_groups, GroupDeriver, SystemRoleGroups, TagGroups};
pub use node::{
    Environment, Location, NetworkAttachment, NetworkDefinition, NodeNetworkConfig, NodeRecord,
    SystemInfo,
};
pub use projector::{AliasStrategy, HostProjector, ProjectedHost};
pub use resolver::{
    resolve_connection, resolve_domain, Connection, ControlPlane, DomainResolution,
    DEFAULT_SSH_PORT,
};
pub use vars::{HostVars, HostVarsBuilder};

use thiserror::Error;

/// Top-level key reserved by the dynamic inventory protocol
pub const RESERVED_META_KEY: &str = "_meta";

/// Errors that exclude a single node from the inventory
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("node '{id}' has no hostname")]
    MissingHostname { id: String },

    #[error("node '{hostname}' has no system id")]
    MissingSystemId { hostname: String },

    #[error("name '{0}' is reserved by the inventory format")]
    ReservedName(String),

    #[error("failed to snapshot node record: {0}")]
    Snapshot(#[source] serde_json::Error),
}

/// Result type for projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;
