//! # fleetinv - Ansible dynamic inventory for a fleet catalog
//!
//! fleetinv reads every node record from a fleet inventory catalog and turns
//! it into the JSON document Ansible expects from a dynamic inventory script.
//!
//! ## Pipeline
//!
//! ```text
//! NodeSource::fetch_all ──► HostProjector::project (per node) ──► InventoryBuilder ──► JSON
//! ```
//!
//! - [`source`]: where node records come from (HTTP catalog or file)
//! - [`inventory`]: alias, group and variable projection plus assembly
//! - [`config`]: layered configuration
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use fleetinv::prelude::*;
//!
//! let config = Config::load(None)?;
//! let source = create_source(&config.source)?;
//! let projector = HostProjector::new(config.projection.clone());
//! let document = generate_inventory(source.as_ref(), &projector).await?;
//! println!("{}", serde_json::to_string(&document)?);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod inventory;
pub mod source;

pub use error::{Error, Result};

use inventory::{build_inventory, HostProjector, InventoryDocument};
use source::NodeSource;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::config::{Config, ProjectionConfig, SourceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::generate_inventory;
    pub use crate::inventory::{
        AliasStrategy, HostProjector, InventoryBuilder, InventoryDocument, NodeRecord,
        ProjectedHost,
    };
    pub use crate::source::{create_source, FileNodeSource, HttpNodeSource, NodeSource};
}

/// Fetch every node from `source` and assemble the inventory document.
///
/// A fetch failure aborts; a node that fails to project is skipped.
pub async fn generate_inventory(
    source: &dyn NodeSource,
    projector: &HostProjector,
) -> Result<InventoryDocument> {
    let nodes = source.fetch_all().await?;
    tracing::info!(
        source = source.name(),
        nodes = nodes.len(),
        strategy = %projector.strategy(),
        "projecting nodes"
    );
    Ok(build_inventory(&nodes, projector))
}
