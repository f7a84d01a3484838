//! Node sources for fleetinv.
//!
//! A node source supplies every node record of the fleet in one call. The
//! projection never writes back to it.
//!
//! # Available Sources
//!
//! - [`http`]: the remote inventory catalog over HTTP(S)
//! - [`file`]: a JSON or YAML file holding a list of node records
//!
//! # Usage
//!
//! ```rust,ignore
//! use fleetinv::source::{HttpNodeSource, NodeSource};
//!
//! let source = HttpNodeSource::new(&config.source)?;
//! let nodes = source.fetch_all().await?;
//! ```

pub mod file;
pub mod http;

pub use file::FileNodeSource;
pub use http::HttpNodeSource;

use crate::config::SourceConfig;
use crate::inventory::NodeRecord;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Errors raised while fetching node records.
///
/// Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid source configuration: {0}")]
    Config(String),

    #[error("request to node catalog failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode node records: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// A read-only supplier of node records
#[async_trait]
pub trait NodeSource: Send + Sync + fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch every node record, in catalog order
    async fn fetch_all(&self) -> SourceResult<Vec<NodeRecord>>;
}

/// Create the source selected by configuration.
///
/// A configured `file` takes precedence over the HTTP catalog.
pub fn create_source(config: &SourceConfig) -> SourceResult<Box<dyn NodeSource>> {
    match &config.file {
        Some(path) => Ok(Box::new(FileNodeSource::new(path.clone()))),
        None => Ok(Box::new(HttpNodeSource::new(config)?)),
    }
}
