//! Error types for fleetinv.
//!
//! Per-layer errors are defined next to their layer; this type collects the
//! ones that end a run.

use thiserror::Error;

/// Result type alias for fleetinv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort inventory generation.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or is incomplete.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The node source failed to return records.
    #[error("unable to read nodes: {0}")]
    Source(#[from] crate::source::SourceError),

    /// The inventory document could not be serialized.
    #[error("unable to serialize inventory: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Source(_) | Error::Serialization(_) => 1,
        }
    }
}
