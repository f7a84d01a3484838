//! File node source.
//!
//! Reads a JSON or YAML list of node records, the same shape the catalog serves.

use super::{NodeSource, SourceError, SourceResult};
use crate::inventory::NodeRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Node source reading a local file
#[derive(Debug, Clone)]
pub struct FileNodeSource {
    path: PathBuf,
}

impl FileNodeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl NodeSource for FileNodeSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_all(&self) -> SourceResult<Vec<NodeRecord>> {
        info!(path = %self.path.display(), "reading node records");
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_nodes(&self.path, &content)
    }
}

/// Parse node records, choosing the format from the file extension
pub fn parse_nodes(path: &Path, content: &str) -> SourceResult<Vec<NodeRecord>> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension.to_lowercase().as_str() {
        "json" => serde_json::from_str(content).map_err(|e| SourceError::Decode(e.to_string())),
        "yml" | "yaml" => {
            serde_yaml::from_str(content).map_err(|e| SourceError::Decode(e.to_string()))
        }
        _ => serde_json::from_str(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|e| SourceError::Decode(e.to_string())),
    }
}
