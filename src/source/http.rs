//! HTTP node source backed by the fleet inventory catalog.

use super::{NodeSource, SourceError, SourceResult};
use crate::config::SourceConfig;
use crate::inventory::NodeRecord;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Catalog endpoint listing every node configuration
const NODECONFIG_PATH: &str = "nodeconfig";

// Profile and region are passed through untouched; no credentials are resolved here.
const PROFILE_HEADER: &str = "x-fleet-profile";
const REGION_HEADER: &str = "x-fleet-region";

/// Node source reading from the remote catalog
#[derive(Debug)]
pub struct HttpNodeSource {
    endpoint: Url,
    profile: String,
    region: String,
    client: Client,
}

impl HttpNodeSource {
    /// Create a source from configuration
    pub fn new(config: &SourceConfig) -> SourceResult<Self> {
        let base = config
            .base_url
            .as_deref()
            .ok_or_else(|| SourceError::Config("missing base_url".to_string()))?;
        let endpoint = endpoint_url(base)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(PROFILE_HEADER, header_value(&config.profile)?);
        headers.insert(REGION_HEADER, header_value(&config.region)?);
        if let Some(ref token) = config.token {
            let mut value = header_value(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .user_agent(concat!("fleetinv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            profile: config.profile.clone(),
            region: config.region.clone(),
            client,
        })
    }

    /// Full URL of the node listing
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl NodeSource for HttpNodeSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_all(&self) -> SourceResult<Vec<NodeRecord>> {
        info!(
            endpoint = %self.endpoint,
            profile = %self.profile,
            region = %self.region,
            "fetching node records"
        );

        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let nodes: Vec<NodeRecord> =
            serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        debug!(count = nodes.len(), "fetched node records");
        Ok(nodes)
    }
}

/// Join the listing path onto the base URL, keeping any base path
fn endpoint_url(base: &str) -> SourceResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| SourceError::Config(format!("unable to parse api base url '{}': {}", base, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.join(NODECONFIG_PATH)
        .map_err(|e| SourceError::Config(format!("invalid endpoint url: {}", e)))
}

fn header_value(value: &str) -> SourceResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| SourceError::Config(format!("invalid header value '{}'", value)))
}
