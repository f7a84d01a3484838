//! Shared fixtures for the integration tests

#![allow(dead_code)]

use fleetinv::inventory::NodeRecord;
use serde_json::{json, Value};
use std::path::PathBuf;

/// Path of the bundled node fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Build a node record, overlaying `extra` on a minimal valid record
pub fn node(hostname: &str, extra: Value) -> NodeRecord {
    let mut base = json!({
        "id": format!("inv-{}", hostname),
        "hostname": hostname,
        "role": "worker",
        "system": { "id": "sys7" },
        "last_updated": "2024-01-01T00:00:00Z",
        "location": { "rack": "r01" }
    });
    if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(base).unwrap()
}

/// A provisioning network attachment with one address and gateway
pub fn provisioning(domain: &str, ip: &str, gateway: &str) -> Value {
    json!({
        "provisioning": {
            "network": { "domain": domain },
            "config": { "ip": [ip], "gateway": [gateway] }
        }
    })
}
