//! Integration tests for node sources
//!
//! The HTTP catalog is simulated with wiremock.

mod common;

use fleetinv::config::SourceConfig;
use fleetinv::inventory::HostProjector;
use fleetinv::source::{create_source, FileNodeSource, HttpNodeSource, NodeSource, SourceError};
use serde_json::json;
use std::io::Write;
use tempfile::Builder;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog_body() -> serde_json::Value {
    json!([
        {
            "id": "inv-1",
            "hostname": "node1",
            "role": "worker",
            "system": { "id": "sys7" },
            "last_updated": "2024-03-01T12:00:00Z"
        }
    ])
}

fn http_config(base_url: &str) -> SourceConfig {
    SourceConfig {
        base_url: Some(base_url.to_string()),
        ..Default::default()
    }
}

// ============================================================================
// HTTP source
// ============================================================================

#[tokio::test]
async fn test_http_fetch_all() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodeconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpNodeSource::new(&http_config(&server.uri())).unwrap();
    let nodes = source.fetch_all().await.unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].hostname, "node1");
}

#[tokio::test]
async fn test_http_sends_profile_region_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nodeconfig"))
        .and(header("x-fleet-profile", "ops"))
        .and(header("x-fleet-region", "eu-west-1"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = SourceConfig {
        base_url: Some(format!("{}/api", server.uri())),
        profile: "ops".into(),
        region: "eu-west-1".into(),
        token: Some("s3cret".into()),
        ..Default::default()
    };
    let nodes = HttpNodeSource::new(&config)
        .unwrap()
        .fetch_all()
        .await
        .unwrap();
    assert!(nodes.is_empty());
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodeconfig"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let err = HttpNodeSource::new(&http_config(&server.uri()))
        .unwrap()
        .fetch_all()
        .await
        .unwrap_err();

    match err {
        SourceError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "backend down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodeconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&server)
        .await;

    let err = HttpNodeSource::new(&http_config(&server.uri()))
        .unwrap()
        .fetch_all()
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[tokio::test]
async fn test_http_unreachable_catalog() {
    // Nothing listens on the discard port
    let source = HttpNodeSource::new(&http_config("http://127.0.0.1:9")).unwrap();
    let err = source.fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::Transport(_)));
}

#[tokio::test]
async fn test_generate_inventory_from_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodeconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .mount(&server)
        .await;

    let source = create_source(&http_config(&server.uri())).unwrap();
    let doc = fleetinv::generate_inventory(source.as_ref(), &HostProjector::default())
        .await
        .unwrap();

    assert_eq!(doc.group("sys7-worker").unwrap().hosts, vec!["node1"]);
}

#[tokio::test]
async fn test_generate_inventory_propagates_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let source = create_source(&http_config(&server.uri())).unwrap();
    let err = fleetinv::generate_inventory(source.as_ref(), &HostProjector::default())
        .await
        .unwrap_err();
    assert!(matches!(err, fleetinv::Error::Source(_)));
    assert_eq!(err.exit_code(), 1);
}

// ============================================================================
// File source
// ============================================================================

#[tokio::test]
async fn test_file_source_json_fixture() {
    let source = FileNodeSource::new(common::fixture_path("nodes.json"));
    let nodes = source.fetch_all().await.unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1].hostname, "node2");
}

#[tokio::test]
async fn test_file_source_yaml() {
    let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        r#"
- id: inv-1
  hostname: node1
  role: worker
  system:
    id: sys7
  last_updated: "2024-03-01T12:00:00Z"
  tags: [gpu]
"#
    )
    .unwrap();

    let nodes = FileNodeSource::new(file.path()).fetch_all().await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].tags, vec!["gpu"]);
}

#[tokio::test]
async fn test_file_source_takes_precedence() {
    let config = SourceConfig {
        base_url: Some("https://inventory.example.org".into()),
        file: Some(common::fixture_path("nodes.json")),
        ..Default::default()
    };
    let source = create_source(&config).unwrap();
    assert_eq!(source.name(), "file");
}
