//! End-to-end ingest passes against a mock SDTP server.

mod support;

use std::collections::HashMap;
use std::sync::Arc;

use sdtp_core::{HttpSdtpClient, IngestEngine, SdtpClient};
use sha2::Digest;
use support::socket_guard::start_mock_server_or_skip;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sha256(data: &[u8]) -> String {
    format!("sha256:{}", hex::encode(sha2::Sha256::digest(data)))
}

fn client_for(server: &MockServer) -> Arc<dyn SdtpClient> {
    let api_url = Url::parse(&server.uri()).expect("valid url");
    Arc::new(HttpSdtpClient::with_client(reqwest::Client::new(), api_url))
}

/// Mounts a listing of `(id, name, body, declared_checksum)` and a GET per file.
async fn mount_listing(server: &MockServer, files: &[(i64, &str, &[u8], String)]) {
    let records: Vec<_> = files
        .iter()
        .map(|(id, name, body, checksum)| {
            serde_json::json!({
                "fileid": id,
                "name": name,
                "checksum": checksum,
                "size": body.len(),
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": records})))
        .mount(server)
        .await;

    for (id, _, body, _) in files {
        Mock::given(method("GET"))
            .and(path(format!("/files/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(server)
            .await;
    }
}

async fn expect_ack(server: &MockServer, id: i64, times: u64) {
    Mock::given(method("DELETE"))
        .and(path(format!("/files/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_ingest_pass_skips_corrupt_file_and_acks_the_rest() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let files: Vec<(i64, &str, &[u8], String)> = vec![
        (1, "a.h5", &b"alpha"[..], sha256(b"alpha")),
        (2, "b.h5", &b"tampered"[..], sha256(b"bravo")),
        (3, "c.h5", &b"charlie"[..], sha256(b"charlie")),
    ];
    mount_listing(&server, &files).await;
    expect_ack(&server, 1, 1).await;
    expect_ack(&server, 2, 0).await;
    expect_ack(&server, 3, 1).await;

    let engine = IngestEngine::new(10, true).expect("valid engine");
    let stats = engine
        .run(
            client_for(&server),
            &HashMap::new(),
            temp_dir.path(),
            &CancellationToken::new(),
        )
        .await
        .expect("pass should not fail because of one file");

    assert_eq!(stats.listed(), 3);
    assert_eq!(stats.downloaded(), 2);
    assert_eq!(stats.download_failed(), 1);
    assert_eq!(stats.acknowledged(), 2);
    assert_eq!(std::fs::read(temp_dir.path().join("a.h5")).expect("a"), b"alpha");
    assert_eq!(std::fs::read(temp_dir.path().join("c.h5")).expect("c"), b"charlie");
    assert!(!temp_dir.path().join("b.h5").exists());
    assert!(!temp_dir.path().join(".b.h5").exists());
}

#[tokio::test]
async fn test_ingest_pass_without_ack_sends_no_delete() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let files: Vec<(i64, &str, &[u8], String)> = vec![(1, "a.h5", &b"alpha"[..], sha256(b"alpha"))];
    mount_listing(&server, &files).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let engine = IngestEngine::new(1, false).expect("valid engine");
    let stats = engine
        .run(
            client_for(&server),
            &HashMap::new(),
            temp_dir.path(),
            &CancellationToken::new(),
        )
        .await
        .expect("pass should succeed");

    assert_eq!(stats.downloaded(), 1);
    assert_eq!(stats.acknowledged(), 0);
}

#[tokio::test]
async fn test_ingest_pass_filters_listing_by_tags() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("ShortName", "VIIRS_L1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": []})))
        .expect(1)
        .mount(&server)
        .await;

    let tags = HashMap::from([("ShortName".to_string(), "VIIRS_L1".to_string())]);
    let stats = IngestEngine::new(2, true)
        .expect("valid engine")
        .run(client_for(&server), &tags, temp_dir.path(), &CancellationToken::new())
        .await
        .expect("pass should succeed");

    assert_eq!(stats.listed(), 0);
}

#[tokio::test]
async fn test_ingest_pass_list_forbidden_is_fatal() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = IngestEngine::new(2, true)
        .expect("valid engine")
        .run(
            client_for(&server),
            &HashMap::new(),
            temp_dir.path(),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(sdtp_core::SdtpError::Forbidden)));
}

#[tokio::test]
async fn test_ingest_pass_null_listing_is_empty_pass() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"files":null}"#))
        .expect(1)
        .mount(&server)
        .await;

    let stats = IngestEngine::new(4, true)
        .expect("valid engine")
        .run(
            client_for(&server),
            &HashMap::new(),
            temp_dir.path(),
            &CancellationToken::new(),
        )
        .await
        .expect("null listing should not fail the pass");

    assert_eq!(stats.listed(), 0);
    assert_eq!(stats.downloaded(), 0);
}
