//! Tests for store configuration, URL building, and the REST transport.
//!
//! Transport tests run `RestStore` against a one-shot HTTP responder on a
//! local socket, so no network access is needed.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use docseed_core::config::{DEFAULT_BASE_URL, DEFAULT_DATABASE};
use docseed_core::{
    encode, write_target, DocseedError, DocumentStore, EncodedValue, Fields, RestStore,
    StoreConfig, Value,
};
use serde_json::json;

// ============================================================================
// Config
// ============================================================================

#[test]
fn config_defaults() {
    let config = StoreConfig::new("bugcash", "key123");
    assert_eq!(config.database, DEFAULT_DATABASE);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(
        config.documents_url(),
        "https://firestore.googleapis.com/v1/projects/bugcash/databases/(default)/documents"
    );
}

#[test]
fn collection_url_appends_key() {
    let config = StoreConfig::new("bugcash", "key123");
    assert_eq!(
        config.collection_url("tester_applications").unwrap(),
        "https://firestore.googleapis.com/v1/projects/bugcash/databases/(default)/documents/tester_applications?key=key123"
    );
}

#[test]
fn document_url_without_key() {
    let config = StoreConfig::new("demo", "")
        .with_base_url("http://localhost:8080/v1/")
        .with_database("staging");
    assert_eq!(
        config.document_url("apps", "eUOdv8wASX7RfSGMin7c").unwrap(),
        "http://localhost:8080/v1/projects/demo/databases/staging/documents/apps/eUOdv8wASX7RfSGMin7c"
    );
}

#[test]
fn path_segments_must_not_contain_slash() {
    let config = StoreConfig::new("bugcash", "");
    assert!(matches!(
        config.collection_url("apps/nested"),
        Err(DocseedError::Config(_))
    ));
    assert!(matches!(
        config.document_url("apps", "a/b"),
        Err(DocseedError::Config(_))
    ));
    assert!(matches!(
        config.document_url("apps", ""),
        Err(DocseedError::Config(_))
    ));
}

#[test]
fn url_delimiters_in_ids_are_rejected() {
    let config = StoreConfig::new("bugcash", "");
    for id in ["a?b", "a#b", "a b", "100%", "tab\there"] {
        assert!(
            matches!(config.document_url("apps", id), Err(DocseedError::Config(_))),
            "document id {:?} must be rejected",
            id
        );
    }
    assert!(matches!(
        config.collection_url("daily interactions"),
        Err(DocseedError::Config(_))
    ));
    assert!(config.document_url("apps", "app_001_2025-09-19").is_ok());
}

#[test]
fn api_key_must_be_url_safe() {
    let config = StoreConfig::new("bugcash", "abc&admin=1");
    assert!(matches!(config.validate(), Err(DocseedError::Config(_))));
    assert!(matches!(
        config.collection_url("apps"),
        Err(DocseedError::Config(_))
    ));
    assert!(StoreConfig::new("bugcash", "AIza-Sy_0.9~x").validate().is_ok());
}

#[test]
fn project_id_is_checked_as_a_segment() {
    assert!(StoreConfig::new("bug/cash", "").validate().is_err());
    assert!(StoreConfig::new("bugcash", "")
        .with_database("my db")
        .validate()
        .is_err());
}

#[test]
fn validate_rejects_empty_project() {
    assert!(StoreConfig::new("  ", "k").validate().is_err());
    assert!(StoreConfig::new("bugcash", "").validate().is_ok());
}

#[test]
fn write_target_picks_method() {
    let config = StoreConfig::new("bugcash", "");
    let create = write_target(&config, "tester_applications", None).unwrap();
    assert_eq!(create.method, "POST");
    assert!(create.url.ends_with("/documents/tester_applications"));

    let upsert = write_target(&config, "daily_interactions", Some("app_001_2025-09-19")).unwrap();
    assert_eq!(upsert.method, "PATCH");
    assert!(upsert.url.ends_with("/documents/daily_interactions/app_001_2025-09-19"));
}

#[test]
fn rest_store_rejects_invalid_config() {
    assert!(RestStore::new(StoreConfig::new("", "k")).is_err());
}

// ============================================================================
// Transport
// ============================================================================

/// A request as seen by the responder.
struct Captured {
    request_line: String,
    body: serde_json::Value,
}

/// Serves exactly one request with the given status and body, then returns
/// what it received.
fn serve_once(status: u16, body: &'static str) -> (String, thread::JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/v1", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut raw = vec![0u8; content_length];
        reader.read_exact(&mut raw).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();

        Captured {
            request_line: request_line.trim_end().to_string(),
            body: serde_json::from_slice(&raw).unwrap(),
        }
    });

    (base_url, handle)
}

fn sample_fields() -> Fields {
    Value::from(json!({"appName": "BugCash Demo App", "maxTesters": 10}))
        .into_fields()
        .unwrap()
}

fn store_for(base_url: &str, api_key: &str) -> RestStore {
    RestStore::with_timeout(
        StoreConfig::new("bugcash", api_key).with_base_url(base_url),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[test]
fn patch_sends_fields_and_parses_document() {
    let (base_url, server) = serve_once(
        200,
        r#"{"name":"projects/bugcash/databases/(default)/documents/apps/eUOdv8wASX7RfSGMin7c","fields":{"maxTesters":{"integerValue":"10"}},"updateTime":"2025-09-19T08:30:00.000001Z"}"#,
    );
    let store = store_for(&base_url, "key123");

    let doc = store
        .write("apps", Some("eUOdv8wASX7RfSGMin7c"), &encode(&sample_fields()))
        .unwrap();
    let captured = server.join().unwrap();

    assert_eq!(
        captured.request_line,
        "PATCH /v1/projects/bugcash/databases/(default)/documents/apps/eUOdv8wASX7RfSGMin7c?key=key123 HTTP/1.1"
    );
    assert_eq!(
        captured.body,
        json!({"fields": {
            "appName": {"stringValue": "BugCash Demo App"},
            "maxTesters": {"integerValue": "10"}
        }})
    );
    assert_eq!(doc.id(), "eUOdv8wASX7RfSGMin7c");
    assert_eq!(
        doc.fields["maxTesters"],
        EncodedValue::Integer("10".to_string())
    );
}

#[test]
fn post_without_document_id() {
    let (base_url, server) = serve_once(
        200,
        r#"{"name":"projects/bugcash/databases/(default)/documents/tester_applications/Xy12"}"#,
    );
    let store = store_for(&base_url, "");

    let doc = store
        .write("tester_applications", None, &encode(&sample_fields()))
        .unwrap();
    let captured = server.join().unwrap();

    assert_eq!(
        captured.request_line,
        "POST /v1/projects/bugcash/databases/(default)/documents/tester_applications HTTP/1.1"
    );
    assert_eq!(doc.id(), "Xy12");
}

#[test]
fn non_success_status_reports_code_and_body() {
    let (base_url, server) = serve_once(
        403,
        r#"{"error":{"code":403,"status":"PERMISSION_DENIED"}}"#,
    );
    let store = store_for(&base_url, "bad-key");

    let err = store
        .write("apps", Some("x"), &encode(&sample_fields()))
        .unwrap_err();
    server.join().unwrap();

    match err {
        DocseedError::Status { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("PERMISSION_DENIED"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[test]
fn unreachable_store_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let store = store_for(&format!("http://127.0.0.1:{}/v1", port), "");

    let err = store
        .write("apps", Some("x"), &encode(&sample_fields()))
        .unwrap_err();
    assert!(matches!(err, DocseedError::Transport(_)), "got {:?}", err);
}
