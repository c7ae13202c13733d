// crates/checkbin-client/tests/transport_tests.rs
// ============================================================================
// Module: HttpTransport Unit Tests
// Description: Comprehensive tests for the bearer-authenticated transport.
// ============================================================================

//! HTTP transport tests.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]
#![allow(dead_code, reason = "Common module may have unused helpers.")]

mod common;

use checkbin_client::HttpTransport;
use checkbin_client::TransportError;
use checkbin_config::EndpointConfig;
use serde::Deserialize;
use serde_json::json;

use common::MockResponse;
use common::spawn_server;
use common::test_credentials;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Typed response used by transport tests.
#[derive(Debug, Deserialize)]
struct EchoResponse {
    /// Value echoed by the mock server.
    value: String,
}

/// Builds an endpoint config pointed at `base_url`.
fn endpoint(base_url: &str) -> EndpointConfig {
    EndpointConfig {
        base_url: base_url.to_string(),
        connect_timeout_ms: 500,
        request_timeout_ms: 2_000,
    }
}

/// Builds a transport against `base_url` with a 1 MiB response cap.
fn transport(base_url: &str) -> HttpTransport {
    HttpTransport::new(&endpoint(base_url), test_credentials(), 1024 * 1024)
        .expect("transport")
}

// ============================================================================
// SECTION: Constructor Tests
// ============================================================================

#[test]
fn new_rejects_unparseable_base_url() {
    let err = HttpTransport::new(&endpoint("not a url"), test_credentials(), 1024).unwrap_err();
    assert!(matches!(err, TransportError::Config(_)));
}

#[test]
fn new_rejects_non_http_scheme() {
    let err =
        HttpTransport::new(&endpoint("ftp://example.com"), test_credentials(), 1024).unwrap_err();
    assert!(matches!(err, TransportError::Config(_)));
    assert!(err.to_string().contains("ftp"));
}

// ============================================================================
// SECTION: Success Path Tests
// ============================================================================

#[test]
fn post_json_sends_bearer_and_content_type() {
    let (base_url, handle) =
        spawn_server(vec![MockResponse::ok(r#"{"value": "ok"}"#)]);
    let transport = transport(&base_url);

    let response: EchoResponse =
        transport.post_json("v1/echo", &json!({"ping": true})).expect("post");
    assert_eq!(response.value, "ok");

    let captured = handle.join().expect("server thread");
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].method, "POST");
    assert_eq!(captured[0].url, "/v1/echo");
    assert_eq!(captured[0].authorization.as_deref(), Some("Bearer test-token"));
    assert_eq!(captured[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(captured[0].body_json(), json!({"ping": true}));
}

// ============================================================================
// SECTION: Error Path Tests
// ============================================================================

#[test]
fn post_json_fails_closed_on_404() {
    let (base_url, handle) =
        spawn_server(vec![MockResponse::error(404, r#"{"error": "missing"}"#)]);
    let transport = transport(&base_url);

    let err = transport.post_json::<_, EchoResponse>("v1/echo", &json!({})).unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
    assert!(err.to_string().contains("404"));

    handle.join().expect("server thread");
}

#[test]
fn post_json_fails_closed_on_500() {
    let (base_url, handle) =
        spawn_server(vec![MockResponse::error(500, r#"{"error": "boom"}"#)]);
    let transport = transport(&base_url);

    let err = transport.post_json::<_, EchoResponse>("v1/echo", &json!({})).unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
    assert!(err.to_string().contains("500"));

    handle.join().expect("server thread");
}

#[test]
fn post_json_includes_body_preview_in_status_errors() {
    let (base_url, handle) =
        spawn_server(vec![MockResponse::error(400, r#"{"error": "bad run name"}"#)]);
    let transport = transport(&base_url);

    let err = transport.post_json::<_, EchoResponse>("v1/echo", &json!({})).unwrap_err();
    assert!(err.to_string().contains("bad run name"));

    handle.join().expect("server thread");
}

#[test]
fn post_json_rejects_invalid_response_body() {
    let (base_url, handle) = spawn_server(vec![MockResponse::ok("not json")]);
    let transport = transport(&base_url);

    let err = transport.post_json::<_, EchoResponse>("v1/echo", &json!({})).unwrap_err();
    assert!(matches!(err, TransportError::Protocol(_)));

    handle.join().expect("server thread");
}

#[test]
fn post_json_rejects_oversized_response() {
    let large = format!(r#"{{"value": "{}"}}"#, "a".repeat(256));
    let (base_url, handle) = spawn_server(vec![MockResponse::ok(&large)]);
    let transport = HttpTransport::new(&endpoint(&base_url), test_credentials(), 64)
        .expect("transport");

    let err = transport.post_json::<_, EchoResponse>("v1/echo", &json!({})).unwrap_err();
    assert!(matches!(err, TransportError::ResponseTooLarge { .. }));

    handle.join().expect("server thread");
}

#[test]
fn post_json_handles_connection_refused() {
    // Port 1 should never be open.
    let transport = transport("http://127.0.0.1:1");
    let err = transport.post_json::<_, EchoResponse>("v1/echo", &json!({})).unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
}

#[test]
fn post_json_treats_redirects_as_failure() {
    let (base_url, handle) =
        spawn_server(vec![MockResponse::error(301, "moved")]);
    let transport = transport(&base_url);

    let err = transport.post_json::<_, EchoResponse>("v1/echo", &json!({})).unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
    assert!(err.to_string().contains("301"));

    handle.join().expect("server thread");
}
