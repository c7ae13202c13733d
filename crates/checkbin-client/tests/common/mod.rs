// crates/checkbin-client/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for checkbin-client tests.
// Purpose: Provide mock servers, writers, and fixtures for client tests.
// Dependencies: checkbin-core, checkbin-config, tiny_http
// ============================================================================

//! ## Overview
//! Provides shared helper functions and test utilities for transport,
//! recorder, and end-to-end flow tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use checkbin_client::Credentials;
use checkbin_config::CheckbinConfig;
use checkbin_core::AppKey;
use checkbin_core::BinId;
use checkbin_core::BinSeed;
use checkbin_core::BinSubmission;
use checkbin_core::CheckinLabel;
use checkbin_core::CheckinRecord;
use checkbin_core::RunId;
use checkbin_core::RunName;
use checkbin_core::StateEntry;
use checkbin_core::StateKey;
use checkbin_core::Timestamp;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use tiny_http::StatusCode;

// ============================================================================
// SECTION: Mock Server
// ============================================================================

/// One scripted response served by the mock server.
pub struct MockResponse {
    /// HTTP status code to respond with.
    pub status: u16,
    /// JSON body to respond with.
    pub body: String,
}

impl MockResponse {
    /// Creates a 200 response with the provided JSON body.
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    /// Creates an error response with the provided status and body.
    pub fn error(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// One request captured by the mock server.
pub struct CapturedRequest {
    /// Request method.
    pub method: String,
    /// Request URL path.
    pub url: String,
    /// `Authorization` header value, when present.
    pub authorization: Option<String>,
    /// `Content-Type` header value, when present.
    pub content_type: Option<String>,
    /// Raw request body.
    pub body: String,
}

impl CapturedRequest {
    /// Parses the captured body as JSON.
    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("captured body should be json")
    }
}

/// Spawns a mock server that answers the scripted responses in order.
///
/// Returns the base URL and a handle joining to the captured requests.
pub fn spawn_server(responses: Vec<MockResponse>) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let handle = thread::spawn(move || {
        let mut captured = Vec::new();
        for scripted in responses {
            let Ok(mut request) = server.recv() else {
                break;
            };
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).expect("read request body");
            captured.push(CapturedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                authorization: header_value(request.headers(), "Authorization"),
                content_type: header_value(request.headers(), "Content-Type"),
                body,
            });
            let reply = Response::from_string(scripted.body)
                .with_status_code(StatusCode(scripted.status))
                .with_header(
                    Header::from_bytes("Content-Type", "application/json").expect("header"),
                );
            request.respond(reply).expect("respond");
        }
        captured
    });
    (format!("http://{addr}"), handle)
}

/// Returns the first header value matching `field`, when present.
fn header_value(headers: &[Header], field: &'static str) -> Option<String> {
    headers
        .iter()
        .find(|header| header.field.equiv(field))
        .map(|header| header.value.as_str().to_string())
}

// ============================================================================
// SECTION: Config and Credential Fixtures
// ============================================================================

/// Builds a configuration pointed at the mock server.
pub fn test_config(base_url: &str) -> CheckbinConfig {
    let mut config = CheckbinConfig::default();
    config.endpoint.base_url = base_url.to_string();
    config.endpoint.connect_timeout_ms = 500;
    config.endpoint.request_timeout_ms = 2_000;
    config
}

/// Builds validated test credentials.
pub fn test_credentials() -> Credentials {
    Credentials::new("test-token").expect("credentials")
}

// ============================================================================
// SECTION: Submission Fixtures
// ============================================================================

/// Builds a submission with one checkpoint and one state entry.
pub fn sample_submission() -> BinSubmission {
    let mut checkin = CheckinRecord::open(CheckinLabel::new("test"), Timestamp::Logical(1));
    checkin.state.push(StateEntry {
        key: StateKey::new("generation"),
        value: json!("this is a sample generation"),
    });
    let mut input_state = BTreeMap::new();
    input_state.insert(StateKey::new("company_id"), json!("123"));
    BinSubmission {
        app_key: AppKey::new("testing_dedup"),
        run_id: RunId::new("run-1"),
        run_name: RunName::new("123_919_abc123"),
        bin_id: BinId::new("bin-1"),
        seed: BinSeed::new(input_state, BTreeMap::new()),
        checkins: vec![checkin],
        submitted_at: Timestamp::Logical(2),
    }
}

// ============================================================================
// SECTION: Shared Buffer
// ============================================================================

/// Thread-safe byte buffer usable as a recorder writer.
#[derive(Clone)]
pub struct SharedBuffer {
    /// Shared underlying storage.
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates a new empty shared buffer.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the contents as a string.
    pub fn to_string_lossy(&self) -> String {
        let guard = self.inner.lock().expect("buffer lock");
        String::from_utf8_lossy(&guard).to_string()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        let guard = self.inner.lock().expect("buffer lock");
        guard.is_empty()
    }
}

impl Default for SharedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Failing Writer for Error Testing
// ============================================================================

/// A writer that always fails, for testing error paths.
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("simulated write failure"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
