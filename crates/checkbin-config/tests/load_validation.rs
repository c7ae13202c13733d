// crates/checkbin-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Tests for config file loading, parsing, and fail-closed limits.
// ============================================================================

//! Configuration loading tests.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

use std::fs;

use checkbin_config::CheckbinConfig;
use checkbin_config::ConfigError;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Writes `content` to a temp config file and loads it.
fn load_from(content: &str) -> Result<CheckbinConfig, ConfigError> {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("checkbin.toml");
    fs::write(&path, content).expect("write config");
    CheckbinConfig::load(Some(&path))
}

// ============================================================================
// SECTION: Success Path Tests
// ============================================================================

#[test]
fn load_accepts_empty_file_as_defaults() {
    let config = load_from("").expect("load");
    assert_eq!(config.endpoint.base_url, "https://api.checkbin.io");
    assert_eq!(config.endpoint.connect_timeout_ms, 1_000);
    assert_eq!(config.endpoint.request_timeout_ms, 10_000);
    assert_eq!(config.local.output_dir, "checkbin-runs");
    assert!(config.credentials.token.is_none());
}

#[test]
fn load_accepts_full_configuration() {
    let config = load_from(
        r#"
[credentials]
token = "file-token"

[endpoint]
base_url = "http://127.0.0.1:9000"
connect_timeout_ms = 250
request_timeout_ms = 2000

[limits]
max_response_bytes = 4096
max_checkins = 8
max_state_entries = 16
max_state_value_bytes = 1024
max_identifier_length = 64

[local]
output_dir = "records/runs"
"#,
    )
    .expect("load");

    assert_eq!(config.credentials.token.as_deref(), Some("file-token"));
    assert_eq!(config.endpoint.base_url, "http://127.0.0.1:9000");
    assert_eq!(config.limits.max_response_bytes, 4096);
    assert_eq!(config.limits.max_checkins, 8);
    assert_eq!(config.local.output_dir, "records/runs");
}

#[test]
fn session_limits_reflect_configured_values() {
    let config = load_from(
        r#"
[limits]
max_checkins = 3
max_state_entries = 5
max_state_value_bytes = 512
max_identifier_length = 32
"#,
    )
    .expect("load");

    let limits = config.session_limits();
    assert_eq!(limits.max_checkins, 3);
    assert_eq!(limits.max_state_entries, 5);
    assert_eq!(limits.max_state_value_bytes, 512);
    assert_eq!(limits.max_identifier_length, 32);
}

// ============================================================================
// SECTION: Error Path Tests
// ============================================================================

#[test]
fn load_fails_when_file_is_missing() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.toml");
    let err = CheckbinConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn load_rejects_malformed_toml() {
    let err = load_from("[endpoint\nbase_url = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_rejects_non_utf8_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("checkbin.toml");
    fs::write(&path, [0xFF, 0xFE, 0x00]).expect("write config");
    let err = CheckbinConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("utf-8"));
}

#[test]
fn load_rejects_unsupported_scheme() {
    let err = load_from(
        r#"
[endpoint]
base_url = "ftp://example.com"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("scheme"));
}

#[test]
fn load_rejects_unparseable_base_url() {
    let err = load_from(
        r#"
[endpoint]
base_url = "not a url"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn load_rejects_connect_timeout_out_of_range() {
    let err = load_from(
        r#"
[endpoint]
connect_timeout_ms = 50
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("connect_timeout_ms"));
}

#[test]
fn load_rejects_request_timeout_out_of_range() {
    let err = load_from(
        r#"
[endpoint]
request_timeout_ms = 600000
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("request_timeout_ms"));
}

#[test]
fn load_rejects_zero_limit() {
    let err = load_from(
        r#"
[limits]
max_checkins = 0
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("max_checkins"));
}

#[test]
fn load_rejects_limit_above_cap() {
    let err = load_from(
        r#"
[limits]
max_response_bytes = 999999999
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("max_response_bytes"));
}

#[test]
fn load_rejects_empty_token() {
    let err = load_from(
        r#"
[credentials]
token = ""
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("token"));
}

#[test]
fn load_rejects_token_with_whitespace() {
    let err = load_from(
        r#"
[credentials]
token = "abc def"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("printable ascii"));
}

#[test]
fn load_rejects_empty_output_dir() {
    let err = load_from(
        r#"
[local]
output_dir = "  "
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("output_dir"));
}

// ============================================================================
// SECTION: Token Resolution Tests
// ============================================================================

#[test]
fn effective_token_uses_file_token_when_env_is_absent() {
    let config = load_from(
        r#"
[credentials]
token = "file-token"
"#,
    )
    .expect("load");
    // CHECKBIN_TOKEN is not set in the test environment.
    assert_eq!(config.effective_token().as_deref(), Some("file-token"));
}

#[test]
fn effective_token_is_none_without_any_source() {
    let config = CheckbinConfig::default();
    assert!(config.effective_token().is_none());
}
