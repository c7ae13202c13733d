// crates/checkbin-client/src/transport.rs
// ============================================================================
// Module: Checkbin HTTP Transport
// Description: Bearer-authenticated JSON transport for the remote backend.
// Purpose: Issue size-capped, fail-closed POST requests to the service.
// Dependencies: reqwest, serde, url
// ============================================================================

//! ## Overview
//! `HttpTransport` carries every remote request: JSON bodies, a bearer
//! `Authorization` header, disabled redirects, and a hard response-size cap.
//! Non-success statuses fail closed with a body preview.
//!
//! Security posture: server responses are untrusted; apply size limits, fail
//! closed on parsing errors, and never log tokens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use checkbin_config::EndpointConfig;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::auth::Credentials;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transport errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling and tests.
/// - String payloads are user-facing and may include untrusted server text.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Configuration error.
    #[error("transport config error: {0}")]
    Config(String),
    /// HTTP-level error.
    #[error("transport http error: {0}")]
    Http(String),
    /// JSON serialization error.
    #[error("transport json error: {0}")]
    Json(String),
    /// Response violated the expected contract.
    #[error("transport protocol error: {0}")]
    Protocol(String),
    /// Response size exceeds limits.
    #[error("response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Actual size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Bearer-authenticated JSON transport.
///
/// # Invariants
/// - Every request carries the bearer header built from validated credentials.
/// - Responses are read under `max_response_bytes`; larger bodies fail closed.
#[derive(Debug)]
pub struct HttpTransport {
    /// Reqwest client instance.
    client: Client,
    /// Base endpoint URL.
    base_url: Url,
    /// Validated bearer credentials.
    credentials: Credentials,
    /// Maximum response body size accepted from the service.
    max_response_bytes: usize,
}

impl HttpTransport {
    /// Builds a transport from endpoint configuration and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the base URL is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(
        endpoint: &EndpointConfig,
        credentials: Credentials,
        max_response_bytes: usize,
    ) -> Result<Self, TransportError> {
        let base_url = Url::parse(&endpoint.base_url)
            .map_err(|err| TransportError::Config(format!("invalid base url: {err}")))?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(TransportError::Config(format!("unsupported scheme: {scheme}")));
            }
        }
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(endpoint.connect_timeout_ms))
            .timeout(Duration::from_millis(endpoint.request_timeout_ms))
            .redirect(Policy::none())
            .build()
            .map_err(|err| TransportError::Config(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            credentials,
            max_response_bytes,
        })
    }

    /// Posts a JSON body to `path` and decodes a typed JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request fails, the status is not
    /// successful, the body exceeds the size cap, or decoding fails.
    pub fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| TransportError::Config(format!("invalid request path: {err}")))?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| TransportError::Json(format!("request serialization failed: {err}")))?;
        let headers = self.headers()?;
        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(payload)
            .send()
            .map_err(|err| TransportError::Http(err.to_string()))?;
        let status = response.status();
        let body = read_body_with_limit(response, self.max_response_bytes)?;
        if !status.is_success() {
            let preview = String::from_utf8_lossy(&body);
            return Err(TransportError::Http(format!(
                "http status {}: {}",
                status.as_u16(),
                preview.trim()
            )));
        }
        serde_json::from_slice(&body)
            .map_err(|err| TransportError::Protocol(format!("invalid response body: {err}")))
    }

    /// Builds request headers for one request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the authorization value is invalid.
    fn headers(&self) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let value = self.credentials.authorization_value();
        let header = HeaderValue::from_str(&value)
            .map_err(|_| TransportError::Config("invalid bearer token header".to_string()))?;
        headers.insert(AUTHORIZATION, header);
        Ok(headers)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a response body while enforcing a hard byte limit.
fn read_body_with_limit(
    response: reqwest::blocking::Response,
    limit: usize,
) -> Result<Vec<u8>, TransportError> {
    if let Some(length) = response.content_length() {
        let declared = usize::try_from(length).unwrap_or(usize::MAX);
        if declared > limit {
            return Err(TransportError::ResponseTooLarge {
                actual: declared,
                limit,
            });
        }
    }
    let mut limited = response.take((limit + 1) as u64);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(|err| TransportError::Http(err.to_string()))?;
    if bytes.len() > limit {
        return Err(TransportError::ResponseTooLarge {
            actual: bytes.len(),
            limit,
        });
    }
    Ok(bytes)
}
