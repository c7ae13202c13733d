// crates/checkbin-config/src/config.rs
// ============================================================================
// Module: Checkbin Configuration
// Description: Configuration loading and validation for the Checkbin client.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: checkbin-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! A file is optional; defaults are valid on their own. Invalid configuration
//! fails closed. The `CHECKBIN_TOKEN` environment variable overrides any
//! token carried in the file so credentials can stay out of checked-in
//! configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use checkbin_core::SessionLimits;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "checkbin.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CHECKBIN_CONFIG";
/// Environment variable overriding the configured bearer token.
pub const TOKEN_ENV_VAR: &str = "CHECKBIN_TOKEN";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a bearer token.
pub(crate) const MAX_TOKEN_LENGTH: usize = 512;
/// Default endpoint base URL.
const DEFAULT_BASE_URL: &str = "https://api.checkbin.io";
/// Default connect timeout in milliseconds.
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1_000;
/// Default request timeout in milliseconds.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Minimum allowed connect timeout in milliseconds.
pub(crate) const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum allowed connect timeout in milliseconds.
pub(crate) const MAX_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Minimum allowed request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum allowed request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 60_000;
/// Default maximum response body size in bytes.
const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Maximum allowed response body cap in bytes.
pub(crate) const MAX_RESPONSE_BYTES_LIMIT: usize = 8 * 1024 * 1024;
/// Maximum allowed checkins per bin.
pub(crate) const MAX_CHECKINS_LIMIT: usize = 4_096;
/// Maximum allowed state entries per checkin.
pub(crate) const MAX_STATE_ENTRIES_LIMIT: usize = 65_536;
/// Maximum allowed serialized state value size in bytes.
pub(crate) const MAX_STATE_VALUE_BYTES_LIMIT: usize = 4 * 1024 * 1024;
/// Maximum allowed identifier length in characters.
pub(crate) const MAX_IDENTIFIER_LENGTH_LIMIT: usize = 1_024;
/// Default directory for local-mode run records.
const DEFAULT_LOCAL_OUTPUT_DIR: &str = "checkbin-runs";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Checkbin client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckbinConfig {
    /// Credential configuration.
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Remote endpoint configuration.
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Hard limits applied to sessions and transports.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Local-mode recording configuration.
    #[serde(default)]
    pub local: LocalConfig,
}

impl CheckbinConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then the `CHECKBIN_CONFIG`
    /// environment variable, then `./checkbin.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.credentials.validate()?;
        self.endpoint.validate()?;
        self.limits.validate()?;
        self.local.validate()?;
        Ok(())
    }

    /// Returns the effective bearer token.
    ///
    /// The `CHECKBIN_TOKEN` environment variable takes precedence over any
    /// token carried in the configuration file.
    #[must_use]
    pub fn effective_token(&self) -> Option<String> {
        if let Ok(token) = env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                return Some(token);
            }
        }
        self.credentials.token.clone()
    }

    /// Returns the session limits derived from this configuration.
    #[must_use]
    pub const fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_checkins: self.limits.max_checkins,
            max_state_entries: self.limits.max_state_entries,
            max_state_value_bytes: self.limits.max_state_value_bytes,
            max_identifier_length: self.limits.max_identifier_length,
        }
    }
}

/// Credential configuration.
///
/// # Invariants
/// - `token`, when present, is header-shaped: printable ASCII without spaces.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    /// Optional bearer token; `CHECKBIN_TOKEN` overrides it.
    #[serde(default)]
    pub token: Option<String>,
}

impl CredentialsConfig {
    /// Validates credential fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the token is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(token) = &self.token {
            if token.is_empty() {
                return Err(ConfigError::Invalid(
                    "credentials.token must be non-empty when present".to_string(),
                ));
            }
            if token.len() > MAX_TOKEN_LENGTH {
                return Err(ConfigError::Invalid(
                    "credentials.token exceeds max length".to_string(),
                ));
            }
            if !token.chars().all(|c| c.is_ascii_graphic()) {
                return Err(ConfigError::Invalid(
                    "credentials.token must be printable ascii without spaces".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Remote endpoint configuration.
///
/// # Invariants
/// - `base_url` parses as an absolute http or https URL.
/// - Timeouts stay within the documented ranges.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the remote service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl EndpointConfig {
    /// Validates endpoint fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL or timeouts are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("endpoint.base_url invalid: {err}")))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ConfigError::Invalid(format!(
                    "endpoint.base_url scheme must be http or https, got {scheme}"
                )));
            }
        }
        if !(MIN_CONNECT_TIMEOUT_MS..=MAX_CONNECT_TIMEOUT_MS).contains(&self.connect_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "endpoint.connect_timeout_ms must be within {MIN_CONNECT_TIMEOUT_MS}..={MAX_CONNECT_TIMEOUT_MS}"
            )));
        }
        if !(MIN_REQUEST_TIMEOUT_MS..=MAX_REQUEST_TIMEOUT_MS).contains(&self.request_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "endpoint.request_timeout_ms must be within {MIN_REQUEST_TIMEOUT_MS}..={MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Hard limits applied to sessions and transports.
///
/// # Invariants
/// - All limits are >= 1 and stay within the documented caps.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum response body size accepted from the remote service.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Maximum checkins recorded per bin.
    #[serde(default = "default_max_checkins")]
    pub max_checkins: usize,
    /// Maximum state entries per checkin or seed.
    #[serde(default = "default_max_state_entries")]
    pub max_state_entries: usize,
    /// Maximum serialized state value size in bytes.
    #[serde(default = "default_max_state_value_bytes")]
    pub max_state_value_bytes: usize,
    /// Maximum identifier length in characters.
    #[serde(default = "default_max_identifier_length")]
    pub max_identifier_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_response_bytes: default_max_response_bytes(),
            max_checkins: default_max_checkins(),
            max_state_entries: default_max_state_entries(),
            max_state_value_bytes: default_max_state_value_bytes(),
            max_identifier_length: default_max_identifier_length(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a limit is zero or exceeds its cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_range("limits.max_response_bytes", self.max_response_bytes, MAX_RESPONSE_BYTES_LIMIT)?;
        validate_range("limits.max_checkins", self.max_checkins, MAX_CHECKINS_LIMIT)?;
        validate_range("limits.max_state_entries", self.max_state_entries, MAX_STATE_ENTRIES_LIMIT)?;
        validate_range(
            "limits.max_state_value_bytes",
            self.max_state_value_bytes,
            MAX_STATE_VALUE_BYTES_LIMIT,
        )?;
        validate_range(
            "limits.max_identifier_length",
            self.max_identifier_length,
            MAX_IDENTIFIER_LENGTH_LIMIT,
        )?;
        Ok(())
    }
}

/// Local-mode recording configuration.
///
/// # Invariants
/// - `output_dir` is a non-empty path within component and length limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    /// Directory local-mode run records are written to.
    #[serde(default = "default_local_output_dir")]
    pub output_dir: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            output_dir: default_local_output_dir(),
        }
    }
}

impl LocalConfig {
    /// Validates local-mode fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the output directory path is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("local.output_dir", &self.output_dir)
    }

    /// Returns the output directory as a path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(self.output_dir.trim())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling and tests.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default endpoint base URL.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Returns the default connect timeout in milliseconds.
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Returns the default request timeout in milliseconds.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Returns the default response body cap in bytes.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Returns the default checkins-per-bin limit.
const fn default_max_checkins() -> usize {
    checkbin_core::core::session::DEFAULT_MAX_CHECKINS
}

/// Returns the default state-entries-per-checkin limit.
const fn default_max_state_entries() -> usize {
    checkbin_core::core::session::DEFAULT_MAX_STATE_ENTRIES
}

/// Returns the default state value size limit in bytes.
const fn default_max_state_value_bytes() -> usize {
    checkbin_core::core::session::DEFAULT_MAX_STATE_VALUE_BYTES
}

/// Returns the default identifier length limit.
const fn default_max_identifier_length() -> usize {
    checkbin_core::core::session::DEFAULT_MAX_IDENTIFIER_LENGTH
}

/// Returns the default local-mode output directory.
fn default_local_output_dir() -> String {
    DEFAULT_LOCAL_OUTPUT_DIR.to_string()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a limit value against `1..=cap`.
fn validate_range(field: &str, value: usize, cap: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{field} must be >= 1")));
    }
    if value > cap {
        return Err(ConfigError::Invalid(format!("{field} exceeds cap ({value} > {cap})")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
