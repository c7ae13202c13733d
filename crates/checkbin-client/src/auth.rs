// crates/checkbin-client/src/auth.rs
// ============================================================================
// Module: Checkbin Authentication
// Description: Bearer-style credential handling for the Checkbin client.
// Purpose: Validate token shape once and render authorization headers.
// Dependencies: checkbin-config, thiserror
// ============================================================================

//! ## Overview
//! Credentials wrap a bearer-style token string. Validation happens once at
//! construction so every later header render is infallible. Tokens are
//! redacted from `Debug` output and never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use checkbin_config::CheckbinConfig;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted token length in bytes.
pub const MAX_TOKEN_LENGTH: usize = 512;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Credential validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling and tests.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token was empty.
    #[error("token must not be empty")]
    Empty,
    /// Token exceeded the maximum length.
    #[error("token exceeds length limit ({actual} > {limit})")]
    TooLong {
        /// Actual token length in bytes.
        actual: usize,
        /// Maximum accepted length in bytes.
        limit: usize,
    },
    /// Token contained a non-printable or whitespace character.
    #[error("token must be printable ascii without whitespace")]
    InvalidCharacter,
    /// No token was available from the environment or configuration.
    #[error("no token configured (set {0})")]
    Missing(&'static str),
}

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Bearer-style credentials for the remote backend.
///
/// # Invariants
/// - The wrapped token is header-safe: non-empty printable ASCII, no
///   whitespace, at most [`MAX_TOKEN_LENGTH`] bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Validated bearer token.
    token: String,
}

impl Credentials {
    /// Creates credentials from a bearer-style token string.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the token is empty, too long, or contains
    /// characters that cannot appear in an authorization header.
    pub fn new(token: impl Into<String>) -> Result<Self, AuthError> {
        let token = token.into();
        if token.is_empty() {
            return Err(AuthError::Empty);
        }
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(AuthError::TooLong {
                actual: token.len(),
                limit: MAX_TOKEN_LENGTH,
            });
        }
        if !token.chars().all(|c| c.is_ascii_graphic()) {
            return Err(AuthError::InvalidCharacter);
        }
        Ok(Self {
            token,
        })
    }

    /// Creates credentials from the `CHECKBIN_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the variable is unset or the token shape is
    /// invalid.
    pub fn from_env() -> Result<Self, AuthError> {
        let token = std::env::var(checkbin_config::config::TOKEN_ENV_VAR)
            .map_err(|_| AuthError::Missing(checkbin_config::config::TOKEN_ENV_VAR))?;
        Self::new(token)
    }

    /// Creates credentials from the effective configuration token.
    ///
    /// The `CHECKBIN_TOKEN` environment variable takes precedence over the
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when no token is available or the token shape is
    /// invalid.
    pub fn from_config(config: &CheckbinConfig) -> Result<Self, AuthError> {
        let token = config
            .effective_token()
            .ok_or(AuthError::Missing(checkbin_config::config::TOKEN_ENV_VAR))?;
        Self::new(token)
    }

    /// Renders the `Authorization` header value.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("token", &"<redacted>").finish()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_accept_header_safe_token() {
        let credentials = Credentials::new("eyJhbGciOiJIUzI1NiJ9.payload.sig");
        assert!(credentials.is_ok());
    }

    #[test]
    fn credentials_reject_empty_token() {
        let err = Credentials::new("").unwrap_err();
        assert!(matches!(err, AuthError::Empty));
    }

    #[test]
    fn credentials_reject_whitespace() {
        let err = Credentials::new("abc def").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCharacter));
    }

    #[test]
    fn credentials_reject_oversized_token() {
        let err = Credentials::new("a".repeat(MAX_TOKEN_LENGTH + 1)).unwrap_err();
        assert!(matches!(err, AuthError::TooLong { .. }));
    }

    #[test]
    fn authorization_value_uses_bearer_scheme() {
        let credentials = Credentials::new("token123").expect("credentials");
        assert_eq!(credentials.authorization_value(), "Bearer token123");
    }

    #[test]
    fn debug_redacts_token() {
        let credentials = Credentials::new("secret-token").expect("credentials");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("secret-token"));
    }
}
