// crates/checkbin-config/src/lib.rs
// ============================================================================
// Module: Checkbin Config Library
// Description: Configuration model and validation for the Checkbin client.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: checkbin-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Checkbin Config loads client configuration from a TOML file with strict
//! size and range limits. Missing or invalid configuration fails closed; a
//! configuration file is optional and [`config::CheckbinConfig::default`]
//! is always valid.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CheckbinConfig;
pub use config::ConfigError;
pub use config::CredentialsConfig;
pub use config::EndpointConfig;
pub use config::LimitsConfig;
pub use config::LocalConfig;
