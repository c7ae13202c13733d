// crates/checkbin-client/src/backend.rs
// ============================================================================
// Module: Checkbin Backends
// Description: Remote and local provisioner implementations.
// Purpose: Assign run and bin identifiers over HTTP or locally via UUIDs.
// Dependencies: checkbin-core, crate::transport, serde, uuid
// ============================================================================

//! ## Overview
//! `RemoteProvisioner` speaks the client's wire contract over
//! [`HttpTransport`]: `POST /v1/runs` opens a run, `POST /v1/runs/{id}/bins`
//! opens a bin. `LocalProvisioner` assigns UUID-derived identifiers with no
//! network I/O for local-mode recording.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use checkbin_core::AppKey;
use checkbin_core::BinId;
use checkbin_core::BinSeed;
use checkbin_core::ProvisionError;
use checkbin_core::Provisioner;
use checkbin_core::RunId;
use checkbin_core::RunName;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::transport::HttpTransport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Hex length of locally assigned identifiers.
const LOCAL_ID_LENGTH: usize = 12;

// ============================================================================
// SECTION: Wire Structures
// ============================================================================

/// `POST /v1/runs` request payload.
#[derive(Debug, Serialize)]
struct OpenRunRequest<'a> {
    /// Application key the run belongs to.
    app_key: &'a AppKey,
    /// Caller-chosen run name.
    run_name: &'a RunName,
}

/// `POST /v1/runs` response payload.
#[derive(Debug, Deserialize)]
struct OpenRunResponse {
    /// Assigned run identifier.
    run_id: RunId,
}

/// `POST /v1/runs/{id}/bins` response payload.
#[derive(Debug, Deserialize)]
struct OpenBinResponse {
    /// Assigned bin identifier.
    bin_id: BinId,
}

// ============================================================================
// SECTION: Remote Provisioner
// ============================================================================

/// HTTP-backed provisioner.
///
/// # Invariants
/// - Identifiers are assigned by the service; none are fabricated locally.
pub struct RemoteProvisioner {
    /// Shared transport for service calls.
    transport: Arc<HttpTransport>,
}

impl RemoteProvisioner {
    /// Creates a remote provisioner over a shared transport.
    #[must_use]
    pub const fn new(transport: Arc<HttpTransport>) -> Self {
        Self {
            transport,
        }
    }
}

impl Provisioner for RemoteProvisioner {
    fn open_run(&self, app_key: &AppKey, run_name: &RunName) -> Result<RunId, ProvisionError> {
        let request = OpenRunRequest {
            app_key,
            run_name,
        };
        let response: OpenRunResponse =
            self.transport.post_json("v1/runs", &request).map_err(provision_error)?;
        Ok(response.run_id)
    }

    fn open_bin(&self, run_id: &RunId, seed: &BinSeed) -> Result<BinId, ProvisionError> {
        let path = format!("v1/runs/{run_id}/bins");
        let response: OpenBinResponse =
            self.transport.post_json(&path, seed).map_err(provision_error)?;
        Ok(response.bin_id)
    }
}

// ============================================================================
// SECTION: Local Provisioner
// ============================================================================

/// UUID-backed provisioner for local-mode recording.
///
/// # Invariants
/// - Performs no network I/O.
/// - Assigned identifiers are unique per process run with overwhelming
///   probability (v4 UUID prefixes).
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalProvisioner;

impl LocalProvisioner {
    /// Creates a local provisioner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Assigns a fresh local identifier with the given prefix.
    fn assign(prefix: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let suffix: String = id.chars().take(LOCAL_ID_LENGTH).collect();
        format!("{prefix}-{suffix}")
    }
}

impl Provisioner for LocalProvisioner {
    fn open_run(&self, _app_key: &AppKey, _run_name: &RunName) -> Result<RunId, ProvisionError> {
        Ok(RunId::new(Self::assign("run")))
    }

    fn open_bin(&self, _run_id: &RunId, _seed: &BinSeed) -> Result<BinId, ProvisionError> {
        Ok(BinId::new(Self::assign("bin")))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps transport failures onto provisioner error variants.
fn provision_error(err: TransportError) -> ProvisionError {
    match err {
        TransportError::Json(message) | TransportError::Protocol(message) => {
            ProvisionError::Protocol(message)
        }
        other => ProvisionError::Transport(other.to_string()),
    }
}
