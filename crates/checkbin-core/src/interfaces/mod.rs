// crates/checkbin-core/src/interfaces/mod.rs
// ============================================================================
// Module: Checkbin Interfaces
// Description: Backend-agnostic interfaces for provisioning and delivery.
// Purpose: Define the contract surfaces implemented by client backends.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the Checkbin client integrates with backends without
//! embedding transport details. Implementations must fail closed on missing
//! or invalid data and must not emit partial side effects on failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::AppKey;
use crate::core::identifiers::BinId;
use crate::core::identifiers::RunId;
use crate::core::identifiers::RunName;
use crate::core::state::BinSeed;
use crate::core::state::BinSubmission;
use crate::core::state::SubmissionReceipt;

// ============================================================================
// SECTION: Provisioner
// ============================================================================

/// Errors emitted by provisioners.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - String payloads may include untrusted backend text.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Transport-level failure reaching the backend.
    #[error("provisioner transport error: {0}")]
    Transport(String),
    /// Backend response violated the expected contract.
    #[error("provisioner protocol error: {0}")]
    Protocol(String),
}

/// Assigns run and bin identifiers for a backend.
pub trait Provisioner: Send + Sync {
    /// Opens a run scoped to `app_key` under the caller-chosen `run_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the backend rejects the run or cannot
    /// be reached.
    fn open_run(&self, app_key: &AppKey, run_name: &RunName) -> Result<RunId, ProvisionError>;

    /// Opens a bin within `run_id`, recording the seed inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the backend rejects the bin or cannot
    /// be reached.
    fn open_bin(&self, run_id: &RunId, seed: &BinSeed) -> Result<BinId, ProvisionError>;
}

// ============================================================================
// SECTION: Recorder
// ============================================================================

/// Errors emitted by submission recorders.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Submission delivery failed.
    #[error("submission delivery failed: {0}")]
    SubmitFailed(String),
    /// Local submission log failed to write.
    #[error("submission log write failed: {0}")]
    LogWriteFailed(String),
}

/// Delivers finished submissions to a backend.
pub trait Recorder: Send + Sync {
    /// Delivers the submission and returns a receipt.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when delivery fails. Receipts are returned
    /// only on successful delivery.
    fn record(&self, submission: &BinSubmission) -> Result<SubmissionReceipt, RecorderError>;
}
