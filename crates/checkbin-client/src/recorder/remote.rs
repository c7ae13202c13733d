// crates/checkbin-client/src/recorder/remote.rs
// ============================================================================
// Module: Checkbin Remote Recorder
// Description: HTTP recorder delivering submissions to the remote service.
// Purpose: Post finished submissions and return service-assigned receipts.
// Dependencies: checkbin-core, crate::transport, serde
// ============================================================================

//! ## Overview
//! `RemoteRecorder` posts each submission to
//! `POST /v1/bins/{bin_id}/submissions` and builds the receipt from the
//! service-assigned submission identifier. Delivery failures surface as
//! [`RecorderError::SubmitFailed`]; no receipt is minted on failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use checkbin_core::BinSubmission;
use checkbin_core::Recorder;
use checkbin_core::RecorderError;
use checkbin_core::SubmissionId;
use checkbin_core::SubmissionReceipt;
use serde::Deserialize;

use crate::clock;
use crate::transport::HttpTransport;

// ============================================================================
// SECTION: Wire Structures
// ============================================================================

/// `POST /v1/bins/{id}/submissions` response payload.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    /// Identifier assigned to the accepted submission.
    submission_id: SubmissionId,
}

// ============================================================================
// SECTION: Remote Recorder
// ============================================================================

/// HTTP-backed submission recorder.
///
/// # Invariants
/// - Receipts carry the service-assigned submission identifier.
pub struct RemoteRecorder {
    /// Shared transport for service calls.
    transport: Arc<HttpTransport>,
}

impl RemoteRecorder {
    /// Creates a remote recorder over a shared transport.
    #[must_use]
    pub const fn new(transport: Arc<HttpTransport>) -> Self {
        Self {
            transport,
        }
    }
}

impl Recorder for RemoteRecorder {
    fn record(&self, submission: &BinSubmission) -> Result<SubmissionReceipt, RecorderError> {
        let path = format!("v1/bins/{}/submissions", submission.bin_id);
        let response: SubmitResponse = self
            .transport
            .post_json(&path, submission)
            .map_err(|err| RecorderError::SubmitFailed(err.to_string()))?;
        Ok(SubmissionReceipt {
            submission_id: response.submission_id,
            recorder: "remote".to_string(),
            recorded_at: clock::now(),
        })
    }
}
