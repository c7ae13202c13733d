// crates/checkbin-client/src/recorder/mod.rs
// ============================================================================
// Module: Checkbin Recorders
// Description: Recorder implementations for remote, local, and test delivery.
// Purpose: Deliver finished submissions and mint receipts.
// Dependencies: checkbin-core, serde_json, std
// ============================================================================

//! ## Overview
//! Recorders implement [`checkbin_core::Recorder`] for the three delivery
//! backends: the remote service, local JSONL run records, and in-process
//! channels for tests. Receipts are returned only after successful delivery.
//! Invariants:
//! - Delivery failures must not emit partial side effects.
//! - Locally minted receipt identifiers are deterministic per recorder.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use checkbin_core::SubmissionId;
use checkbin_core::SubmissionReceipt;
use checkbin_core::Timestamp;

// ============================================================================
// SECTION: Receipt Helpers
// ============================================================================

/// Builds deterministic submission receipts for local recorders.
#[derive(Debug)]
pub(crate) struct ReceiptFactory {
    /// Recorder name embedded in receipts.
    recorder: String,
    /// Monotonic counter used for deterministic IDs.
    counter: AtomicU64,
}

impl ReceiptFactory {
    /// Creates a receipt factory with the provided recorder name.
    pub(crate) fn new(recorder: impl Into<String>) -> Self {
        Self {
            recorder: recorder.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Returns the next deterministic receipt.
    pub(crate) fn next(&self) -> SubmissionReceipt {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        SubmissionReceipt {
            submission_id: SubmissionId::new(format!("{}-{}", self.recorder, seq)),
            recorder: self.recorder.clone(),
            recorded_at: Timestamp::Logical(seq),
        }
    }
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod channel;
pub mod jsonl;
pub mod remote;

pub use channel::ChannelRecorder;
pub use channel::RecordedSubmission;
pub use jsonl::JsonlRecorder;
pub use remote::RemoteRecorder;
