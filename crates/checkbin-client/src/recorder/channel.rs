// crates/checkbin-client/src/recorder/channel.rs
// ============================================================================
// Module: Checkbin Channel Recorder
// Description: Channel-based recorder for in-process delivery.
// Purpose: Send accepted submissions through an mpsc channel for tests.
// Dependencies: checkbin-core, std
// ============================================================================

//! ## Overview
//! [`ChannelRecorder`] delivers submissions by sending recorded messages into
//! a `std::sync::mpsc` channel.
//! Invariants:
//! - Successful deliveries enqueue exactly one [`RecordedSubmission`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::mpsc::Sender;

use checkbin_core::BinSubmission;
use checkbin_core::Recorder;
use checkbin_core::RecorderError;
use checkbin_core::SubmissionReceipt;

use crate::recorder::ReceiptFactory;

// ============================================================================
// SECTION: Recorded Message
// ============================================================================

/// Message emitted by channel-based recorders.
///
/// # Invariants
/// - `receipt` corresponds to the delivered `submission`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    /// Delivered submission payload.
    pub submission: BinSubmission,
    /// Submission receipt.
    pub receipt: SubmissionReceipt,
}

// ============================================================================
// SECTION: Channel Recorder
// ============================================================================

/// Channel-based submission recorder.
///
/// # Invariants
/// - Each successful delivery emits a message with a matching receipt.
#[derive(Debug)]
pub struct ChannelRecorder {
    /// Sender used to deliver recorded submissions.
    sender: Sender<RecordedSubmission>,
    /// Receipt factory for deterministic submission IDs.
    receipts: ReceiptFactory,
}

impl ChannelRecorder {
    /// Creates a channel recorder with the default recorder name.
    #[must_use]
    pub fn new(sender: Sender<RecordedSubmission>) -> Self {
        Self {
            sender,
            receipts: ReceiptFactory::new("channel"),
        }
    }

    /// Creates a channel recorder with a custom recorder name.
    #[must_use]
    pub fn with_name(sender: Sender<RecordedSubmission>, recorder: impl Into<String>) -> Self {
        Self {
            sender,
            receipts: ReceiptFactory::new(recorder),
        }
    }
}

impl Recorder for ChannelRecorder {
    fn record(&self, submission: &BinSubmission) -> Result<SubmissionReceipt, RecorderError> {
        let receipt = self.receipts.next();
        let message = RecordedSubmission {
            submission: submission.clone(),
            receipt: receipt.clone(),
        };
        self.sender.send(message).map_err(|err| RecorderError::SubmitFailed(err.to_string()))?;
        Ok(receipt)
    }
}
