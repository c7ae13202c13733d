// crates/checkbin-client/src/recorder/jsonl.rs
// ============================================================================
// Module: Checkbin JSONL Recorder
// Description: Append-only JSONL recorder for local-mode run records.
// Purpose: Persist submissions as replayable audit lines without a network.
// Dependencies: checkbin-core, serde_json, std
// ============================================================================

//! ## Overview
//! `JsonlRecorder` writes one JSON line per accepted submission and returns a
//! deterministic receipt. The line carries the receipt fields plus the full
//! submission so a local run can be replayed or inspected later. This is the
//! client's structured logging surface; no log framework is involved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use checkbin_core::BinSubmission;
use checkbin_core::Recorder;
use checkbin_core::RecorderError;
use checkbin_core::SubmissionReceipt;
use serde_json::json;

use crate::recorder::ReceiptFactory;

// ============================================================================
// SECTION: JSONL Recorder
// ============================================================================

/// Append-only JSONL submission recorder.
pub struct JsonlRecorder<W: Write + Send> {
    /// Output writer for submission records.
    writer: Mutex<W>,
    /// Receipt factory for deterministic submission IDs.
    receipts: ReceiptFactory,
}

impl<W: Write + Send> JsonlRecorder<W> {
    /// Creates a JSONL recorder with the default recorder name.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            receipts: ReceiptFactory::new("jsonl"),
        }
    }

    /// Creates a JSONL recorder with a custom recorder name.
    pub fn with_name(writer: W, recorder: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            receipts: ReceiptFactory::new(recorder),
        }
    }
}

impl<W: Write + Send> Recorder for JsonlRecorder<W> {
    fn record(&self, submission: &BinSubmission) -> Result<SubmissionReceipt, RecorderError> {
        let receipt = self.receipts.next();
        let record = json!({
            "submission_id": receipt.submission_id,
            "recorder": receipt.recorder,
            "recorded_at": receipt.recorded_at,
            "run_id": submission.run_id,
            "bin_id": submission.bin_id,
            "checkin_count": submission.checkins.len(),
            "submission": submission,
        });
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| RecorderError::LogWriteFailed("log writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, &record)
            .map_err(|err| RecorderError::LogWriteFailed(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| RecorderError::LogWriteFailed(err.to_string()))?;
        drop(guard);
        Ok(receipt)
    }
}
