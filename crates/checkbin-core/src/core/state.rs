// crates/checkbin-core/src/core/state.rs
// ============================================================================
// Module: Checkbin Records
// Description: Wire-stable checkin, seed, submission, and receipt records.
// Purpose: Capture recorded bin history for delivery and replay.
// Dependencies: crate::core::{identifiers, time}, serde, serde_json
// ============================================================================

//! ## Overview
//! These records are the payloads shared by the session state machine, the
//! recorders, and the remote transport. All map-shaped fields use `BTreeMap`
//! so serialized submissions are deterministic.
//!
//! Security posture: submissions may carry caller-controlled values; recorders
//! must treat them as opaque and never interpret state contents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::AppKey;
use crate::core::identifiers::BinId;
use crate::core::identifiers::CheckinLabel;
use crate::core::identifiers::RunId;
use crate::core::identifiers::RunName;
use crate::core::identifiers::StateKey;
use crate::core::identifiers::SubmissionId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: State Entries
// ============================================================================

/// One recorded state value inside a checkpoint.
///
/// # Invariants
/// - `key` is unique within its owning checkpoint.
/// - `value` is opaque JSON and is never interpreted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    /// State entry key.
    pub key: StateKey,
    /// Recorded JSON value.
    pub value: Value,
}

/// Reference to an externally stored file.
///
/// # Invariants
/// - `uri` is opaque; the core performs no scheme validation or fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Location of the file contents.
    pub uri: String,
    /// Optional media type hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl FileRef {
    /// Creates a file reference with no media type hint.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            media_type: None,
        }
    }

    /// Creates a file reference with a media type hint.
    #[must_use]
    pub fn with_media_type(uri: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            media_type: Some(media_type.into()),
        }
    }
}

// ============================================================================
// SECTION: Checkin Records
// ============================================================================

/// One completed checkpoint recorded inside a bin.
///
/// # Invariants
/// - `state` preserves insertion order; keys are unique.
/// - `recorded_at` is the time the checkpoint was opened, supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinRecord {
    /// Checkpoint label.
    pub label: CheckinLabel,
    /// State entries recorded on this checkpoint.
    pub state: Vec<StateEntry>,
    /// File references recorded on this checkpoint.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<StateKey, FileRef>,
    /// Time the checkpoint was opened.
    pub recorded_at: Timestamp,
}

impl CheckinRecord {
    /// Creates an empty checkpoint with the provided label and open time.
    #[must_use]
    pub fn open(label: CheckinLabel, recorded_at: Timestamp) -> Self {
        Self {
            label,
            state: Vec::new(),
            files: BTreeMap::new(),
            recorded_at,
        }
    }

    /// Returns whether the checkpoint carries a state entry for `key`.
    #[must_use]
    pub fn has_state_key(&self, key: &StateKey) -> bool {
        self.state.iter().any(|entry| &entry.key == key)
    }
}

// ============================================================================
// SECTION: Bin Seed
// ============================================================================

/// Inputs a bin is acquired with.
///
/// # Invariants
/// - Maps are deterministic (`BTreeMap`); values are opaque to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinSeed {
    /// Input state mapping recorded at bin acquisition.
    #[serde(default)]
    pub input_state: BTreeMap<StateKey, Value>,
    /// Input file references recorded at bin acquisition.
    #[serde(default)]
    pub input_files: BTreeMap<StateKey, FileRef>,
}

impl BinSeed {
    /// Creates a seed from input state and input files.
    #[must_use]
    pub const fn new(
        input_state: BTreeMap<StateKey, Value>,
        input_files: BTreeMap<StateKey, FileRef>,
    ) -> Self {
        Self {
            input_state,
            input_files,
        }
    }

    /// Returns whether the seed carries no inputs at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input_state.is_empty() && self.input_files.is_empty()
    }
}

// ============================================================================
// SECTION: Submissions
// ============================================================================

/// Full payload delivered when a bin is submitted.
///
/// # Invariants
/// - `checkins` is non-empty and preserves recording order.
/// - The payload is immutable once built by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinSubmission {
    /// Application key the run belongs to.
    pub app_key: AppKey,
    /// Run identifier the bin belongs to.
    pub run_id: RunId,
    /// Caller-chosen run name.
    pub run_name: RunName,
    /// Bin identifier.
    pub bin_id: BinId,
    /// Inputs the bin was acquired with.
    pub seed: BinSeed,
    /// Recorded checkpoints in recording order.
    pub checkins: Vec<CheckinRecord>,
    /// Time the submission was finalized, supplied by the host.
    pub submitted_at: Timestamp,
}

/// Proof of delivery returned by a recorder.
///
/// # Invariants
/// - Receipts are produced only after successful delivery.
/// - `recorder` names the backend that accepted the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Identifier assigned to the accepted submission.
    pub submission_id: SubmissionId,
    /// Name of the recorder that accepted the submission.
    pub recorder: String,
    /// Time the recorder accepted the submission.
    pub recorded_at: Timestamp,
}
