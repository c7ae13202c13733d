// crates/checkbin-core/src/core/session.rs
// ============================================================================
// Module: Checkbin Bin Session
// Description: State machine accumulating checkpoints for one bin.
// Purpose: Enforce checkin ordering, limits, and single-shot submission.
// Dependencies: crate::core::{identifiers, state, time}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`BinSession`] records the local history of one bin: the seed it was
//! acquired with and an ordered list of checkpoints. State and file entries
//! attach to the most recently opened checkpoint. `finish` closes the session
//! exactly once and yields the immutable [`BinSubmission`] payload.
//! Invariants:
//! - Mutations fail closed after `finish`.
//! - `add_state`/`add_file` require an open checkpoint.
//! - All limits are enforced at the mutating call, never at delivery time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::AppKey;
use crate::core::identifiers::BinId;
use crate::core::identifiers::CheckinLabel;
use crate::core::identifiers::RunId;
use crate::core::identifiers::RunName;
use crate::core::identifiers::StateKey;
use crate::core::state::BinSeed;
use crate::core::state::BinSubmission;
use crate::core::state::CheckinRecord;
use crate::core::state::FileRef;
use crate::core::state::StateEntry;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Session Limits
// ============================================================================

/// Default maximum number of checkpoints per bin.
pub const DEFAULT_MAX_CHECKINS: usize = 256;
/// Default maximum number of state entries per checkpoint or seed.
pub const DEFAULT_MAX_STATE_ENTRIES: usize = 1024;
/// Default maximum serialized size of one state value in bytes.
pub const DEFAULT_MAX_STATE_VALUE_BYTES: usize = 256 * 1024;
/// Default maximum length of keys, labels, and names in characters.
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 128;

/// Hard limits enforced by a bin session.
///
/// # Invariants
/// - All limits are >= 1; zero limits are rejected by config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLimits {
    /// Maximum number of checkpoints per bin.
    pub max_checkins: usize,
    /// Maximum number of state entries per checkpoint or seed.
    pub max_state_entries: usize,
    /// Maximum serialized size of one state value in bytes.
    pub max_state_value_bytes: usize,
    /// Maximum length of keys, labels, and names in characters.
    pub max_identifier_length: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_checkins: DEFAULT_MAX_CHECKINS,
            max_state_entries: DEFAULT_MAX_STATE_ENTRIES,
            max_state_value_bytes: DEFAULT_MAX_STATE_VALUE_BYTES,
            max_identifier_length: DEFAULT_MAX_IDENTIFIER_LENGTH,
        }
    }
}

// ============================================================================
// SECTION: Session Errors
// ============================================================================

/// Errors emitted by bin session operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling and tests.
#[derive(Debug, Error)]
pub enum SessionError {
    /// State or file recording attempted with no open checkpoint.
    #[error("no open checkin to attach state to")]
    NoOpenCheckin,
    /// Duplicate key recorded within one checkpoint.
    #[error("duplicate state key in checkin: {key}")]
    DuplicateStateKey {
        /// Offending key.
        key: StateKey,
    },
    /// Mutation attempted after the session was submitted.
    #[error("bin session already submitted")]
    AlreadySubmitted,
    /// Submission attempted with no recorded checkpoints.
    #[error("bin session has no recorded checkins")]
    NothingToSubmit,
    /// A required field was empty.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Field name.
        field: &'static str,
    },
    /// A field exceeded the configured length limit.
    #[error("{field} exceeds length limit ({actual} > {limit})")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Actual length.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
    /// A count or size limit was exceeded.
    #[error("{what} limit exceeded ({actual} > {limit})")]
    LimitExceeded {
        /// Limited quantity.
        what: &'static str,
        /// Actual value.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
    /// A state value could not be serialized for size accounting.
    #[error("state value serialization failed: {0}")]
    Serialization(String),
}

// ============================================================================
// SECTION: Session Status
// ============================================================================

/// Bin session lifecycle status.
///
/// # Invariants
/// - Variants are stable for serialization and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session accepts checkpoints and state.
    Recording,
    /// Session has been finished and is immutable.
    Submitted,
}

/// Read-only view of a session's recorded history.
///
/// # Invariants
/// - `checkins` holds closed checkpoints in recording order.
/// - `open` is the checkpoint state and file entries still attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Session lifecycle status.
    pub status: SessionStatus,
    /// Closed checkpoints in recording order.
    pub checkins: Vec<CheckinRecord>,
    /// Currently open checkpoint, when recording.
    pub open: Option<CheckinRecord>,
}

// ============================================================================
// SECTION: Bin Session
// ============================================================================

/// State machine accumulating checkpoints for one bin.
///
/// # Invariants
/// - `closed` is append-only; records never mutate after closing.
/// - At most one checkpoint is open at a time.
/// - `status` moves `Recording` -> `Submitted` exactly once.
#[derive(Debug, Clone)]
pub struct BinSession {
    /// Application key the run belongs to.
    app_key: AppKey,
    /// Run identifier the bin belongs to.
    run_id: RunId,
    /// Caller-chosen run name.
    run_name: RunName,
    /// Bin identifier.
    bin_id: BinId,
    /// Inputs the bin was acquired with.
    seed: BinSeed,
    /// Limits enforced on every mutation.
    limits: SessionLimits,
    /// Closed checkpoints in recording order.
    closed: Vec<CheckinRecord>,
    /// Currently open checkpoint.
    open: Option<CheckinRecord>,
    /// Session lifecycle status.
    status: SessionStatus,
}

impl BinSession {
    /// Opens a session for a freshly provisioned bin.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the seed violates the configured limits.
    pub fn open(
        app_key: AppKey,
        run_id: RunId,
        run_name: RunName,
        bin_id: BinId,
        seed: BinSeed,
        limits: SessionLimits,
    ) -> Result<Self, SessionError> {
        validate_seed(&seed, &limits)?;
        Ok(Self {
            app_key,
            run_id,
            run_name,
            bin_id,
            seed,
            limits,
            closed: Vec::new(),
            open: None,
            status: SessionStatus::Recording,
        })
    }

    /// Returns the bin identifier.
    #[must_use]
    pub const fn bin_id(&self) -> &BinId {
        &self.bin_id
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Returns the session lifecycle status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns a read-only view of the recorded history.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            checkins: self.closed.clone(),
            open: self.open.clone(),
        }
    }

    /// Closes any open checkpoint and opens a new one labeled `label`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is submitted, the label is
    /// invalid, or the checkpoint limit is reached.
    pub fn checkin(&mut self, label: CheckinLabel, at: Timestamp) -> Result<(), SessionError> {
        self.ensure_recording()?;
        validate_identifier("checkin label", label.as_str(), &self.limits)?;
        let recorded = self.closed.len() + usize::from(self.open.is_some());
        if recorded >= self.limits.max_checkins {
            return Err(SessionError::LimitExceeded {
                what: "checkins per bin",
                actual: recorded + 1,
                limit: self.limits.max_checkins,
            });
        }
        if let Some(previous) = self.open.take() {
            self.closed.push(previous);
        }
        self.open = Some(CheckinRecord::open(label, at));
        Ok(())
    }

    /// Records a state entry on the open checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is submitted, no checkpoint
    /// is open, the key is invalid or duplicated, or a limit is exceeded.
    pub fn add_state(&mut self, key: StateKey, value: Value) -> Result<(), SessionError> {
        self.ensure_recording()?;
        validate_identifier("state key", key.as_str(), &self.limits)?;
        validate_value_size(&value, &self.limits)?;
        let limits = self.limits;
        let open = self.open.as_mut().ok_or(SessionError::NoOpenCheckin)?;
        if open.has_state_key(&key) || open.files.contains_key(&key) {
            return Err(SessionError::DuplicateStateKey {
                key,
            });
        }
        let entries = open.state.len() + open.files.len();
        if entries >= limits.max_state_entries {
            return Err(SessionError::LimitExceeded {
                what: "state entries per checkin",
                actual: entries + 1,
                limit: limits.max_state_entries,
            });
        }
        open.state.push(StateEntry {
            key,
            value,
        });
        Ok(())
    }

    /// Records a file reference on the open checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is submitted, no checkpoint
    /// is open, the key is invalid or duplicated, or a limit is exceeded.
    pub fn add_file(&mut self, key: StateKey, file: FileRef) -> Result<(), SessionError> {
        self.ensure_recording()?;
        validate_identifier("file key", key.as_str(), &self.limits)?;
        if file.uri.is_empty() {
            return Err(SessionError::EmptyField {
                field: "file uri",
            });
        }
        let limits = self.limits;
        let open = self.open.as_mut().ok_or(SessionError::NoOpenCheckin)?;
        if open.has_state_key(&key) || open.files.contains_key(&key) {
            return Err(SessionError::DuplicateStateKey {
                key,
            });
        }
        let entries = open.state.len() + open.files.len();
        if entries >= limits.max_state_entries {
            return Err(SessionError::LimitExceeded {
                what: "state entries per checkin",
                actual: entries + 1,
                limit: limits.max_state_entries,
            });
        }
        open.files.insert(key, file);
        Ok(())
    }

    /// Closes the open checkpoint and finalizes the submission payload.
    ///
    /// The session becomes immutable; further mutations fail closed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is already submitted or no
    /// checkpoint was ever recorded.
    pub fn finish(&mut self, at: Timestamp) -> Result<BinSubmission, SessionError> {
        self.ensure_recording()?;
        if let Some(open) = self.open.take() {
            self.closed.push(open);
        }
        if self.closed.is_empty() {
            return Err(SessionError::NothingToSubmit);
        }
        self.status = SessionStatus::Submitted;
        Ok(BinSubmission {
            app_key: self.app_key.clone(),
            run_id: self.run_id.clone(),
            run_name: self.run_name.clone(),
            bin_id: self.bin_id.clone(),
            seed: self.seed.clone(),
            checkins: std::mem::take(&mut self.closed),
            submitted_at: at,
        })
    }

    /// Fails closed when the session is no longer recording.
    const fn ensure_recording(&self) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Recording => Ok(()),
            SessionStatus::Submitted => Err(SessionError::AlreadySubmitted),
        }
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Validates an identifier-shaped field against the session limits.
fn validate_identifier(
    field: &'static str,
    value: &str,
    limits: &SessionLimits,
) -> Result<(), SessionError> {
    if value.is_empty() {
        return Err(SessionError::EmptyField {
            field,
        });
    }
    let actual = value.chars().count();
    if actual > limits.max_identifier_length {
        return Err(SessionError::FieldTooLong {
            field,
            actual,
            limit: limits.max_identifier_length,
        });
    }
    Ok(())
}

/// Validates one state value's serialized size against the session limits.
fn validate_value_size(value: &Value, limits: &SessionLimits) -> Result<(), SessionError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|err| SessionError::Serialization(err.to_string()))?;
    if bytes.len() > limits.max_state_value_bytes {
        return Err(SessionError::LimitExceeded {
            what: "state value bytes",
            actual: bytes.len(),
            limit: limits.max_state_value_bytes,
        });
    }
    Ok(())
}

/// Validates a seed's entries against the session limits.
///
/// Exposed so callers can reject invalid seeds before provisioning a bin
/// with a backend; [`BinSession::open`] applies the same checks.
///
/// # Errors
///
/// Returns [`SessionError`] when the seed violates the limits.
pub fn validate_seed(seed: &BinSeed, limits: &SessionLimits) -> Result<(), SessionError> {
    let entries = seed.input_state.len() + seed.input_files.len();
    if entries > limits.max_state_entries {
        return Err(SessionError::LimitExceeded {
            what: "seed input entries",
            actual: entries,
            limit: limits.max_state_entries,
        });
    }
    for (key, value) in &seed.input_state {
        validate_identifier("input state key", key.as_str(), limits)?;
        validate_value_size(value, limits)?;
    }
    for (key, file) in &seed.input_files {
        validate_identifier("input file key", key.as_str(), limits)?;
        if file.uri.is_empty() {
            return Err(SessionError::EmptyField {
                field: "file uri",
            });
        }
    }
    Ok(())
}
