// crates/checkbin-client/src/bin.rs
// ============================================================================
// Module: Checkbin Bin Handle
// Description: Recording handle for one acquired bin.
// Purpose: Stamp session operations with wall-clock time and deliver on submit.
// Dependencies: checkbin-core, crate::{app, clock}
// ============================================================================

//! ## Overview
//! A [`Bin`] wraps the core [`BinSession`] state machine and the recorder the
//! owning factory was wired with. `checkin` opens named checkpoints,
//! `add_state`/`add_file` attach entries to the open checkpoint, and `submit`
//! finalizes the session and delivers the submission exactly once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use checkbin_core::BinId;
use checkbin_core::BinSession;
use checkbin_core::CheckinLabel;
use checkbin_core::FileRef;
use checkbin_core::Recorder;
use checkbin_core::RunId;
use checkbin_core::SessionSnapshot;
use checkbin_core::SessionStatus;
use checkbin_core::StateKey;
use checkbin_core::SubmissionReceipt;
use serde_json::Value;

use crate::app::ClientError;
use crate::clock;

// ============================================================================
// SECTION: Bin
// ============================================================================

/// Recording handle for one acquired bin.
///
/// # Invariants
/// - Wraps exactly one session; delivery happens at most once.
/// - Wall-clock timestamps are supplied here, never inside the core.
pub struct Bin {
    /// Session state machine for this bin.
    session: BinSession,
    /// Recorder the submission is delivered through.
    recorder: Arc<dyn Recorder>,
}

impl Bin {
    /// Creates a bin handle over an open session.
    pub(crate) const fn new(session: BinSession, recorder: Arc<dyn Recorder>) -> Self {
        Self {
            session,
            recorder,
        }
    }

    /// Returns the bin identifier.
    #[must_use]
    pub const fn bin_id(&self) -> &BinId {
        self.session.bin_id()
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn run_id(&self) -> &RunId {
        self.session.run_id()
    }

    /// Returns the session lifecycle status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// Returns a read-only view of the recorded history.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Opens a named checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the session rejects the checkpoint.
    pub fn checkin(&mut self, label: impl Into<CheckinLabel>) -> Result<(), ClientError> {
        self.session.checkin(label.into(), clock::now())?;
        Ok(())
    }

    /// Records a state entry on the open checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the session rejects the entry.
    pub fn add_state(
        &mut self,
        key: impl Into<StateKey>,
        value: impl Into<Value>,
    ) -> Result<(), ClientError> {
        self.session.add_state(key.into(), value.into())?;
        Ok(())
    }

    /// Records a file reference on the open checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the session rejects the entry.
    pub fn add_file(&mut self, key: impl Into<StateKey>, file: FileRef) -> Result<(), ClientError> {
        self.session.add_file(key.into(), file)?;
        Ok(())
    }

    /// Finalizes the session and delivers the submission through the
    /// factory's recorder.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the session cannot be finalized or
    /// delivery fails. Delivery happens at most once; repeat calls fail
    /// closed.
    pub fn submit(&mut self) -> Result<SubmissionReceipt, ClientError> {
        let submission = self.session.finish(clock::now())?;
        let receipt = self.recorder.record(&submission)?;
        Ok(receipt)
    }
}

impl std::fmt::Debug for Bin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bin").field("session", &self.session).finish_non_exhaustive()
    }
}
