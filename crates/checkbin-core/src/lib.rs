// crates/checkbin-core/src/lib.rs
// ============================================================================
// Module: Checkbin Core Library
// Description: Domain model and backend interfaces for the Checkbin client.
// Purpose: Define identifiers, records, and the bin session state machine.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Checkbin Core defines the types shared by every Checkbin client backend:
//! opaque identifiers, wire-stable checkin and submission records, and the
//! [`BinSession`] state machine that accumulates checkpoints before a
//! submission is delivered through a [`Recorder`].
//! Invariants:
//! - The core never reads wall-clock time; hosts supply [`Timestamp`] values.
//! - Session mutations fail closed once a session is submitted.
//! - Receipts are produced only after successful delivery.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::identifiers::AppKey;
pub use crate::core::identifiers::BinId;
pub use crate::core::identifiers::CheckinLabel;
pub use crate::core::identifiers::RunId;
pub use crate::core::identifiers::RunName;
pub use crate::core::identifiers::StateKey;
pub use crate::core::identifiers::SubmissionId;
pub use crate::core::session::BinSession;
pub use crate::core::session::SessionError;
pub use crate::core::session::SessionLimits;
pub use crate::core::session::SessionSnapshot;
pub use crate::core::session::SessionStatus;
pub use crate::core::session::validate_seed;
pub use crate::core::state::BinSeed;
pub use crate::core::state::BinSubmission;
pub use crate::core::state::CheckinRecord;
pub use crate::core::state::FileRef;
pub use crate::core::state::StateEntry;
pub use crate::core::state::SubmissionReceipt;
pub use crate::core::time::Timestamp;
pub use crate::interfaces::ProvisionError;
pub use crate::interfaces::Provisioner;
pub use crate::interfaces::Recorder;
pub use crate::interfaces::RecorderError;
