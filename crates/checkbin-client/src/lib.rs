// crates/checkbin-client/src/lib.rs
// ============================================================================
// Module: Checkbin Client Library
// Description: Client SDK surface for recording runs against Checkbin backends.
// Purpose: Provide App, BinFactory, and Bin over remote and local backends.
// Dependencies: checkbin-core, checkbin-config, reqwest, serde, uuid
// ============================================================================

//! ## Overview
//! Checkbin Client is the SDK surface integrating applications record test
//! runs with: authenticate with a bearer token, open an [`App`] in remote or
//! local mode, create a [`BinFactory`] for a named run, acquire a [`Bin`],
//! record checkpoints and state, and submit.
//! Invariants:
//! - Remote mode requires credentials; local mode performs no network I/O.
//! - Inputs are validated at construction boundaries and fail closed.
//! - Submissions are delivered exactly once per bin.
//!
//! Security posture: tokens are never logged or exposed through `Debug`;
//! remote responses are untrusted and size-capped.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod app;
pub mod auth;
pub mod backend;
pub mod bin;
pub mod recorder;
pub mod transport;

mod clock;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use app::App;
pub use app::BinFactory;
pub use app::ClientError;
pub use app::RunMode;
pub use auth::AuthError;
pub use auth::Credentials;
pub use backend::LocalProvisioner;
pub use backend::RemoteProvisioner;
pub use bin::Bin;
pub use recorder::ChannelRecorder;
pub use recorder::JsonlRecorder;
pub use recorder::RecordedSubmission;
pub use recorder::RemoteRecorder;
pub use transport::HttpTransport;
pub use transport::TransportError;

// ============================================================================
// SECTION: Run Name Helpers
// ============================================================================

/// Length of the random run-name suffix.
const SHORT_SUFFIX_LENGTH: usize = 6;

/// Returns a 6-character random suffix for run names.
///
/// The suffix is the leading hex of a freshly generated v4 UUID, matching the
/// `str(uuid.uuid4())[:6]` convention used by existing integrations.
#[must_use]
pub fn short_suffix() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id.chars().take(SHORT_SUFFIX_LENGTH).collect()
}
