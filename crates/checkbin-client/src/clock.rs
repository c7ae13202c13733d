// crates/checkbin-client/src/clock.rs
// ============================================================================
// Module: Checkbin Client Clock
// Description: Wall-clock timestamp supplier for recorded checkpoints.
// Purpose: Keep clock reads out of checkbin-core while stamping records here.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The core model never reads wall-clock time; the client is the host that
//! supplies it. Time before the unix epoch clamps to zero rather than failing
//! a recording call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use checkbin_core::Timestamp;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Returns the current wall-clock time as a unix-millisecond timestamp.
pub(crate) fn now() -> Timestamp {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX));
    Timestamp::UnixMillis(millis)
}
