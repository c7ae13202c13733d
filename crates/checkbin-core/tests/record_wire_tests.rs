// crates/checkbin-core/tests/record_wire_tests.rs
// ============================================================================
// Module: Record Wire Form Tests
// Description: Stability tests for serialized identifiers, time, and records.
// ============================================================================

//! Wire-form stability tests for core records.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

use std::collections::BTreeMap;

use checkbin_core::BinSeed;
use checkbin_core::CheckinLabel;
use checkbin_core::CheckinRecord;
use checkbin_core::FileRef;
use checkbin_core::RunId;
use checkbin_core::StateEntry;
use checkbin_core::StateKey;
use checkbin_core::SubmissionId;
use checkbin_core::SubmissionReceipt;
use checkbin_core::Timestamp;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Identifier Wire Forms
// ============================================================================

#[test]
fn identifiers_serialize_transparently_as_strings() {
    let run_id = RunId::new("run-42");
    let value = serde_json::to_value(&run_id).expect("serialize run id");
    assert_eq!(value, json!("run-42"));

    let parsed: RunId = serde_json::from_value(json!("run-42")).expect("parse run id");
    assert_eq!(parsed, run_id);
}

#[test]
fn identifiers_roundtrip_display_and_from() {
    let key = StateKey::from("generation");
    assert_eq!(key.to_string(), "generation");
    assert_eq!(key.as_str(), "generation");
}

// ============================================================================
// SECTION: Timestamp Wire Forms
// ============================================================================

#[test]
fn unix_millis_timestamp_uses_tagged_form() {
    let value = serde_json::to_value(Timestamp::UnixMillis(1_737_172_608_000)).expect("serialize");
    assert_eq!(value, json!({"kind": "unix_millis", "value": 1_737_172_608_000_i64}));
}

#[test]
fn logical_timestamp_uses_tagged_form() {
    let value = serde_json::to_value(Timestamp::Logical(7)).expect("serialize");
    assert_eq!(value, json!({"kind": "logical", "value": 7}));
}

#[test]
fn timestamp_accessors_are_exclusive() {
    let unix = Timestamp::UnixMillis(5);
    assert_eq!(unix.as_unix_millis(), Some(5));
    assert_eq!(unix.as_logical(), None);

    let logical = Timestamp::Logical(9);
    assert_eq!(logical.as_unix_millis(), None);
    assert_eq!(logical.as_logical(), Some(9));
}

// ============================================================================
// SECTION: Record Wire Forms
// ============================================================================

#[test]
fn checkin_record_serializes_expected_fields() {
    let mut record = CheckinRecord::open(CheckinLabel::new("test"), Timestamp::Logical(1));
    record.state.push(StateEntry {
        key: StateKey::new("generation"),
        value: json!("this is a sample generation"),
    });

    let value = serde_json::to_value(&record).expect("serialize checkin");
    assert_eq!(value["label"], json!("test"));
    assert_eq!(value["state"][0]["key"], json!("generation"));
    assert_eq!(value["state"][0]["value"], json!("this is a sample generation"));
    assert_eq!(value["recorded_at"]["kind"], json!("logical"));
}

#[test]
fn checkin_record_omits_empty_files_map() {
    let record = CheckinRecord::open(CheckinLabel::new("test"), Timestamp::Logical(1));
    let value = serde_json::to_value(&record).expect("serialize checkin");
    assert!(value.get("files").is_none());
}

#[test]
fn file_ref_omits_missing_media_type() {
    let value = serde_json::to_value(FileRef::new("s3://bucket/key")).expect("serialize file ref");
    assert_eq!(value, json!({"uri": "s3://bucket/key"}));
}

#[test]
fn bin_seed_serializes_input_maps() {
    let mut input_state: BTreeMap<StateKey, Value> = BTreeMap::new();
    input_state.insert(StateKey::new("company_id"), json!("123"));
    input_state.insert(StateKey::new("question_id"), json!("919"));
    let seed = BinSeed::new(input_state, BTreeMap::new());

    let value = serde_json::to_value(&seed).expect("serialize seed");
    assert_eq!(value["input_state"]["company_id"], json!("123"));
    assert_eq!(value["input_state"]["question_id"], json!("919"));
    assert_eq!(value["input_files"], json!({}));
}

#[test]
fn bin_seed_is_empty_reports_both_maps() {
    assert!(BinSeed::default().is_empty());
    let mut input_files = BTreeMap::new();
    input_files.insert(StateKey::new("attachment"), FileRef::new("s3://bucket/key"));
    let seed = BinSeed::new(BTreeMap::new(), input_files);
    assert!(!seed.is_empty());
}

#[test]
fn submission_receipt_roundtrips() {
    let receipt = SubmissionReceipt {
        submission_id: SubmissionId::new("sub-1"),
        recorder: "remote".to_string(),
        recorded_at: Timestamp::UnixMillis(42),
    };
    let value = serde_json::to_value(&receipt).expect("serialize receipt");
    let parsed: SubmissionReceipt = serde_json::from_value(value).expect("parse receipt");
    assert_eq!(parsed, receipt);
}
