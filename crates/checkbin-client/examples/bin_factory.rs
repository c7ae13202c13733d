// crates/checkbin-client/examples/bin_factory.rs
// ============================================================================
// Module: Checkbin Bin Factory Example
// Description: Minimal end-to-end run recording against the remote service.
// Purpose: Demonstrate authenticate, bin factory, checkin, and submit.
// Dependencies: checkbin-client, checkbin-config
// ============================================================================

//! ## Overview
//! Records one bin with a single checkpoint and submits it. The bearer token
//! is read from `CHECKBIN_TOKEN`; endpoint settings come from the default
//! configuration or an optional `checkbin.toml`.

#![allow(clippy::print_stdout, reason = "Example reports the submission receipt.")]

use std::collections::BTreeMap;

use checkbin_client::App;
use checkbin_client::Credentials;
use checkbin_client::short_suffix;
use checkbin_config::CheckbinConfig;
use checkbin_core::StateKey;
use serde_json::Value;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let company_id = "123";
    let question_id = "919";
    let run_name = format!("{company_id}_{question_id}_{}", short_suffix());

    let config = CheckbinConfig::default();
    let credentials = Credentials::from_config(&config)?;
    let app = App::remote(config, credentials, "testing_dedup")?;
    let factory = app.create_bin_factory(run_name)?;

    let mut input_state = BTreeMap::new();
    input_state.insert(StateKey::new("company_id"), Value::from(company_id));
    input_state.insert(StateKey::new("question_id"), Value::from(question_id));
    let mut bin = factory.get_bin(input_state, BTreeMap::new())?;

    bin.checkin("test")?;
    bin.add_state("generation", "this is a sample generation")?;
    let receipt = bin.submit()?;

    println!("submitted {} via {}", receipt.submission_id, receipt.recorder);
    Ok(())
}
