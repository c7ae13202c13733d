// crates/checkbin-client/src/app.rs
// ============================================================================
// Module: Checkbin App
// Description: Application handle, run factories, and client error mapping.
// Purpose: Wire provisioners and recorders behind the script-visible surface.
// Dependencies: checkbin-core, checkbin-config, crate::{auth, backend, recorder, transport}
// ============================================================================

//! ## Overview
//! An [`App`] binds validated configuration, credentials, and a mode to a
//! provisioner/recorder pair. [`App::create_bin_factory`] opens a named run
//! and returns a [`BinFactory`] that acquires [`Bin`] sessions scoped to that
//! run. Remote mode speaks the wire contract over HTTPS; local mode assigns
//! identifiers from UUIDs and records runs as JSONL files.
//! Invariants:
//! - Remote mode requires credentials; construction fails closed without them.
//! - Names and seeds are validated before any backend call is issued.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use checkbin_config::CheckbinConfig;
use checkbin_config::ConfigError;
use checkbin_core::AppKey;
use checkbin_core::BinSeed;
use checkbin_core::BinSession;
use checkbin_core::FileRef;
use checkbin_core::ProvisionError;
use checkbin_core::Provisioner;
use checkbin_core::Recorder;
use checkbin_core::RecorderError;
use checkbin_core::RunId;
use checkbin_core::RunName;
use checkbin_core::SessionError;
use checkbin_core::SessionLimits;
use checkbin_core::StateKey;
use checkbin_core::validate_seed;
use serde_json::Value;
use thiserror::Error;

use crate::auth::AuthError;
use crate::auth::Credentials;
use crate::backend::LocalProvisioner;
use crate::backend::RemoteProvisioner;
use crate::bin::Bin;
use crate::recorder::JsonlRecorder;
use crate::recorder::RemoteRecorder;
use crate::transport::HttpTransport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by the client SDK.
///
/// # Invariants
/// - Variants are stable for programmatic handling and tests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credential validation or lookup failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    /// Configuration was invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Transport construction or request failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Backend provisioning failed.
    #[error("provision error: {0}")]
    Provision(#[from] ProvisionError),
    /// Session state machine rejected an operation.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    /// Submission delivery failed.
    #[error("recorder error: {0}")]
    Recorder(#[from] RecorderError),
    /// Caller-provided input was rejected before any backend call.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Local run record file could not be prepared.
    #[error("local run record error: {0}")]
    LocalRecord(String),
}

// ============================================================================
// SECTION: Run Mode
// ============================================================================

/// Backend selection for an application handle.
///
/// # Invariants
/// - Variants are stable for construction and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Record runs against the remote service.
    Remote,
    /// Record runs locally as JSONL files.
    Local,
}

/// Recorder wiring selected at app construction.
enum RecorderWiring {
    /// One shared remote recorder for every run.
    Remote(Arc<dyn Recorder>),
    /// Per-run JSONL files under the output directory.
    Local {
        /// Directory run record files are created in.
        output_dir: PathBuf,
    },
}

// ============================================================================
// SECTION: App
// ============================================================================

/// Application handle binding configuration, credentials, and a mode.
pub struct App {
    /// Validated client configuration.
    config: CheckbinConfig,
    /// Application key runs are scoped to.
    app_key: AppKey,
    /// Selected backend mode.
    mode: RunMode,
    /// Provisioner assigning run and bin identifiers.
    provisioner: Arc<dyn Provisioner>,
    /// Recorder wiring for run factories.
    recorders: RecorderWiring,
}

impl App {
    /// Creates an application handle for the requested mode.
    ///
    /// Remote mode requires credentials; local mode ignores them.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when configuration or the app key is invalid,
    /// or when remote mode is requested without credentials.
    pub fn new(
        config: CheckbinConfig,
        credentials: Option<Credentials>,
        app_key: impl Into<AppKey>,
        mode: RunMode,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let app_key = app_key.into();
        let limits = config.session_limits();
        validate_name("app key", app_key.as_str(), &limits)?;
        let (provisioner, recorders): (Arc<dyn Provisioner>, RecorderWiring) = match mode {
            RunMode::Remote => {
                let credentials = credentials.ok_or(ClientError::Auth(AuthError::Missing(
                    checkbin_config::config::TOKEN_ENV_VAR,
                )))?;
                let transport = Arc::new(HttpTransport::new(
                    &config.endpoint,
                    credentials,
                    config.limits.max_response_bytes,
                )?);
                (
                    Arc::new(RemoteProvisioner::new(Arc::clone(&transport))),
                    RecorderWiring::Remote(Arc::new(RemoteRecorder::new(transport))),
                )
            }
            RunMode::Local => (
                Arc::new(LocalProvisioner::new()),
                RecorderWiring::Local {
                    output_dir: config.local.output_path(),
                },
            ),
        };
        Ok(Self {
            config,
            app_key,
            mode,
            provisioner,
            recorders,
        })
    }

    /// Creates a remote-mode application handle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when configuration or the app key is invalid.
    pub fn remote(
        config: CheckbinConfig,
        credentials: Credentials,
        app_key: impl Into<AppKey>,
    ) -> Result<Self, ClientError> {
        Self::new(config, Some(credentials), app_key, RunMode::Remote)
    }

    /// Creates a local-mode application handle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when configuration or the app key is invalid.
    pub fn local(config: CheckbinConfig, app_key: impl Into<AppKey>) -> Result<Self, ClientError> {
        Self::new(config, None, app_key, RunMode::Local)
    }

    /// Returns the application key.
    #[must_use]
    pub const fn app_key(&self) -> &AppKey {
        &self.app_key
    }

    /// Returns the selected backend mode.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Opens a run named `run_name` and returns its bin factory.
    ///
    /// In local mode the per-run record file is created here, so factory
    /// creation can fail on filesystem errors.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the run name is invalid, provisioning
    /// fails, or the local run record file cannot be prepared.
    pub fn create_bin_factory(
        &self,
        run_name: impl Into<RunName>,
    ) -> Result<BinFactory, ClientError> {
        let run_name = run_name.into();
        let limits = self.config.session_limits();
        validate_name("run name", run_name.as_str(), &limits)?;
        let run_id = self.provisioner.open_run(&self.app_key, &run_name)?;
        let recorder: Arc<dyn Recorder> = match &self.recorders {
            RecorderWiring::Remote(recorder) => Arc::clone(recorder),
            RecorderWiring::Local {
                output_dir,
            } => Arc::new(open_run_log(output_dir, &run_id)?),
        };
        Ok(BinFactory {
            app_key: self.app_key.clone(),
            run_id,
            run_name,
            limits,
            provisioner: Arc::clone(&self.provisioner),
            recorder,
        })
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("app_key", &self.app_key)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Bin Factory
// ============================================================================

/// Per-run handle issuing bins scoped to one named run.
///
/// # Invariants
/// - Every issued bin shares this factory's run scope and limits.
pub struct BinFactory {
    /// Application key the run belongs to.
    app_key: AppKey,
    /// Run identifier assigned by the provisioner.
    run_id: RunId,
    /// Caller-chosen run name.
    run_name: RunName,
    /// Session limits applied to every issued bin.
    limits: SessionLimits,
    /// Provisioner assigning bin identifiers.
    provisioner: Arc<dyn Provisioner>,
    /// Recorder submissions are delivered through.
    recorder: Arc<dyn Recorder>,
}

impl BinFactory {
    /// Returns the run identifier.
    #[must_use]
    pub const fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Returns the run name.
    #[must_use]
    pub const fn run_name(&self) -> &RunName {
        &self.run_name
    }

    /// Acquires a bin seeded with the provided input state and files.
    ///
    /// The seed is validated before any backend call; invalid seeds never
    /// reach the provisioner.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the seed violates limits or provisioning
    /// fails.
    pub fn get_bin(
        &self,
        input_state: BTreeMap<StateKey, Value>,
        input_files: BTreeMap<StateKey, FileRef>,
    ) -> Result<Bin, ClientError> {
        let seed = BinSeed::new(input_state, input_files);
        validate_seed(&seed, &self.limits)?;
        let bin_id = self.provisioner.open_bin(&self.run_id, &seed)?;
        let session = BinSession::open(
            self.app_key.clone(),
            self.run_id.clone(),
            self.run_name.clone(),
            bin_id,
            seed,
            self.limits,
        )?;
        Ok(Bin::new(session, Arc::clone(&self.recorder)))
    }
}

impl std::fmt::Debug for BinFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinFactory")
            .field("app_key", &self.app_key)
            .field("run_id", &self.run_id)
            .field("run_name", &self.run_name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Characters allowed in app keys and run names beyond alphanumerics.
const NAME_PUNCTUATION: [char; 3] = ['_', '-', '.'];

/// Validates an app key or run name against shape and length rules.
fn validate_name(field: &str, value: &str, limits: &SessionLimits) -> Result<(), ClientError> {
    if value.is_empty() {
        return Err(ClientError::InvalidInput(format!("{field} must not be empty")));
    }
    let actual = value.chars().count();
    if actual > limits.max_identifier_length {
        return Err(ClientError::InvalidInput(format!(
            "{field} exceeds length limit ({actual} > {})",
            limits.max_identifier_length
        )));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || NAME_PUNCTUATION.contains(&c)) {
        return Err(ClientError::InvalidInput(format!(
            "{field} may only contain ascii alphanumerics, '.', '_', and '-'"
        )));
    }
    Ok(())
}

/// Opens the per-run JSONL record file for local-mode recording.
fn open_run_log(
    output_dir: &Path,
    run_id: &RunId,
) -> Result<JsonlRecorder<fs::File>, ClientError> {
    fs::create_dir_all(output_dir).map_err(|err| ClientError::LocalRecord(err.to_string()))?;
    let path = output_dir.join(format!("{run_id}.jsonl"));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| ClientError::LocalRecord(err.to_string()))?;
    Ok(JsonlRecorder::with_name(file, "local"))
}
