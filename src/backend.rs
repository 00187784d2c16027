//! The hydrodynamic computation capability
//!
//! Bead modelling and radius estimation live in an external scientific
//! library. The rest of the program only sees `HydroBackend`; the default
//! implementation drives a helper program over stdin/stdout with JSON.

use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to start backend `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("backend I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("backend exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("malformed backend message: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("no backend program configured")]
    NotConfigured,
}

/// Radius of disordered-region beads: one value, or one per residue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisorderedRadii {
    Uniform(f64),
    PerResidue(BTreeMap<String, f64>),
}

/// Inputs for building a bead model from an annotated sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeadModelRequest {
    pub annotated_sequence: String,
    pub effective_density: f64,
    pub hydration_thickness: f64,
    pub disordered_radii: DisorderedRadii,
    pub c_alpha_distance: f64,
    pub aa_masses: BTreeMap<String, f64>,
}

/// Per-bead radii of a bead model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeadModel {
    pub steric_radii: Vec<f64>,
    pub hydrodynamic_radii: Vec<f64>,
}

/// Inputs for the ensemble estimate of the hydrodynamic radius
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeRequest {
    pub bead_steric_radii: Vec<f64>,
    pub bead_hydrodynamic_radii: Vec<f64>,
    pub ensemble_size: u32,
    pub bootstrap_rounds: u32,
}

/// Hydrodynamic radius under both approximations, with standard errors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrodynamicSize {
    pub rh_mda: f64,
    #[serde(rename = "rh_mda (se)")]
    pub rh_mda_se: f64,
    pub rh_kr: f64,
    #[serde(rename = "rh_kr (se)")]
    pub rh_kr_se: f64,
}

pub trait HydroBackend {
    fn bead_model(&self, request: &BeadModelRequest) -> Result<BeadModel, BackendError>;

    fn hydrodynamic_size(&self, request: &SizeRequest) -> Result<HydrodynamicSize, BackendError>;
}

/// One call sent to the helper program
#[derive(Debug, Serialize)]
#[serde(tag = "function", content = "arguments", rename_all = "snake_case")]
enum Call<'a> {
    BeadModelFromSequence(&'a BeadModelRequest),
    HydrodynamicSize(&'a SizeRequest),
}

/// Runs an external program once per call
///
/// The program reads `{"function": ..., "arguments": {...}}` on stdin and
/// writes the result object on stdout. A non-zero exit is a failure; its
/// stderr becomes the error message.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    program: String,
    args: Vec<String>,
}

impl ProcessBackend {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a command line split into program and arguments
    pub fn from_command(command: &[String]) -> Result<Self, BackendError> {
        let (program, args) = command.split_first().ok_or(BackendError::NotConfigured)?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }

    fn call<T: DeserializeOwned>(&self, call: &Call<'_>) -> Result<T, BackendError> {
        let payload = serde_json::to_vec(call)?;
        debug!(program = %self.program, bytes = payload.len(), "invoking backend");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // The helper may exit without reading its request; its status decides
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&payload) {
                debug!(error = %e, "backend stopped reading its request");
            }
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(BackendError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        trace!(stdout = %String::from_utf8_lossy(&output.stdout), "backend replied");
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

impl HydroBackend for ProcessBackend {
    fn bead_model(&self, request: &BeadModelRequest) -> Result<BeadModel, BackendError> {
        self.call(&Call::BeadModelFromSequence(request))
    }

    fn hydrodynamic_size(&self, request: &SizeRequest) -> Result<HydrodynamicSize, BackendError> {
        self.call(&Call::HydrodynamicSize(request))
    }
}
