//! Configuration and result documents
//!
//! All three documents are YAML mappings with PascalCase keys. Results are
//! written with every float rounded to four decimal places.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::backend::DisorderedRadii;
use crate::error::{AppError, Result};

/// Decimal places kept when writing results
pub const RESULT_PRECISION: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderedBeads {
    pub effective_density: f64,
    pub hydration_thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisorderedBeads {
    pub hydrodynamic_radius: DisorderedRadii,
    #[serde(rename = "CAlphaDistance")]
    pub c_alpha_distance: f64,
}

/// Physical parameters shared by every protein
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalConfig {
    pub ordered_beads: OrderedBeads,
    pub disordered_beads: DisorderedBeads,
    pub amino_acid_masses: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProteinConfig {
    pub protein_name: String,
    pub annotated_sequence: String,
}

/// The result document, fields in the order they are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    #[serde(rename = "AnnotatedSequence")]
    pub annotated_sequence: String,
    #[serde(rename = "HydrodynamicRadius_Kirkwood")]
    pub rh_kirkwood: f64,
    #[serde(rename = "HydrodynamicRadius_Kirkwood_error")]
    pub rh_kirkwood_error: f64,
    #[serde(rename = "HydrodynamicRadius_MDA")]
    pub rh_mda: f64,
    #[serde(rename = "HydrodynamicRadius_MDA_error")]
    pub rh_mda_error: f64,
    #[serde(rename = "ProteinName")]
    pub protein_name: String,
}

#[cfg(test)]
impl ComputationResult {
    /// Copy with every numeric field rounded as it would be written
    pub fn rounded(&self) -> Self {
        Self {
            rh_kirkwood: round_float(self.rh_kirkwood),
            rh_kirkwood_error: round_float(self.rh_kirkwood_error),
            rh_mda: round_float(self.rh_mda),
            rh_mda_error: round_float(self.rh_mda_error),
            ..self.clone()
        }
    }
}

/// A document as loaded: the raw tree for display, the typed view for use
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub path: PathBuf,
    pub raw: Value,
    pub parsed: T,
}

impl<T> Loaded<T> {
    /// The document re-dumped as YAML
    pub fn display_text(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.raw)?)
    }
}

/// Read a YAML file without interpreting it
pub fn load_raw(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| AppError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a YAML file and parse it into `T`
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Loaded<T>> {
    let raw = load_raw(path)?;
    let parsed = serde_yaml::from_value(raw.clone()).map_err(|source| AppError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded document");
    Ok(Loaded {
        path: path.to_path_buf(),
        raw,
        parsed,
    })
}

/// Round half away from zero to `RESULT_PRECISION` decimals
///
/// Values too large to carry any fractional digit come back unchanged, so
/// scaling never overflows to infinity.
pub fn round_float(x: f64) -> f64 {
    let scale = 10f64.powi(RESULT_PRECISION);
    // 2^52: from here on every f64 is already an integer
    if !x.is_finite() || x.abs() * scale >= 4_503_599_627_370_496.0 {
        return x;
    }
    (x * scale).round() / scale
}

/// Round every float in a YAML tree, nested mappings and sequences included
pub fn round_floats(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(x) = n.as_f64() {
                *n = round_float(x).into();
            }
        }
        Value::Sequence(items) => items.iter_mut().for_each(round_floats),
        Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                round_floats(v);
            }
        }
        Value::Tagged(tagged) => round_floats(&mut tagged.value),
        _ => {}
    }
}

/// Serialize any result-like value with rounded floats
pub fn to_yaml<T: Serialize>(result: &T) -> Result<String> {
    let mut value = serde_yaml::to_value(result)?;
    round_floats(&mut value);
    Ok(serde_yaml::to_string(&value)?)
}

pub fn write_result(path: &Path, result: &ComputationResult) -> Result<()> {
    fs::write(path, to_yaml(result)?)?;
    tracing::info!(path = %path.display(), "wrote result");
    Ok(())
}
