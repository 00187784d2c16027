//! From configuration documents to a result document

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::backend::{BeadModelRequest, HydroBackend, SizeRequest};
use crate::config::Sampling;
use crate::display;
use crate::documents::{self, ComputationResult, GlobalConfig, ProteinConfig};
use crate::error::Result;
use crate::syntax::Highlighter;

/// Build the bead model, estimate the radius, and assemble the result
pub fn compute(
    global: &GlobalConfig,
    protein: &ProteinConfig,
    backend: &dyn HydroBackend,
    sampling: Sampling,
) -> Result<ComputationResult> {
    info!(protein = %protein.protein_name, "computing hydrodynamic radius");

    let bead_request = BeadModelRequest {
        annotated_sequence: protein.annotated_sequence.clone(),
        effective_density: global.ordered_beads.effective_density,
        hydration_thickness: global.ordered_beads.hydration_thickness,
        disordered_radii: global.disordered_beads.hydrodynamic_radius.clone(),
        c_alpha_distance: global.disordered_beads.c_alpha_distance,
        aa_masses: global.amino_acid_masses.clone(),
    };
    let beads = backend.bead_model(&bead_request)?;
    debug!(beads = beads.steric_radii.len(), "bead model built");

    let size = backend.hydrodynamic_size(&SizeRequest {
        bead_steric_radii: beads.steric_radii,
        bead_hydrodynamic_radii: beads.hydrodynamic_radii,
        ensemble_size: sampling.ensemble_size,
        bootstrap_rounds: sampling.bootstrap_rounds,
    })?;

    Ok(ComputationResult {
        annotated_sequence: protein.annotated_sequence.clone(),
        rh_kirkwood: size.rh_kr,
        rh_kirkwood_error: size.rh_kr_se,
        rh_mda: size.rh_mda,
        rh_mda_error: size.rh_mda_se,
        protein_name: protein.protein_name.clone(),
    })
}

/// Where a protein's result is written: its file name inside `output_dir`
pub fn output_path(output_dir: &Path, protein_path: &Path) -> PathBuf {
    match protein_path.file_name() {
        Some(name) => output_dir.join(name),
        None => output_dir.join("result.yaml"),
    }
}

/// Batch inputs for the `compute` command
pub struct Batch<'a> {
    pub global_path: &'a Path,
    pub protein_paths: &'a [PathBuf],
    pub output_dir: &'a Path,
    pub sampling: Sampling,
}

/// Compute every protein, echo each result, and write it next to the others
///
/// Stops at the first protein that fails.
pub fn run_batch(
    batch: &Batch<'_>,
    backend: &dyn HydroBackend,
    highlighter: &Highlighter,
    out: &mut dyn Write,
    color: bool,
) -> Result<Vec<PathBuf>> {
    let global = documents::load::<GlobalConfig>(batch.global_path)?;
    fs::create_dir_all(batch.output_dir)?;

    let mut written = Vec::with_capacity(batch.protein_paths.len());
    for protein_path in batch.protein_paths {
        let protein = documents::load::<ProteinConfig>(protein_path)?;
        let result = compute(&global.parsed, &protein.parsed, backend, batch.sampling)?;

        display::print_highlighted(out, &documents::to_yaml(&result)?, highlighter, color)?;

        let path = output_path(batch.output_dir, protein_path);
        documents::write_result(&path, &result)?;
        written.push(path);
    }
    Ok(written)
}
