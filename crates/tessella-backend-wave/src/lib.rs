//! Tessella constrained generation backend.
//!
//! This crate implements the generation capability the batch driver invokes:
//! two model variants over a shared constraint-propagation solver.
//!
//! - **Overlapping**: N×N patterns cut from a sample image, matched by
//!   overlap agreement.
//! - **SimpleTiled**: named tiles with explicit edge adjacency, able to emit
//!   a textual rendition of the solved grid.
//!
//! # Determinism
//!
//! An attempt's outcome is a pure function of (seed, job parameters): all
//! randomness flows through a PCG32 stream seeded per attempt, and PNG
//! encoding uses fixed settings, so equal seeds produce byte-identical
//! artifacts. This is what makes the driver's override-seed mode and hash
//! manifest meaningful.

pub mod error;
mod overlapping;
pub mod png;
mod rng;
mod simple_tiled;
mod wave;

use std::path::Path;

use tessella_spec::{JobSpec, ModelParams};

pub use error::BackendError;
pub use overlapping::OverlappingModel;
pub use rng::DeterministicRng;
pub use simple_tiled::SimpleTiledModel;

/// The capability surface the batch driver drives.
///
/// `run` is deterministic for a fixed seed and fixed parameters and reports
/// contradiction through its boolean result; anything else a model can fail
/// on (malformed parameters, unreadable inputs) is rejected at construction.
pub trait Generator {
    /// Runs one generation attempt with the given seed and optional step
    /// limit. Returns `false` on contradiction.
    fn run(&mut self, seed: u32, limit: Option<u32>) -> bool;

    /// Writes the primary artifact (a PNG rendering) of the last run.
    fn save(&self, path: &Path) -> Result<(), BackendError>;

    /// The secondary textual artifact of the last run, for variants that
    /// support one.
    fn text_output(&self) -> Option<String>;
}

/// A generation model, tagged by variant.
pub enum Model {
    /// Overlapping pattern model.
    Overlapping(OverlappingModel),
    /// Simple tiled model.
    SimpleTiled(SimpleTiledModel),
}

impl Model {
    /// Builds the model for a job.
    ///
    /// Overlapping jobs read their sample from `<samples_dir>/<name>.png`;
    /// simple-tiled jobs read their tile set from `<tilesets_dir>/<name>.json`.
    pub fn from_job(
        job: &JobSpec,
        samples_dir: &Path,
        tilesets_dir: &Path,
    ) -> Result<Self, BackendError> {
        match &job.params {
            ModelParams::Overlapping {
                n,
                periodic_input,
                symmetry,
                ground,
            } => {
                let sample_path = samples_dir.join(format!("{}.png", job.name));
                Ok(Model::Overlapping(OverlappingModel::load(
                    &sample_path,
                    *n,
                    job.width(),
                    job.height(),
                    *periodic_input,
                    job.periodic,
                    *symmetry,
                    *ground,
                    job.heuristic,
                )?))
            }
            ModelParams::SimpleTiled {
                subset,
                black_background,
            } => {
                let tileset_path = tilesets_dir.join(format!("{}.json", job.name));
                Ok(Model::SimpleTiled(SimpleTiledModel::load(
                    &tileset_path,
                    subset,
                    job.width(),
                    job.height(),
                    job.periodic,
                    *black_background,
                    job.heuristic,
                )?))
            }
        }
    }
}

impl Generator for Model {
    fn run(&mut self, seed: u32, limit: Option<u32>) -> bool {
        match self {
            Model::Overlapping(model) => model.run(seed, limit),
            Model::SimpleTiled(model) => model.run(seed, limit),
        }
    }

    fn save(&self, path: &Path) -> Result<(), BackendError> {
        match self {
            Model::Overlapping(model) => model.save(path),
            Model::SimpleTiled(model) => model.save(path),
        }
    }

    fn text_output(&self) -> Option<String> {
        match self {
            Model::Overlapping(_) => None,
            Model::SimpleTiled(model) => Some(model.text_output()),
        }
    }
}
