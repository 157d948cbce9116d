//! Declarative job types.
//!
//! A job list is a JSON document with a `jobs` array. Each entry is tagged by
//! `"model"` and carries the knobs for one generation task. Unknown
//! attributes are ignored, so job files can carry annotations without
//! breaking older drivers.

use serde::{Deserialize, Serialize};

/// Default screenshot count per job.
pub const DEFAULT_SCREENSHOTS: u32 = 2;

/// Default pattern size for overlapping jobs.
pub const DEFAULT_PATTERN_SIZE: u32 = 3;

/// Default symmetry count for overlapping jobs.
pub const DEFAULT_SYMMETRY: u32 = 8;

/// Default square output size for overlapping jobs.
pub const DEFAULT_OVERLAPPING_SIZE: u32 = 48;

/// Default square output size for simple-tiled jobs.
pub const DEFAULT_SIMPLE_TILED_SIZE: u32 = 24;

/// Cell-selection heuristics understood by the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heuristic {
    /// Shannon-entropy minimization with per-cell noise for tie breaking.
    #[default]
    #[serde(rename = "entropy", alias = "Entropy")]
    Entropy,
    /// Minimum remaining values: the cell with the fewest candidates first.
    #[serde(rename = "MRV", alias = "mrv")]
    Mrv,
    /// Fixed left-to-right, top-to-bottom order.
    #[serde(rename = "scanline", alias = "Scanline")]
    Scanline,
}

impl Heuristic {
    /// Returns the heuristic as its job-file string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Heuristic::Entropy => "entropy",
            Heuristic::Mrv => "MRV",
            Heuristic::Scanline => "scanline",
        }
    }
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Variant-specific parameters, tagged by the `model` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelParams {
    /// Patterns are cut from a sample image and matched by overlap agreement.
    Overlapping {
        /// Pattern edge length.
        #[serde(rename = "N", default = "default_pattern_size")]
        n: u32,
        /// Whether the sample wraps at its edges.
        #[serde(default = "default_true", alias = "periodicInput")]
        periodic_input: bool,
        /// How many of the eight dihedral transforms of each pattern to admit.
        #[serde(default = "default_symmetry")]
        symmetry: u32,
        /// Pin the bottom row of the output to the sample's bottom row.
        #[serde(default)]
        ground: bool,
    },
    /// Tiles come from a named tile set with explicit edge adjacency.
    SimpleTiled {
        /// Name of the tile subset to draw from.
        subset: String,
        /// Render unresolved cells black instead of blending.
        #[serde(default, alias = "blackBackground")]
        black_background: bool,
    },
}

impl ModelParams {
    /// Returns the variant tag as it appears in job files.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelParams::Overlapping { .. } => "overlapping",
            ModelParams::SimpleTiled { .. } => "simple_tiled",
        }
    }
}

fn default_pattern_size() -> u32 {
    DEFAULT_PATTERN_SIZE
}

fn default_symmetry() -> u32 {
    DEFAULT_SYMMETRY
}

fn default_true() -> bool {
    true
}

fn default_screenshots() -> u32 {
    DEFAULT_SCREENSHOTS
}

/// One configured generation task.
///
/// `width`/`height` fall back to `size`, which falls back to a per-variant
/// default (48 for overlapping, 24 for simple-tiled), so the resolved
/// dimensions should always be read through [`JobSpec::width`] and
/// [`JobSpec::height`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Unique human-readable identifier, embedded in output filenames.
    pub name: String,

    /// Variant tag and variant-specific parameters.
    #[serde(flatten)]
    pub params: ModelParams,

    /// Square output size; overridden by `width`/`height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Output width in cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Output height in cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Whether the output wraps at its edges.
    #[serde(default)]
    pub periodic: bool,

    /// Cell-selection heuristic.
    #[serde(default)]
    pub heuristic: Heuristic,

    /// How many successful outputs to aim for.
    #[serde(default = "default_screenshots")]
    pub screenshots: u32,

    /// Per-attempt step cap; absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Write the textual companion artifact on success (simple-tiled only).
    #[serde(default, alias = "textOutput")]
    pub text_output: bool,
}

impl JobSpec {
    /// Resolved output width in cells.
    pub fn width(&self) -> u32 {
        self.width.or(self.size).unwrap_or_else(|| self.default_size())
    }

    /// Resolved output height in cells.
    pub fn height(&self) -> u32 {
        self.height.or(self.size).unwrap_or_else(|| self.default_size())
    }

    fn default_size(&self) -> u32 {
        match self.params {
            ModelParams::Overlapping { .. } => DEFAULT_OVERLAPPING_SIZE,
            ModelParams::SimpleTiled { .. } => DEFAULT_SIMPLE_TILED_SIZE,
        }
    }
}

/// Top-level job-list document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobList {
    /// Jobs in execution order.
    pub jobs: Vec<JobSpec>,
}
