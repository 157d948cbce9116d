//! Backend error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from model construction and artifact export.
///
/// Contradictions are not errors; `run` reports them through its boolean
/// result. Everything here is fatal to the attempt that triggered it.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The sample image for an overlapping job could not be loaded.
    #[error("failed to read sample image {path}: {source}")]
    SampleRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// The sample image uses more distinct colors than the palette can hold.
    #[error("sample image {path} uses more than 256 distinct colors")]
    PaletteOverflow {
        /// Offending sample path.
        path: PathBuf,
    },

    /// The sample image is smaller than the pattern size.
    #[error("sample image {path} is smaller than the {n}x{n} pattern size")]
    SampleTooSmall {
        /// Offending sample path.
        path: PathBuf,
        /// Requested pattern size.
        n: u32,
    },

    /// The tile-set file could not be read.
    #[error("failed to read tile set {path}: {source}")]
    TileSetRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tile-set file is not valid JSON or does not match the schema.
    #[error("failed to parse tile set {path}: {source}")]
    TileSetParse {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The requested subset does not exist in the tile set.
    #[error("tile set has no subset named `{subset}`")]
    UnknownSubset {
        /// Requested subset name.
        subset: String,
    },

    /// A subset references a tile that does not exist.
    #[error("subset `{subset}` references unknown tile `{tile}`")]
    UnknownTile {
        /// Subset being resolved.
        subset: String,
        /// Missing tile name.
        tile: String,
    },

    /// A tile declares a weight that is zero or negative.
    #[error("tile `{tile}` has non-positive weight {weight}")]
    NonPositiveWeight {
        /// Offending tile name.
        tile: String,
        /// Declared weight.
        weight: f64,
    },

    /// The resolved subset is empty.
    #[error("subset `{subset}` selects no tiles")]
    EmptySubset {
        /// Offending subset name.
        subset: String,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] png::EncodingError),

    /// An I/O error while writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
