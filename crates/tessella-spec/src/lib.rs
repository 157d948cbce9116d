//! Tessella canonical job types, validation, hashing, and manifests.
//!
//! This crate defines the declarative job list that drives the batch
//! generator, the validation rules applied before any generation starts,
//! the BLAKE3 content hashing used for artifacts, and the reproducibility
//! manifest produced by deterministic runs. It contains no CLI or
//! filesystem-scanning concerns; those live in `tessella-cli`.

pub mod error;
pub mod hash;
pub mod job;
pub mod manifest;
pub mod tileset;
pub mod validation;

pub use error::{ErrorCode, JobError};
pub use hash::{hash_bytes, hash_file};
pub use job::{Heuristic, JobList, JobSpec, ModelParams};
pub use manifest::{Manifest, ManifestEntry, RunMetadata};
pub use tileset::{Tile, TileSet};
pub use validation::{validate, ValidationIssue};
