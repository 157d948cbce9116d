//! The verification harness.
//!
//! After a deterministic run, the output directory is fingerprinted into a
//! [`Manifest`]: every file directly inside it is hashed, and the manifest is
//! written to `<yyyyMMddHHmmss>_<overrideSeed>.txt` OUTSIDE the output
//! directory. Keeping the manifest out of the hashed directory means
//! re-running into the same output directory never hashes a prior manifest;
//! idempotence holds by construction rather than by filtering.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tessella_spec::{hash_file, Manifest, ManifestEntry, RunMetadata};

/// Hashes every file directly inside the output directory (no recursion;
/// subdirectories are skipped). Returns `None` when the directory does not
/// exist, which the caller reports as a skipped manifest rather than an
/// error. A file that cannot be read mid-hash is fatal: shipping a manifest
/// with silently missing lines would defeat its purpose.
pub fn collect_entries(out_dir: &Path) -> Result<Option<Vec<ManifestEntry>>> {
    if !out_dir.is_dir() {
        return Ok(None);
    }

    let mut entries = Vec::new();
    let listing = std::fs::read_dir(out_dir)
        .with_context(|| format!("failed to list output directory {}", out_dir.display()))?;
    for entry in listing {
        let entry = entry
            .with_context(|| format!("failed to list output directory {}", out_dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let digest =
            hash_file(&path).with_context(|| format!("failed to hash {}", path.display()))?;
        entries.push(ManifestEntry {
            filename: entry.file_name().to_string_lossy().into_owned(),
            digest,
        });
    }
    Ok(Some(entries))
}

/// Captures the environment descriptors recorded in the manifest.
pub fn capture_metadata(elapsed_ms: u64) -> RunMetadata {
    RunMetadata {
        elapsed_ms,
        runtime: format!("tessella {}", env!("CARGO_PKG_VERSION")),
        operating_system: std::env::consts::OS.to_string(),
        processor_count: num_cpus::get(),
        architecture: std::env::consts::ARCH.to_string(),
    }
}

/// The manifest filename for a run: `<yyyyMMddHHmmss>_<overrideSeed>.txt`.
pub fn manifest_file_name(at: DateTime<Local>, override_seed: u32) -> String {
    format!("{}_{}.txt", at.format("%Y%m%d%H%M%S"), override_seed)
}

/// Writes the manifest into `dir` and returns the written path.
pub fn write_manifest(
    manifest: &Manifest,
    dir: &Path,
    override_seed: u32,
    at: DateTime<Local>,
) -> Result<PathBuf> {
    let path = dir.join(manifest_file_name(at, override_seed));
    std::fs::write(&path, manifest.render())
        .with_context(|| format!("failed to write manifest {}", path.display()))?;
    Ok(path)
}
