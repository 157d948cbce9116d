//! Loading the declarative job list.

use std::path::Path;

use tessella_spec::{hash_bytes, JobError, JobList};

/// Result of loading a job list.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed job list.
    pub jobs: JobList,
    /// BLAKE3 hash of the raw file bytes, for provenance reporting.
    pub source_hash: String,
}

/// Reads and parses a job-list file.
pub fn load_jobs(path: &Path) -> Result<LoadResult, JobError> {
    let raw = std::fs::read(path).map_err(|source| JobError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    let jobs = serde_json::from_slice(&raw).map_err(|source| JobError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(LoadResult {
        jobs,
        source_hash: hash_bytes(&raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let body = br#"{ "jobs": [{ "model": "overlapping", "name": "Flowers" }] }"#;
        std::fs::write(&path, body).unwrap();

        let result = load_jobs(&path).unwrap();
        assert_eq!(result.jobs.jobs.len(), 1);
        assert_eq!(result.source_hash, hash_bytes(body));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_jobs(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, JobError::FileRead { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let err = load_jobs(&path).unwrap_err();
        assert!(matches!(err, JobError::Parse { .. }));
    }
}
