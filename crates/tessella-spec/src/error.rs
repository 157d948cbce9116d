//! Error types for job-list loading and validation.

use thiserror::Error;

/// Error codes for job validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Job name is empty
    EmptyJobName,
    /// E002: Job name contains characters that are unsafe in a filename
    UnsafeJobName,
    /// E003: Duplicate job name
    DuplicateJobName,
    /// E004: Output dimensions are zero
    ZeroDimensions,
    /// E005: Pattern size out of range for the output dimensions
    PatternSizeOutOfRange,
    /// E006: Symmetry count out of range
    SymmetryOutOfRange,
    /// E007: Screenshot count is zero
    NoScreenshots,
    /// E008: Tile subset name is empty
    EmptySubset,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::EmptyJobName => "E001",
            ErrorCode::UnsafeJobName => "E002",
            ErrorCode::DuplicateJobName => "E003",
            ErrorCode::ZeroDimensions => "E004",
            ErrorCode::PatternSizeOutOfRange => "E005",
            ErrorCode::SymmetryOutOfRange => "E006",
            ErrorCode::NoScreenshots => "E007",
            ErrorCode::EmptySubset => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur while loading a job list.
#[derive(Debug, Error)]
pub enum JobError {
    /// The job-list file could not be read.
    #[error("failed to read job list {path}: {source}")]
    FileRead {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The job-list file is not valid JSON or does not match the schema.
    #[error("failed to parse job list {path}: {source}")]
    Parse {
        /// Path that was being parsed.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ErrorCode::EmptyJobName.code(), "E001");
        assert_eq!(ErrorCode::EmptySubset.code(), "E008");
        assert_eq!(format!("{}", ErrorCode::DuplicateJobName), "E003");
    }
}
