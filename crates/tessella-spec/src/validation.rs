//! Job-list validation.
//!
//! Validation runs before any generation starts; a job list with issues is
//! rejected as a whole. Artifact filenames are derived from the job name, so
//! most of the rules below protect filename safety and uniqueness.

use crate::error::ErrorCode;
use crate::job::{JobList, JobSpec, ModelParams};

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Stable error code.
    pub code: ErrorCode,
    /// Name of the offending job (possibly empty).
    pub job: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} job `{}`: {}", self.code, self.job, self.message)
    }
}

/// Validates a job list, returning every issue found.
pub fn validate(list: &JobList) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for job in &list.jobs {
        validate_job(job, &mut issues);
        if !seen.insert(job.name.as_str()) {
            issues.push(issue(
                ErrorCode::DuplicateJobName,
                job,
                "name is already used by an earlier job; artifact filenames would collide",
            ));
        }
    }

    issues
}

fn validate_job(job: &JobSpec, issues: &mut Vec<ValidationIssue>) {
    if job.name.is_empty() {
        issues.push(issue(ErrorCode::EmptyJobName, job, "name must not be empty"));
    } else if !is_filename_safe(&job.name) {
        issues.push(issue(
            ErrorCode::UnsafeJobName,
            job,
            "name must not contain path separators or control characters",
        ));
    }

    if job.width() == 0 || job.height() == 0 {
        issues.push(issue(
            ErrorCode::ZeroDimensions,
            job,
            "output dimensions must be at least 1x1",
        ));
    }

    if job.screenshots == 0 {
        issues.push(issue(
            ErrorCode::NoScreenshots,
            job,
            "screenshot count must be at least 1",
        ));
    }

    match &job.params {
        ModelParams::Overlapping { n, symmetry, .. } => {
            if *n == 0 || *n > job.width() || *n > job.height() {
                issues.push(issue(
                    ErrorCode::PatternSizeOutOfRange,
                    job,
                    "N must be between 1 and the output dimensions",
                ));
            }
            if *symmetry == 0 || *symmetry > 8 {
                issues.push(issue(
                    ErrorCode::SymmetryOutOfRange,
                    job,
                    "symmetry must be between 1 and 8",
                ));
            }
        }
        ModelParams::SimpleTiled { subset, .. } => {
            if subset.is_empty() {
                issues.push(issue(
                    ErrorCode::EmptySubset,
                    job,
                    "subset must name a tile subset",
                ));
            }
        }
    }
}

fn is_filename_safe(name: &str) -> bool {
    name != "." && name != ".." && !name.chars().any(|c| matches!(c, '/' | '\\') || c.is_control())
}

fn issue(code: ErrorCode, job: &JobSpec, message: &str) -> ValidationIssue {
    ValidationIssue {
        code,
        job: job.name.clone(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(json: &str) -> JobList {
        serde_json::from_str(json).unwrap()
    }

    fn codes(list: &JobList) -> Vec<ErrorCode> {
        validate(list).into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn valid_list_has_no_issues() {
        let list = list(
            r#"{ "jobs": [
                { "model": "overlapping", "name": "Flowers" },
                { "model": "simple_tiled", "name": "Knots", "subset": "standard" }
            ] }"#,
        );
        assert!(validate(&list).is_empty());
    }

    #[test]
    fn empty_and_unsafe_names() {
        let list = list(
            r#"{ "jobs": [
                { "model": "overlapping", "name": "" },
                { "model": "overlapping", "name": "a/b" }
            ] }"#,
        );
        assert_eq!(codes(&list), vec![ErrorCode::EmptyJobName, ErrorCode::UnsafeJobName]);
    }

    #[test]
    fn duplicate_names() {
        let list = list(
            r#"{ "jobs": [
                { "model": "overlapping", "name": "Twice" },
                { "model": "overlapping", "name": "Twice" }
            ] }"#,
        );
        assert_eq!(codes(&list), vec![ErrorCode::DuplicateJobName]);
    }

    #[test]
    fn zero_dimensions_and_screenshots() {
        let list = list(
            r#"{ "jobs": [
                { "model": "simple_tiled", "name": "A", "subset": "s", "size": 0, "screenshots": 0 }
            ] }"#,
        );
        assert_eq!(codes(&list), vec![ErrorCode::ZeroDimensions, ErrorCode::NoScreenshots]);
    }

    #[test]
    fn overlapping_parameter_ranges() {
        let list = list(
            r#"{ "jobs": [
                { "model": "overlapping", "name": "A", "N": 0 },
                { "model": "overlapping", "name": "B", "N": 9, "size": 4 },
                { "model": "overlapping", "name": "C", "symmetry": 9 }
            ] }"#,
        );
        assert_eq!(
            codes(&list),
            vec![
                ErrorCode::PatternSizeOutOfRange,
                ErrorCode::PatternSizeOutOfRange,
                ErrorCode::SymmetryOutOfRange
            ]
        );
    }

    #[test]
    fn empty_subset() {
        let list = list(r#"{ "jobs": [{ "model": "simple_tiled", "name": "A", "subset": "" }] }"#);
        assert_eq!(codes(&list), vec![ErrorCode::EmptySubset]);
    }
}
