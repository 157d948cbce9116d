//! Validate command implementation.
//!
//! Checks a job list without generating anything and prints a one-line
//! summary per job.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use tessella_spec::validate;

use crate::input::{load_jobs, LoadResult};

/// Runs the validate command.
///
/// # Returns
/// Exit code: 0 when the job list is valid, 1 otherwise.
pub fn run(jobs_path: &Path) -> Result<ExitCode> {
    let LoadResult { jobs, source_hash } = match load_jobs(jobs_path) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return Ok(ExitCode::from(1));
        }
    };

    println!(
        "{} {} ({})",
        "Jobs:".cyan().bold(),
        jobs_path.display(),
        &source_hash[..16]
    );
    for job in &jobs.jobs {
        println!(
            "  {} {} [{}] {}x{} heuristic={} screenshots={}",
            "-".dimmed(),
            job.name,
            job.params.kind(),
            job.width(),
            job.height(),
            job.heuristic,
            job.screenshots
        );
    }

    let issues = validate(&jobs);
    if issues.is_empty() {
        println!("{} {} job(s)", "OK".green().bold(), jobs.jobs.len());
        return Ok(ExitCode::SUCCESS);
    }

    for issue in &issues {
        eprintln!("  {} {}", "x".red(), issue);
    }
    eprintln!("{} {} issue(s)", "FAILED".red().bold(), issues.len());
    Ok(ExitCode::from(1))
}
