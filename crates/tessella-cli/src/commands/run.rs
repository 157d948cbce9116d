//! Run command implementation.
//!
//! The thin driver: load and validate the job list, wipe the output
//! directory, feed each job to the runner in order, report elapsed time,
//! and, when an override seed put the run in deterministic mode, hand the
//! output directory to the verification harness.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use tessella_backend_wave::Model;
use tessella_spec::{validate, Manifest};

use crate::artifact::ArtifactWriter;
use crate::input::{load_jobs, LoadResult};
use crate::runner::{self, SeedSource};
use crate::verify;

/// Options for one `tessella run` invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path to the job list.
    pub jobs_path: PathBuf,
    /// Output directory for artifacts.
    pub out_dir: PathBuf,
    /// Fixed seed activating deterministic mode, when supplied.
    pub override_seed: Option<u32>,
    /// Attempt budget per screenshot.
    pub attempts: u32,
    /// Directory holding sample images.
    pub samples_dir: PathBuf,
    /// Directory holding tile-set definitions.
    pub tilesets_dir: PathBuf,
    /// Directory the manifest is written into; must not be the output
    /// directory, or the manifest would hash itself on the next run.
    pub manifest_dir: PathBuf,
}

/// Runs the full pipeline.
///
/// # Returns
/// Exit code: 0 success, 1 job-list error. Generation and I/O failures
/// propagate as errors (the binary maps them to exit code 2).
pub fn run(opts: &RunOptions) -> Result<ExitCode> {
    let start = Instant::now();

    let LoadResult { jobs, source_hash } = match load_jobs(&opts.jobs_path) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return Ok(ExitCode::from(1));
        }
    };

    let issues = validate(&jobs);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  {} {}", "x".red(), issue);
        }
        eprintln!(
            "{} {} issue(s) in {}",
            "error:".red().bold(),
            issues.len(),
            opts.jobs_path.display()
        );
        return Ok(ExitCode::from(1));
    }

    println!(
        "{} {} ({})",
        "Jobs:".cyan().bold(),
        opts.jobs_path.display(),
        &source_hash[..16]
    );
    if let Some(seed) = opts.override_seed {
        println!("{} override seed {}", "Deterministic:".cyan().bold(), seed);
    }

    let writer = ArtifactWriter::new(&opts.out_dir);
    writer
        .prepare()
        .with_context(|| format!("failed to prepare output directory {}", opts.out_dir.display()))?;

    let mut seeds = SeedSource::from_override(opts.override_seed);
    for job in &jobs.jobs {
        println!("{} {}", "<".cyan().bold(), job.name);
        let mut model = Model::from_job(job, &opts.samples_dir, &opts.tilesets_dir)
            .with_context(|| format!("failed to build model for job `{}`", job.name))?;
        runner::run_job(job, &mut model, &mut seeds, &writer, opts.attempts)?;
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    println!("time = {} ms for generating output", elapsed_ms);

    if let Some(override_seed) = opts.override_seed {
        match verify::collect_entries(&opts.out_dir)? {
            None => println!(
                "{} output directory {} does not exist; skipping hash manifest",
                "!".yellow(),
                opts.out_dir.display()
            ),
            Some(entries) => {
                let manifest = Manifest::new(entries, verify::capture_metadata(elapsed_ms));
                print!("{}", manifest.render());
                let path =
                    verify::write_manifest(&manifest, &opts.manifest_dir, override_seed, Local::now())?;
                println!("{} {}", "Manifest:".cyan().bold(), path.display());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
