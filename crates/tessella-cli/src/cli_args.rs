//! CLI argument definitions for the `tessella` binary.

use clap::{Parser, Subcommand};

use crate::runner::DEFAULT_ATTEMPTS;

/// Tessella - batch driver for constrained tile/pattern generation
#[derive(Parser)]
#[command(name = "tessella")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every job in the list, writing artifacts (and, with an override
    /// seed, the reproducibility manifest)
    Run {
        /// Path to the job list (JSON)
        #[arg(short, long)]
        jobs: String,

        /// Output directory for generated artifacts (wiped at start)
        #[arg(short, long, default_value = "output")]
        out_dir: String,

        /// Fixed seed for the whole run: collapses every job to one
        /// canonical attempt and enables the hash manifest
        #[arg(long)]
        override_seed: Option<u32>,

        /// Attempt budget per screenshot
        #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
        attempts: u32,

        /// Directory holding sample images for overlapping jobs
        #[arg(long, default_value = "samples")]
        samples_dir: String,

        /// Directory holding tile-set definitions for simple-tiled jobs
        #[arg(long, default_value = "tilesets")]
        tilesets_dir: String,
    },

    /// Validate a job list without generating anything
    Validate {
        /// Path to the job list (JSON)
        #[arg(short, long)]
        jobs: String,
    },
}
