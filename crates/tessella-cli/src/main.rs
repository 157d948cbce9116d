//! Tessella - batch driver for constrained tile/pattern generation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use tessella_cli::cli_args::{Cli, Commands};
use tessella_cli::commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            jobs,
            out_dir,
            override_seed,
            attempts,
            samples_dir,
            tilesets_dir,
        } => commands::run::run(&commands::run::RunOptions {
            jobs_path: PathBuf::from(jobs),
            out_dir: PathBuf::from(out_dir),
            override_seed,
            attempts,
            samples_dir: PathBuf::from(samples_dir),
            tilesets_dir: PathBuf::from(tilesets_dir),
            // The manifest lands in the working directory, outside the
            // hashed output directory.
            manifest_dir: PathBuf::from("."),
        }),
        Commands::Validate { jobs } => commands::validate::run(&PathBuf::from(jobs)),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}
