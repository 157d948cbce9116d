//! Tessella CLI library.
//!
//! This crate provides the batch driver behind the `tessella` binary: job
//! list loading, the bounded-retry runner, artifact persistence, and the
//! deterministic-mode verification harness that fingerprints the output
//! directory into a manifest.

pub mod artifact;
pub mod cli_args;
pub mod commands;
pub mod input;
pub mod runner;
pub mod verify;
