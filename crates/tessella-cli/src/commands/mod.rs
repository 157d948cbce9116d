//! Command implementations for the `tessella` binary.

pub mod run;
pub mod validate;
