//! Command modules for the rivt CLI.
//!
//! This module contains implementations for all available subcommands.
//! Each subcommand is implemented in its own file following a standardized pattern.

pub mod common;
pub mod traits;

pub mod compare;
pub mod run;

// Re-export command types and functions
pub use compare::{run_compare_layers, run_compare_output, CompareArgs};
pub use run::{run_tests, RunArgs};
