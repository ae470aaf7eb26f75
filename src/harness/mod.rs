//! Test harness internals for the rivt CLI.
//!
//! This module contains the pieces the `run` command is built from:
//! fixture discovery, the checked external-command abstraction, and the
//! per-case pipeline (compile, assemble, emulate, compare) with its
//! section-level result aggregation.

pub mod discovery;
pub mod exec;
pub mod pipeline;

pub use exec::SystemRunner;
pub use pipeline::{Pipeline, RunMode, SectionSummary};
