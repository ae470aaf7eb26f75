//! Numeric comparison commands.
//!
//! `compare-layers` validates a 12-row layered trace, `compare-output` a
//! final output vector, each against a reference file within an absolute
//! tolerance. Success prints the literal line `Passed`; a format violation
//! and a numeric mismatch exit with distinct codes.

use std::path::PathBuf;

use crate::commands::traits::{Command, CommandDescription};
use crate::error::Result;
use crate::numeric::{compare_files, TagKind};

/// Arguments shared by both comparison commands.
#[derive(Debug, Clone)]
pub struct CompareArgs {
    /// File under test.
    pub actual: PathBuf,
    /// Reference file.
    pub reference: PathBuf,
}

/// Compare-layers command handler.
pub struct CompareLayersCommand {
    args: CompareArgs,
}

/// Compare-output command handler.
pub struct CompareOutputCommand {
    args: CompareArgs,
}

impl Command for CompareLayersCommand {
    type Args = CompareArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        run_compare(&self.args, TagKind::Layer)
    }

    fn name() -> &'static str {
        "compare-layers"
    }
}

impl CommandDescription for CompareLayersCommand {
    fn description() -> &'static str {
        "Validate a layered numeric trace against a reference"
    }

    fn help() -> &'static str {
        "Checks that all 12 LAYER-tagged rows match the reference file in \
         tag, dimension, and value (absolute tolerance 1e-10)."
    }
}

impl Command for CompareOutputCommand {
    type Args = CompareArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        run_compare(&self.args, TagKind::Par)
    }

    fn name() -> &'static str {
        "compare-output"
    }
}

impl CommandDescription for CompareOutputCommand {
    fn description() -> &'static str {
        "Validate a numeric output vector against a reference"
    }

    fn help() -> &'static str {
        "Checks that every PAR-tagged row matches the reference file in \
         tag, dimension, and value (absolute tolerance 1e-10)."
    }
}

/// Shared body of both comparison commands.
fn run_compare(args: &CompareArgs, kind: TagKind) -> Result<()> {
    compare_files(&args.actual, &args.reference, kind)?;
    println!("Passed");
    Ok(())
}

/// Run the compare-layers command.
pub fn run_compare_layers(args: CompareArgs) -> Result<()> {
    CompareLayersCommand::new(args).execute()
}

/// Run the compare-output command.
pub fn run_compare_output(args: CompareArgs) -> Result<()> {
    CompareOutputCommand::new(args).execute()
}
